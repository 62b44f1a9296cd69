//! Assembles the text of one turn.

use corsair_core::QuestEvent;

/// Paragraphs of output, joined by blank lines.
#[derive(Debug, Clone, Default)]
pub struct Narration {
    blocks: Vec<String>,
}

impl Narration {
    /// Start an empty narration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph. Empty text is skipped.
    pub fn say(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.blocks.push(text);
        }
        self
    }

    /// Append one paragraph per quest event.
    pub fn events(&mut self, events: &[QuestEvent]) -> &mut Self {
        for event in events {
            self.blocks.push(event.to_string());
        }
        self
    }

    /// Append another narration.
    pub fn extend(&mut self, other: Narration) -> &mut Self {
        self.blocks.extend(other.blocks);
        self
    }

    /// Check if nothing was said.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The final text.
    pub fn finish(self) -> String {
        self.blocks.join("\n\n")
    }
}

/// Gold gained, as shown to the player.
pub fn gold_gained(amount: u32) -> String {
    format!("💰 (+{amount} pièces d'or ajoutées)")
}

/// Gold spent, as shown to the player.
pub fn gold_spent(amount: u32) -> String {
    format!("💰 (-{amount} pièces d'or)")
}
