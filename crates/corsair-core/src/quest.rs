//! Quests, objectives and the per-player quest manager.
//!
//! Objectives carry a tagged form (a room visit, a counter threshold or a
//! scripted action) next to the French label players see ("Visiter la
//! Taverne", "Se déplacer 10 fois", "Répondre 9"). [`Objective::parse`]
//! reads the tagged form out of such a label, so content can be written as
//! plain text.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Counter label for player moves.
pub const MOVE_COUNTER: &str = "Se déplacer";

/// Counters that [`Objective::parse`] recognises.
pub const KNOWN_COUNTERS: &[&str] = &[MOVE_COUNTER];

/// Equivalent phrasings of a room-visit objective, tried in this order.
const VISIT_PHRASINGS: [&str; 4] = ["Visiter", "Explorer", "Aller à", "Entrer dans"];

/// Connectors tried between an action verb and its target.
const ACTION_CONNECTORS: [&str; 3] = ["avec", "le", "la"];

/// What an objective tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectiveKind {
    /// Reach the named location.
    Visit {
        /// Location name.
        location: String,
    },
    /// A tracked counter reaches a threshold.
    Counter {
        /// Counter label, e.g. [`MOVE_COUNTER`].
        counter: String,
        /// Value at which the objective completes.
        threshold: u32,
    },
    /// A scripted action, optionally aimed at a target.
    Action {
        /// The verb, e.g. "Répondre".
        verb: String,
        /// What the action applies to.
        target: Option<String>,
    },
}

impl ObjectiveKind {
    /// The standard phrasing of this kind.
    fn canonical_label(&self) -> String {
        match self {
            Self::Visit { location } => format!("Visiter {location}"),
            Self::Counter { counter, threshold } => format!("{counter} {threshold} fois"),
            Self::Action { verb, target: None } => verb.clone(),
            Self::Action {
                verb,
                target: Some(t),
            } => format!("{verb} {t}"),
        }
    }
}

/// A single trackable condition within a quest.
///
/// Keeps the label exactly as written next to its tagged form; the label is
/// what players see and what [`Quest::complete_objective`] matches first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    text: String,
    kind: ObjectiveKind,
}

impl Objective {
    fn from_kind(kind: ObjectiveKind) -> Self {
        Self {
            text: kind.canonical_label(),
            kind,
        }
    }

    /// Visit objective.
    pub fn visit(location: impl Into<String>) -> Self {
        Self::from_kind(ObjectiveKind::Visit {
            location: location.into(),
        })
    }

    /// Counter objective.
    pub fn counter(counter: impl Into<String>, threshold: u32) -> Self {
        Self::from_kind(ObjectiveKind::Counter {
            counter: counter.into(),
            threshold,
        })
    }

    /// Action objective.
    pub fn action(verb: impl Into<String>, target: Option<&str>) -> Self {
        Self::from_kind(ObjectiveKind::Action {
            verb: verb.into(),
            target: target.map(str::to_string),
        })
    }

    /// Read a textual objective label.
    ///
    /// A visit phrasing followed by a name gives [`ObjectiveKind::Visit`]; a
    /// known counter label with a number in it gives
    /// [`ObjectiveKind::Counter`] (the first whole-word integer is the
    /// threshold); anything else is an [`ObjectiveKind::Action`] whose first
    /// word is the verb. The trimmed label is kept as written.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        Self {
            text: label.to_string(),
            kind: parse_kind(label),
        }
    }

    /// The label shown to the player.
    pub fn label(&self) -> &str {
        &self.text
    }

    /// The tagged form.
    pub fn kind(&self) -> &ObjectiveKind {
        &self.kind
    }

    /// Check whether `text` designates this objective: the label as written,
    /// or any equivalent phrasing of its kind.
    pub fn matches_text(&self, text: &str) -> bool {
        if text == self.text {
            return true;
        }
        match &self.kind {
            ObjectiveKind::Visit { location } => VISIT_PHRASINGS
                .iter()
                .any(|p| text == format!("{p} {location}")),
            ObjectiveKind::Counter { .. } => text == self.kind.canonical_label(),
            ObjectiveKind::Action { verb, target } => action_phrasings(verb, target.as_deref())
                .iter()
                .any(|p| p == text),
        }
    }

    fn matches_room(&self, room: &str) -> bool {
        matches!(&self.kind, ObjectiveKind::Visit { location } if location == room)
    }

    fn matches_counter(&self, name: &str, value: u32) -> bool {
        matches!(
            &self.kind,
            ObjectiveKind::Counter { counter, threshold } if counter == name && value >= *threshold
        )
    }

    fn matches_action(&self, action: &str, on: Option<&str>) -> bool {
        matches!(
            &self.kind,
            ObjectiveKind::Action { verb, target } if verb == action && target.as_deref() == on
        )
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_kind(label: &str) -> ObjectiveKind {
    for phrasing in VISIT_PHRASINGS {
        if let Some(rest) = label
            .strip_prefix(phrasing)
            .and_then(|r| r.strip_prefix(' '))
            .filter(|r| !r.trim().is_empty())
        {
            return ObjectiveKind::Visit {
                location: rest.trim().to_string(),
            };
        }
    }

    let counter = KNOWN_COUNTERS.iter().find(|c| label.contains(**c));
    if let (Some(counter), Some(threshold)) = (counter, first_integer(label)) {
        return ObjectiveKind::Counter {
            counter: counter.to_string(),
            threshold,
        };
    }

    match label.split_once(' ') {
        None => ObjectiveKind::Action {
            verb: label.to_string(),
            target: None,
        },
        Some((verb, rest)) => ObjectiveKind::Action {
            verb: verb.to_string(),
            target: Some(rest.trim().to_string()),
        },
    }
}

fn action_phrasings(verb: &str, target: Option<&str>) -> Vec<String> {
    match target {
        None => vec![verb.to_string()],
        Some(t) => std::iter::once(format!("{verb} {t}"))
            .chain(ACTION_CONNECTORS.iter().map(|c| format!("{verb} {c} {t}")))
            .collect(),
    }
}

fn progress(objective: &Objective, counters: &[(&str, u32)]) -> Option<String> {
    let ObjectiveKind::Counter { counter, threshold } = objective.kind() else {
        return None;
    };
    counters
        .iter()
        .find(|(name, _)| *name == counter.as_str())
        .map(|(_, value)| format!(" (Progression: {value}/{threshold})"))
}

fn first_integer(text: &str) -> Option<u32> {
    text.split_whitespace()
        .find(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_digit()))
        .and_then(|w| w.parse().ok())
}

/// Lifecycle of a quest. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestStatus {
    /// Known but not started.
    #[default]
    Inactive,
    /// Started, objectives being tracked.
    Active,
    /// Done; nothing changes any more.
    Completed,
}

/// Something that happened to a quest, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestEvent {
    /// A quest was activated.
    Activated {
        /// Quest title.
        title: String,
        /// Quest description.
        description: String,
    },
    /// An objective was met.
    ObjectiveCompleted {
        /// Quest title.
        quest: String,
        /// Objective label.
        objective: String,
    },
    /// All objectives were met (or completion was forced).
    Completed {
        /// Quest title.
        title: String,
        /// Reward granted, if any.
        reward: Option<String>,
    },
}

impl fmt::Display for QuestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activated { title, description } => {
                write!(f, "🗡️  Nouvelle quête activée: {title}\n📝 {description}")
            }
            Self::ObjectiveCompleted { objective, .. } => {
                write!(f, "✅ Objectif accompli: {objective}")
            }
            Self::Completed { title, reward } => {
                write!(f, "🏆 Quête terminée: {title}")?;
                if let Some(r) = reward {
                    write!(f, "\n🎁 Récompense: {r}")?;
                }
                Ok(())
            }
        }
    }
}

/// A quest: ordered objectives, a lifecycle and an optional reward.
#[derive(Debug, Clone)]
pub struct Quest {
    /// Unique title, used for lookup.
    pub title: String,
    /// What the quest is about.
    pub description: String,
    /// Reward text granted on completion.
    pub reward: Option<String>,
    objectives: Vec<Objective>,
    done: Vec<bool>,
    status: QuestStatus,
}

impl Quest {
    /// Create an inactive quest.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        objectives: Vec<Objective>,
        reward: Option<String>,
    ) -> Self {
        let done = vec![false; objectives.len()];
        Self {
            title: title.into(),
            description: description.into(),
            reward,
            objectives,
            done,
            status: QuestStatus::Inactive,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> QuestStatus {
        self.status
    }

    /// Activated at some point (completed quests count as activated).
    pub fn is_active(&self) -> bool {
        self.status != QuestStatus::Inactive
    }

    /// Completed, by objectives or by force.
    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    /// All objectives in order.
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Objectives met so far, in objective order.
    pub fn completed_objectives(&self) -> Vec<&Objective> {
        self.objectives
            .iter()
            .zip(&self.done)
            .filter(|(_, d)| **d)
            .map(|(o, _)| o)
            .collect()
    }

    /// Inactive → Active. Returns the event, or `None` if already active.
    pub fn activate(&mut self) -> Option<QuestEvent> {
        if self.status != QuestStatus::Inactive {
            return None;
        }
        self.status = QuestStatus::Active;
        debug!(quest = %self.title, "quest activated");
        Some(QuestEvent::Activated {
            title: self.title.clone(),
            description: self.description.clone(),
        })
    }

    /// Complete the first open objective designated by `text`.
    pub fn complete_objective(&mut self, text: &str) -> Vec<QuestEvent> {
        self.complete_first(|o| o.matches_text(text))
    }

    /// Complete a visit objective for `room`, trying each phrasing.
    pub fn check_room_objective(&mut self, room: &str) -> Vec<QuestEvent> {
        self.complete_first(|o| o.matches_room(room))
    }

    /// Complete an action objective, trying `"{verb} {target}"`,
    /// `"{verb} avec {target}"`, `"{verb} le {target}"` and
    /// `"{verb} la {target}"` in turn.
    pub fn check_action_objective(&mut self, verb: &str, target: Option<&str>) -> Vec<QuestEvent> {
        for phrasing in action_phrasings(verb, target) {
            let events = self.complete_first(|o| o.matches_text(&phrasing));
            if !events.is_empty() {
                return events;
            }
        }
        self.complete_first(|o| o.matches_action(verb, target))
    }

    /// Complete every open counter objective on `counter` whose threshold
    /// `value` has reached.
    pub fn check_counter_objective(&mut self, counter: &str, value: u32) -> Vec<QuestEvent> {
        let mut events = Vec::new();
        while let Some(index) = self.first_open(|o| o.matches_counter(counter, value)) {
            events.extend(self.complete_at(index));
        }
        events
    }

    /// Mark the quest completed regardless of objectives.
    pub fn force_complete(&mut self) -> Option<QuestEvent> {
        if self.is_completed() {
            return None;
        }
        Some(self.finish())
    }

    fn first_open(&self, pred: impl Fn(&Objective) -> bool) -> Option<usize> {
        if self.is_completed() {
            return None;
        }
        self.objectives
            .iter()
            .zip(&self.done)
            .position(|(o, d)| !*d && pred(o))
    }

    fn complete_first(&mut self, pred: impl Fn(&Objective) -> bool) -> Vec<QuestEvent> {
        match self.first_open(pred) {
            Some(index) => self.complete_at(index),
            None => Vec::new(),
        }
    }

    fn complete_at(&mut self, index: usize) -> Vec<QuestEvent> {
        self.done[index] = true;
        let mut events = vec![QuestEvent::ObjectiveCompleted {
            quest: self.title.clone(),
            objective: self.objectives[index].label().to_string(),
        }];
        if !self.objectives.is_empty() && self.done.iter().all(|d| *d) {
            events.push(self.finish());
        }
        events
    }

    fn finish(&mut self) -> QuestEvent {
        self.status = QuestStatus::Completed;
        debug!(quest = %self.title, "quest completed");
        QuestEvent::Completed {
            title: self.title.clone(),
            reward: self.reward.clone(),
        }
    }

    /// One-line status for quest listings.
    pub fn status_line(&self) -> String {
        match self.status {
            QuestStatus::Completed => format!("✅ {} (Terminée)", self.title),
            QuestStatus::Inactive => format!("❓ {} (Non activée)", self.title),
            QuestStatus::Active => format!(
                "⏳ {} ({}/{} objectifs)",
                self.title,
                self.done.iter().filter(|d| **d).count(),
                self.objectives.len()
            ),
        }
    }

    /// Full description with per-objective progress.
    ///
    /// `counters` supplies live values for counter objectives, which are
    /// shown as `(Progression: value/threshold)`.
    pub fn details(&self, counters: &[(&str, u32)]) -> String {
        let mut out = format!("📋 Quête: {}\n📖 {}\n", self.title, self.description);

        if !self.objectives.is_empty() {
            out.push_str("\nObjectifs:\n");
            for (objective, done) in self.objectives.iter().zip(&self.done) {
                let mark = if *done { "✅" } else { "⬜" };
                out.push_str(&format!("  {mark} {objective}"));
                if let Some(progress) = progress(objective, counters) {
                    out.push_str(&progress);
                }
                out.push('\n');
            }
        }

        if let Some(reward) = &self.reward {
            out.push_str(&format!("\n🎁 Récompense: {reward}\n"));
        }
        out
    }
}

/// Owns every quest of one player and tracks which ones are active.
///
/// A quest is in the active set iff it has been activated and is not yet
/// completed. Every operation that can complete a quest prunes the set
/// before returning.
#[derive(Debug, Clone, Default)]
pub struct QuestManager {
    quests: Vec<Quest>,
    by_title: HashMap<String, usize>,
    active: Vec<usize>,
}

impl QuestManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a quest. A second quest with the same title replaces the
    /// first one.
    pub fn add_quest(&mut self, quest: Quest) {
        match self.by_title.get(&quest.title) {
            Some(&index) => self.quests[index] = quest,
            None => {
                self.by_title.insert(quest.title.clone(), self.quests.len());
                self.quests.push(quest);
            }
        }
        self.prune();
    }

    /// Activate a quest by exact title.
    ///
    /// Returns the activation event, or `None` when the title is unknown or
    /// the quest was already activated; in that case nothing changes.
    pub fn activate_quest(&mut self, title: &str) -> Option<QuestEvent> {
        let index = *self.by_title.get(title)?;
        let event = self.quests[index].activate()?;
        self.active.push(index);
        Some(event)
    }

    /// Complete an objective by label in the first active quest that has it
    /// open.
    pub fn complete_objective(&mut self, text: &str) -> Vec<QuestEvent> {
        let mut events = Vec::new();
        for &index in &self.active {
            events = self.quests[index].complete_objective(text);
            if !events.is_empty() {
                break;
            }
        }
        self.prune();
        events
    }

    /// Evaluate visit objectives of every active quest against `room`.
    pub fn check_room_objectives(&mut self, room: &str) -> Vec<QuestEvent> {
        self.for_each_active(|q| q.check_room_objective(room))
    }

    /// Evaluate action objectives of every active quest.
    pub fn check_action_objectives(&mut self, verb: &str, target: Option<&str>) -> Vec<QuestEvent> {
        self.for_each_active(|q| q.check_action_objective(verb, target))
    }

    /// Evaluate counter objectives of every active quest.
    pub fn check_counter_objectives(&mut self, counter: &str, value: u32) -> Vec<QuestEvent> {
        self.for_each_active(|q| q.check_counter_objective(counter, value))
    }

    fn for_each_active(
        &mut self,
        mut f: impl FnMut(&mut Quest) -> Vec<QuestEvent>,
    ) -> Vec<QuestEvent> {
        let mut events = Vec::new();
        for &index in &self.active {
            events.extend(f(&mut self.quests[index]));
        }
        self.prune();
        events
    }

    fn prune(&mut self) {
        let quests = &self.quests;
        self.active.retain(|&i| quests[i].status() == QuestStatus::Active);
    }

    /// Look up a quest by exact title.
    pub fn quest(&self, title: &str) -> Option<&Quest> {
        self.by_title.get(title).map(|&i| &self.quests[i])
    }

    /// Every quest, in registration order.
    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    /// Active, uncompleted quests in activation order.
    pub fn active_quests(&self) -> Vec<&Quest> {
        self.active.iter().map(|&i| &self.quests[i]).collect()
    }

    /// Check whether a quest is in the active set.
    pub fn is_tracking(&self, title: &str) -> bool {
        self.by_title
            .get(title)
            .is_some_and(|i| self.active.contains(i))
    }

    /// Status of every quest, one per line.
    pub fn overview(&self) -> String {
        if self.quests.is_empty() {
            return "Aucune quête disponible.".to_string();
        }
        let mut out = "📋 Liste des quêtes:".to_string();
        for quest in &self.quests {
            out.push_str(&format!("\n  {}", quest.status_line()));
        }
        out
    }

    /// Details of one quest.
    pub fn details(&self, title: &str, counters: &[(&str, u32)]) -> CoreResult<String> {
        self.quest(title)
            .map(|q| q.details(counters))
            .ok_or_else(|| CoreError::QuestNotFound(title.to_string()))
    }
}
