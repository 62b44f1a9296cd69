//! Pre-move checks keyed by destination.

use corsair_core::Player;

use crate::error::{GameError, GameResult};

/// Decides whether the player may enter a guarded location.
///
/// Gates run before the exit is followed. A refusal leaves the player
/// where they are.
pub trait Gate {
    /// `Ok(Some(line))` lets the player through with a line of narration,
    /// `Ok(None)` lets them through silently, and an error refuses the move.
    fn check(&self, player: &Player) -> GameResult<Option<String>>;
}

/// A guardian who only lets a large enough crew through.
#[derive(Debug, Clone)]
pub struct CrewGate {
    /// Name of the guardian, used in the narration.
    pub guardian: String,
    /// Minimum crew size.
    pub quota: u32,
}

impl CrewGate {
    /// Create a gate held by `guardian`.
    pub fn new(guardian: impl Into<String>, quota: u32) -> Self {
        Self {
            guardian: guardian.into(),
            quota,
        }
    }
}

impl Gate for CrewGate {
    fn check(&self, player: &Player) -> GameResult<Option<String>> {
        if player.crew() < self.quota {
            return Err(GameError::GateRefused(format!(
                "⛔ LE {guardian} VOUS BARRE LA ROUTE !\n\
                 {name} : 'Halte ! Tu dois avoir un équipage au complet d'au moins \
                 {quota} valeureux pirates pour pouvoir briser la porte !'\n\
                 (Vous n'avez que {crew} hommes.)",
                guardian = self.guardian.to_uppercase(),
                name = self.guardian,
                quota = self.quota,
                crew = player.crew(),
            )));
        }
        Ok(Some(format!(
            "🔓 {} : 'Je vois que vous êtes bien entouré. Vous pouvez passer.'",
            self.guardian
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corsair_core::LocationId;

    fn captain(crew: u32) -> Player {
        Player::new("Jack", LocationId(0)).unwrap().with_crew(crew)
    }

    #[test]
    fn short_crew_is_refused() {
        let gate = CrewGate::new("Gardien", 8);
        for crew in [0, 5, 7] {
            let err = gate.check(&captain(crew)).unwrap_err();
            let text = err.to_string();
            assert!(text.starts_with("⛔ LE GARDIEN VOUS BARRE LA ROUTE !"));
            assert!(text.contains(&format!("(Vous n'avez que {crew} hommes.)")));
        }
    }

    #[test]
    fn full_crew_passes() {
        let gate = CrewGate::new("Gardien", 8);
        for crew in [8, 9, 20] {
            let line = gate.check(&captain(crew)).unwrap().unwrap();
            assert!(line.contains("Vous pouvez passer"));
        }
    }
}
