//! Non-player characters.

use std::collections::VecDeque;
use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::location::LocationId;

/// Stable index of a character inside a [`World`](crate::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub usize);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}

/// A non-player character.
#[derive(Debug, Clone)]
pub struct Character {
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Whether the character wanders between turns.
    pub mobile: bool,
    pub(crate) location: LocationId,
    messages: VecDeque<String>,
}

impl Character {
    /// Create a character standing at `location`.
    ///
    /// The location's membership set is not updated here; go through
    /// [`World::add_character`](crate::World::add_character).
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: LocationId,
        messages: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mobile: true,
            location,
            messages: messages.into_iter().collect(),
        }
    }

    /// Set whether the character wanders.
    pub fn with_mobile(mut self, mobile: bool) -> Self {
        self.mobile = mobile;
        self
    }

    /// The location the character stands in.
    pub fn location(&self) -> LocationId {
        self.location
    }

    /// Number of lines in the dialogue queue.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Next dialogue line, cycling through the queue forever.
    ///
    /// Returns `None` when the character has nothing to say.
    pub fn next_message(&mut self) -> Option<String> {
        let message = self.messages.pop_front()?;
        self.messages.push_back(message.clone());
        Some(message)
    }

    /// Case-insensitive substring match against the name.
    pub fn answers_to(&self, query: &str) -> bool {
        !query.is_empty() && self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.name, self.description)
    }
}

/// Decides where a wandering character goes next.
pub trait Wander {
    /// Pick a destination among the open exits of the current location, or
    /// `None` to stay put.
    fn next_stop(&self, exits: &[LocationId], rng: &mut StdRng) -> Option<LocationId>;
}

/// Move with a fixed probability, to a uniformly chosen open exit.
#[derive(Debug, Clone, Copy)]
pub struct CoinFlipWander {
    /// Chance of attempting to move on a given tick.
    pub probability: f64,
}

impl Default for CoinFlipWander {
    fn default() -> Self {
        Self { probability: 0.5 }
    }
}

impl Wander for CoinFlipWander {
    fn next_stop(&self, exits: &[LocationId], rng: &mut StdRng) -> Option<LocationId> {
        if !rng.random_bool(self.probability.clamp(0.0, 1.0)) || exits.is_empty() {
            return None;
        }
        Some(exits[rng.random_range(0..exits.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fouras() -> Character {
        Character::new(
            "Fouras",
            "un vieil homme",
            LocationId(0),
            ["Approche...".to_string(), "Je garde les clés.".to_string()],
        )
    }

    #[test]
    fn messages_cycle_round_robin() {
        let mut c = fouras();
        assert_eq!(c.next_message().as_deref(), Some("Approche..."));
        assert_eq!(c.message_count(), 2);
        assert_eq!(c.next_message().as_deref(), Some("Je garde les clés."));
        assert_eq!(c.message_count(), 2);
        assert_eq!(c.next_message().as_deref(), Some("Approche..."));
        assert_eq!(c.message_count(), 2);
    }

    #[test]
    fn silent_character_has_nothing_to_say() {
        let mut c = Character::new("Muet", "", LocationId(0), Vec::new());
        assert_eq!(c.next_message(), None);
        assert_eq!(c.message_count(), 0);
    }

    #[test]
    fn name_matching_is_substring_and_case_insensitive() {
        let c = fouras();
        assert!(c.answers_to("fouras"));
        assert!(c.answers_to("OURA"));
        assert!(!c.answers_to("marchand"));
        assert!(!c.answers_to(""));
    }

    #[test]
    fn coin_flip_never_moves_without_exits() {
        let wander = CoinFlipWander { probability: 1.0 };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(wander.next_stop(&[], &mut rng), None);
        }
    }

    #[test]
    fn coin_flip_certain_picks_an_exit() {
        let wander = CoinFlipWander { probability: 1.0 };
        let exits = [LocationId(3), LocationId(5)];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let stop = wander.next_stop(&exits, &mut rng).unwrap();
            assert!(exits.contains(&stop));
        }
    }

    #[test]
    fn coin_flip_zero_probability_stays() {
        let wander = CoinFlipWander { probability: 0.0 };
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(wander.next_stop(&[LocationId(1)], &mut rng), None);
    }

    #[test]
    fn coin_flip_default_moves_sometimes() {
        let wander = CoinFlipWander::default();
        let exits = [LocationId(1)];
        let mut rng = StdRng::seed_from_u64(42);
        let moves = (0..200)
            .filter(|_| wander.next_stop(&exits, &mut rng).is_some())
            .count();
        assert!(moves > 50 && moves < 150);
    }
}
