//! Locations, exits and direction tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character::CharacterId;
use crate::inventory::Inventory;

/// Stable index of a location inside a [`World`](crate::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub usize);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Direction token for an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Nord.
    #[serde(rename = "N")]
    North,
    /// Est.
    #[serde(rename = "E")]
    East,
    /// Sud.
    #[serde(rename = "S")]
    South,
    /// Ouest.
    #[serde(rename = "O")]
    West,
    /// Monter.
    #[serde(rename = "U")]
    Up,
    /// Descendre.
    #[serde(rename = "D")]
    Down,
}

impl Direction {
    /// Every direction, in token order.
    pub const ALL: [Direction; 6] = [
        Self::North,
        Self::East,
        Self::South,
        Self::West,
        Self::Up,
        Self::Down,
    ];

    /// Parse a direction token or one of its long synonyms, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "N" | "NORD" => Some(Self::North),
            "E" | "EST" => Some(Self::East),
            "S" | "SUD" => Some(Self::South),
            "O" | "OUEST" => Some(Self::West),
            "U" | "UP" => Some(Self::Up),
            "D" | "DOWN" => Some(Self::Down),
            _ => None,
        }
    }

    /// The canonical one-letter token.
    pub fn token(&self) -> &'static str {
        match self {
            Self::North => "N",
            Self::East => "E",
            Self::South => "S",
            Self::West => "O",
            Self::Up => "U",
            Self::Down => "D",
        }
    }

    /// Up or down, as opposed to the four cardinal points.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A node of the world graph.
#[derive(Debug, Clone)]
pub struct Location {
    /// Unique display name.
    pub name: String,
    /// Description appended to the arrival line.
    pub description: String,
    /// Exits in insertion order. `None` marks a declared but closed passage.
    exits: Vec<(Direction, Option<LocationId>)>,
    /// Items lying here.
    pub inventory: Inventory,
    /// Characters currently here.
    characters: Vec<CharacterId>,
}

impl Location {
    /// Create a location with no exits, items or characters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            exits: Vec::new(),
            inventory: Inventory::new(),
            characters: Vec::new(),
        }
    }

    /// Where the exit in `direction` leads, if it is open.
    pub fn get_exit(&self, direction: Direction) -> Option<LocationId> {
        self.exits
            .iter()
            .find(|(d, _)| *d == direction)
            .and_then(|(_, target)| *target)
    }

    /// Set or replace an exit. Replacing keeps the original position.
    pub fn set_exit(&mut self, direction: Direction, target: Option<LocationId>) {
        match self.exits.iter_mut().find(|(d, _)| *d == direction) {
            Some(slot) => slot.1 = target,
            None => self.exits.push((direction, target)),
        }
    }

    /// All exits, open or closed, in insertion order.
    pub fn exits(&self) -> &[(Direction, Option<LocationId>)] {
        &self.exits
    }

    /// Targets of every open exit, in insertion order.
    pub fn open_exits(&self) -> Vec<LocationId> {
        self.exits.iter().filter_map(|(_, t)| *t).collect()
    }

    /// `"Sorties: N, E"`, listing open exits only.
    pub fn describe_exits(&self) -> String {
        let open: Vec<&str> = self
            .exits
            .iter()
            .filter(|(_, t)| t.is_some())
            .map(|(d, _)| d.token())
            .collect();
        format!("Sorties: {}", open.join(", "))
    }

    /// Arrival text followed by the exits line.
    pub fn long_description(&self) -> String {
        format!(
            "Vous venez d'arriver dans {}, {}\n\n{}",
            self.name,
            self.description,
            self.describe_exits()
        )
    }

    /// Items on the floor, one per line.
    pub fn describe_inventory(&self) -> String {
        if self.inventory.is_empty() {
            return "Il n'y a rien ici.".to_string();
        }
        let mut out = "La pièce contient :".to_string();
        for (name, entry) in self.inventory.iter() {
            out.push_str(&format!(
                "\n    - {name} : {} ({} kg)",
                entry.description, entry.weight
            ));
        }
        out
    }

    /// Characters currently here, in arrival order.
    pub fn characters(&self) -> &[CharacterId] {
        &self.characters
    }

    /// Check whether a character is here.
    pub fn has_character(&self, id: CharacterId) -> bool {
        self.characters.contains(&id)
    }

    /// Register a character here. Returns false if it was already present.
    ///
    /// Only the membership set is touched; use
    /// [`World::place_character`](crate::World::place_character) so that the
    /// character's own location follows.
    pub(crate) fn add_character(&mut self, id: CharacterId) -> bool {
        if self.characters.contains(&id) {
            return false;
        }
        self.characters.push(id);
        true
    }

    /// Unregister a character. Absent characters are ignored.
    pub(crate) fn remove_character(&mut self, id: CharacterId) {
        self.characters.retain(|c| *c != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tokens_and_synonyms() {
        assert_eq!(Direction::parse("n"), Some(Direction::North));
        assert_eq!(Direction::parse("NORD"), Some(Direction::North));
        assert_eq!(Direction::parse("ouest"), Some(Direction::West));
        assert_eq!(Direction::parse("Up"), Some(Direction::Up));
        assert_eq!(Direction::parse("down"), Some(Direction::Down));
        assert_eq!(Direction::parse("W"), None);
        assert_eq!(Direction::parse(""), None);
    }

    #[test]
    fn vertical_axis() {
        assert!(Direction::Up.is_vertical());
        assert!(Direction::Down.is_vertical());
        assert!(!Direction::West.is_vertical());
    }

    #[test]
    fn exits_listed_in_insertion_order_skipping_closed() {
        let mut loc = Location::new("un vaste océan", "vous naviguez.");
        loc.set_exit(Direction::West, Some(LocationId(4)));
        loc.set_exit(Direction::North, None);
        loc.set_exit(Direction::East, Some(LocationId(2)));
        assert_eq!(loc.describe_exits(), "Sorties: O, E");
        assert_eq!(loc.get_exit(Direction::North), None);
        assert_eq!(loc.get_exit(Direction::East), Some(LocationId(2)));
        assert_eq!(loc.open_exits(), vec![LocationId(4), LocationId(2)]);
    }

    #[test]
    fn replacing_exit_keeps_position() {
        let mut loc = Location::new("a", "");
        loc.set_exit(Direction::North, Some(LocationId(1)));
        loc.set_exit(Direction::South, Some(LocationId(2)));
        loc.set_exit(Direction::North, Some(LocationId(3)));
        assert_eq!(loc.describe_exits(), "Sorties: N, S");
        assert_eq!(loc.get_exit(Direction::North), Some(LocationId(3)));
    }

    #[test]
    fn character_membership_is_a_set() {
        let mut loc = Location::new("la Taverne", "");
        assert!(loc.add_character(CharacterId(0)));
        assert!(!loc.add_character(CharacterId(0)));
        assert_eq!(loc.characters().len(), 1);
        loc.remove_character(CharacterId(7));
        loc.remove_character(CharacterId(0));
        assert!(loc.characters().is_empty());
    }

    #[test]
    fn empty_room_inventory_text() {
        let loc = Location::new("a", "");
        assert_eq!(loc.describe_inventory(), "Il n'y a rien ici.");
    }

    #[test]
    fn long_description_mentions_exits() {
        let mut loc = Location::new("Croco Island", "un marécage.");
        loc.set_exit(Direction::East, Some(LocationId(1)));
        let text = loc.long_description();
        assert!(text.starts_with("Vous venez d'arriver dans Croco Island"));
        assert!(text.ends_with("Sorties: E"));
    }
}
