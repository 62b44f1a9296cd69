use std::collections::HashMap;

use rand::rngs::StdRng;
use tracing::debug;

use crate::character::{Character, CharacterId, Wander};
use crate::error::{CoreError, CoreResult};
use crate::location::{Direction, Location, LocationId};

/// The world graph. Owns every location and character.
///
/// Locations and characters refer to each other by id only; this type is
/// the single place where both sides of that link are updated.
#[derive(Debug, Clone, Default)]
pub struct World {
    locations: Vec<Location>,
    characters: Vec<Character>,
    by_name: HashMap<String, LocationId>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Locations
    // -----------------------------------------------------------------------

    /// Add a location. Names must be unique.
    pub fn add_location(&mut self, location: Location) -> CoreResult<LocationId> {
        if self.by_name.contains_key(&location.name) {
            return Err(CoreError::DuplicateLocation(location.name));
        }
        let id = LocationId(self.locations.len());
        self.by_name.insert(location.name.clone(), id);
        self.locations.push(location);
        Ok(id)
    }

    /// Get a location by id.
    ///
    /// # Panics
    ///
    /// Ids are only handed out by this world, so an unknown id is a
    /// programming error.
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0]
    }

    /// Get a mutable location by id.
    pub fn location_mut(&mut self, id: LocationId) -> &mut Location {
        &mut self.locations[id.0]
    }

    /// Find a location by exact name.
    pub fn find_location(&self, name: &str) -> Option<LocationId> {
        self.by_name.get(name).copied()
    }

    /// Like [`find_location`](Self::find_location), as an error.
    pub fn require_location(&self, name: &str) -> CoreResult<LocationId> {
        self.find_location(name)
            .ok_or_else(|| CoreError::LocationNotFound(name.to_string()))
    }

    /// Number of locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Open a one-way passage. The reverse direction is not implied.
    pub fn connect(&mut self, from: LocationId, direction: Direction, to: LocationId) {
        self.location_mut(from).set_exit(direction, Some(to));
    }

    /// Declare a closed passage.
    pub fn close_exit(&mut self, from: LocationId, direction: Direction) {
        self.location_mut(from).set_exit(direction, None);
    }

    /// Targets of the open exits of a location.
    pub fn open_exits(&self, id: LocationId) -> Vec<LocationId> {
        self.location(id).open_exits()
    }

    // -----------------------------------------------------------------------
    // Characters
    // -----------------------------------------------------------------------

    /// Add a character and register it at its starting location.
    pub fn add_character(&mut self, character: Character) -> CharacterId {
        let id = CharacterId(self.characters.len());
        let at = character.location;
        self.characters.push(character);
        self.location_mut(at).add_character(id);
        id
    }

    /// Get a character by id.
    pub fn character(&self, id: CharacterId) -> &Character {
        &self.characters[id.0]
    }

    /// Get a mutable character by id.
    pub fn character_mut(&mut self, id: CharacterId) -> &mut Character {
        &mut self.characters[id.0]
    }

    /// Every character, in creation order.
    pub fn characters(&self) -> impl Iterator<Item = (CharacterId, &Character)> {
        self.characters
            .iter()
            .enumerate()
            .map(|(i, c)| (CharacterId(i), c))
    }

    /// Characters currently at a location.
    pub fn characters_at(&self, id: LocationId) -> Vec<&Character> {
        self.location(id)
            .characters()
            .iter()
            .map(|c| self.character(*c))
            .collect()
    }

    /// First character at `at` whose name contains `query`, ignoring case.
    pub fn find_character_at(&self, at: LocationId, query: &str) -> Option<CharacterId> {
        self.location(at)
            .characters()
            .iter()
            .copied()
            .find(|c| self.character(*c).answers_to(query))
    }

    /// Move a character: removed from its old room and added to the new one
    /// in the same call, so no room keeps a stale entry.
    pub fn place_character(&mut self, id: CharacterId, to: LocationId) {
        let from = self.characters[id.0].location;
        self.location_mut(from).remove_character(id);
        self.location_mut(to).add_character(id);
        self.characters[id.0].location = to;
    }

    /// Let a character wander one step. Returns the `(from, to)` pair if it
    /// moved.
    pub fn wander(
        &mut self,
        id: CharacterId,
        policy: &dyn Wander,
        rng: &mut StdRng,
    ) -> Option<(LocationId, LocationId)> {
        let from = self.character(id).location;
        let exits = self.open_exits(from);
        let to = policy.next_stop(&exits, rng)?;
        self.place_character(id, to);
        debug!(
            npc = %self.character(id).name,
            from = %self.location(from).name,
            to = %self.location(to).name,
            "character moved"
        );
        Some((from, to))
    }
}
