//! Player session state.

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::location::{Direction, LocationId};
use crate::quest::{MOVE_COUNTER, Quest, QuestEvent, QuestManager};
use crate::world::World;

/// Accepted player name lengths, in characters.
pub const NAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=15;

/// Crew size a new player starts with.
pub const DEFAULT_CREW: u32 = 5;

/// Inventory key of the currency item.
pub const GOLD: &str = "pièce";

const GOLD_DESCRIPTION: &str = "une pièce d'or";
const GOLD_WEIGHT: f64 = 0.1;

/// The player: position, history, belongings, crew and quests.
#[derive(Debug, Clone)]
pub struct Player {
    /// Player name.
    pub name: String,
    /// Items carried.
    pub inventory: Inventory,
    quests: QuestManager,
    location: LocationId,
    history: Vec<LocationId>,
    move_count: u32,
    crew: u32,
    rewards: Vec<String>,
}

impl Player {
    /// Create a player at `start`, validating the name length.
    pub fn new(name: &str, start: LocationId) -> CoreResult<Self> {
        let name = name.trim();
        if !NAME_LENGTH.contains(&name.chars().count()) {
            return Err(CoreError::InvalidName {
                min: *NAME_LENGTH.start(),
                max: *NAME_LENGTH.end(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            inventory: Inventory::new(),
            quests: QuestManager::new(),
            location: start,
            history: Vec::new(),
            move_count: 0,
            crew: DEFAULT_CREW,
            rewards: Vec::new(),
        })
    }

    /// Set the starting crew size.
    pub fn with_crew(mut self, crew: u32) -> Self {
        self.crew = crew;
        self
    }

    /// Current location.
    pub fn location(&self) -> LocationId {
        self.location
    }

    /// Previously visited locations, oldest first.
    pub fn history(&self) -> &[LocationId] {
        &self.history
    }

    /// Successful moves so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Crew size.
    pub fn crew(&self) -> u32 {
        self.crew
    }

    /// Rewards earned, in the order they were granted.
    pub fn rewards(&self) -> &[String] {
        &self.rewards
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// Follow the exit in `direction`.
    ///
    /// A closed or missing exit fails without changing anything. On
    /// success the previous room is pushed onto the history, visit
    /// objectives are checked against the new room, the move counter is
    /// incremented and counter objectives are checked against it.
    pub fn move_to(&mut self, world: &World, direction: Direction) -> CoreResult<Vec<QuestEvent>> {
        let next = world
            .location(self.location)
            .get_exit(direction)
            .ok_or(CoreError::NoExit(direction))?;

        self.history.push(self.location);
        self.location = next;
        debug!(player = %self.name, to = %world.location(next).name, "player moved");

        let mut events = self.quests.check_room_objectives(&world.location(next).name);
        self.move_count += 1;
        events.extend(self.quests.check_counter_objectives(MOVE_COUNTER, self.move_count));
        self.absorb(&events);
        Ok(events)
    }

    /// Return to the previous room. Objectives are not re-evaluated and the
    /// move counter is left alone.
    pub fn back(&mut self) -> CoreResult<LocationId> {
        let previous = self.history.pop().ok_or(CoreError::NoHistory)?;
        self.location = previous;
        Ok(previous)
    }

    /// Names of visited rooms, oldest first.
    pub fn history_summary(&self, world: &World) -> String {
        let mut out = "Vous avez déjà visité les pièces suivantes :".to_string();
        if self.history.is_empty() {
            out.push_str("\n- (aucune pour le moment)");
        }
        for id in &self.history {
            out.push_str(&format!("\n- {}", world.location(*id).name));
        }
        out
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// Pick up one unit of `item` from the current room.
    pub fn take(&mut self, world: &mut World, item: &str) -> CoreResult<()> {
        let room = &mut world.location_mut(self.location).inventory;
        if !room.contains(item) {
            return Err(CoreError::ItemNotHere(item.to_string()));
        }
        Inventory::transfer_one(room, &mut self.inventory, item)
    }

    /// Put one unit of `item` down in the current room.
    pub fn drop_item(&mut self, world: &mut World, item: &str) -> CoreResult<()> {
        let room = &mut world.location_mut(self.location).inventory;
        Inventory::transfer_one(&mut self.inventory, room, item)
    }

    /// Crew line followed by every carried item.
    pub fn inventory_summary(&self) -> String {
        let mut out = format!("Équipage : {} hommes", self.crew);
        if self.inventory.is_empty() {
            out.push_str("\nVotre inventaire est vide.");
            return out;
        }
        out.push_str("\nVous disposez des items suivants :");
        for (name, entry) in self.inventory.iter() {
            out.push_str(&format!(
                "\n    - {name} (x{}) : {} ({} kg)",
                entry.quantity, entry.description, entry.weight
            ));
        }
        out
    }

    /// Gold coins carried.
    pub fn gold(&self) -> u32 {
        self.inventory.quantity(GOLD)
    }

    /// Add gold coins.
    pub fn give_gold(&mut self, amount: u32) {
        self.inventory
            .add(GOLD, GOLD_DESCRIPTION, GOLD_WEIGHT, amount);
    }

    /// Spend gold coins. Fails untouched when short.
    pub fn spend_gold(&mut self, amount: u32) -> CoreResult<()> {
        self.inventory.remove(GOLD, amount).map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Crew
    // -----------------------------------------------------------------------

    /// Recruit sailors.
    pub fn add_crew(&mut self, count: u32) {
        self.crew += count;
    }

    /// Lose sailors; the crew never goes below zero.
    pub fn lose_crew(&mut self, count: u32) {
        self.crew = self.crew.saturating_sub(count);
    }

    // -----------------------------------------------------------------------
    // Quests and rewards
    // -----------------------------------------------------------------------

    /// Record a reward. Duplicates are ignored.
    pub fn add_reward(&mut self, reward: impl Into<String>) -> bool {
        let reward = reward.into();
        if self.rewards.contains(&reward) {
            return false;
        }
        self.rewards.push(reward);
        true
    }

    /// Rewards earned so far.
    pub fn rewards_summary(&self) -> String {
        if self.rewards.is_empty() {
            return "Aucune récompense obtenue pour le moment.".to_string();
        }
        let mut out = "🎁 Vos récompenses :".to_string();
        for reward in &self.rewards {
            out.push_str(&format!("\n  - {reward}"));
        }
        out
    }

    /// Quests of this player. Every change goes through the methods below so
    /// that rewards are collected.
    pub fn quests(&self) -> &QuestManager {
        &self.quests
    }

    /// Register a quest.
    pub fn add_quest(&mut self, quest: Quest) {
        self.quests.add_quest(quest);
    }

    /// Activate a quest by title.
    pub fn activate_quest(&mut self, title: &str) -> Option<QuestEvent> {
        self.quests.activate_quest(title)
    }

    /// Complete an objective by label and collect any reward.
    pub fn complete_objective(&mut self, text: &str) -> Vec<QuestEvent> {
        let events = self.quests.complete_objective(text);
        self.absorb(&events);
        events
    }

    /// Report an action for action objectives and collect any reward.
    pub fn record_action(&mut self, verb: &str, target: Option<&str>) -> Vec<QuestEvent> {
        let events = self.quests.check_action_objectives(verb, target);
        self.absorb(&events);
        events
    }

    /// Check visit objectives against a room and collect any reward.
    pub fn check_room(&mut self, room: &str) -> Vec<QuestEvent> {
        let events = self.quests.check_room_objectives(room);
        self.absorb(&events);
        events
    }

    /// Live counter values, for quest progress display.
    pub fn counters(&self) -> Vec<(&'static str, u32)> {
        vec![(MOVE_COUNTER, self.move_count)]
    }

    fn absorb(&mut self, events: &[QuestEvent]) {
        for event in events {
            if let QuestEvent::Completed {
                reward: Some(reward),
                ..
            } = event
            {
                self.add_reward(reward.clone());
            }
        }
    }
}
