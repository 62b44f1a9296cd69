//! Core types for Corsair: the world graph, inventories, characters, quests
//! and the player session.
//!
//! This crate holds the game state and every state transition that has an
//! invariant attached to it. It never prints: operations return either a
//! value, a [`CoreError`] whose message is meant for the player, or a list of
//! [`QuestEvent`]s that the caller renders.

/// Non-player characters and their wandering behaviour.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// Quantity-tracked item containers.
pub mod inventory;
/// Locations, exits and direction tokens.
pub mod location;
/// Player session state.
pub mod player;
/// Quests, objectives and the quest manager.
pub mod quest;
/// The arena that owns locations and characters.
pub mod world;

/// Re-export character types.
pub use character::{Character, CharacterId, CoinFlipWander, Wander};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export inventory types.
pub use inventory::{Inventory, ItemEntry};
/// Re-export location types.
pub use location::{Direction, Location, LocationId};
/// Re-export player types.
pub use player::Player;
/// Re-export quest types.
pub use quest::{Objective, ObjectiveKind, Quest, QuestEvent, QuestManager, QuestStatus};
/// Re-export world model types.
pub use world::World;
