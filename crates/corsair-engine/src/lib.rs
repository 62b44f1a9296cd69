//! Game engine for Corsair.
//!
//! Sits on top of `corsair-core` and turns player input into turns: command
//! parsing with arity checks, gates in front of guarded locations, scripted
//! encounters that take over the input for a few lines, world content
//! loading, and the [`Game`] session that ties them together.

/// Command parsing and the verb registry.
pub mod command;
/// Session configuration.
pub mod config;
/// Serialisable world content.
pub mod content;
/// Scripted multi-step interactions.
pub mod encounter;
/// Error types for the engine.
pub mod error;
/// Pre-move checks.
pub mod gate;
/// Turn output assembly.
pub mod narrator;
/// The game session controller.
pub mod session;

pub use command::{Arity, Command, CommandRegistry, CommandSpec, Verb};
pub use config::{BackPolicy, GameConfig};
pub use content::WorldContent;
pub use encounter::Encounter;
pub use error::{GameError, GameResult};
pub use gate::{CrewGate, Gate};
pub use session::Game;
