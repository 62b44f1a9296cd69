//! Error types for the game engine.

use corsair_core::CoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while running a game session.
///
/// Everything except [`GameError::Content`] and [`GameError::Json`] is a
/// recoverable turn failure whose message is shown to the player.
#[derive(Debug, Error)]
pub enum GameError {
    /// A world or player operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The verb is not registered.
    #[error("{}", unknown_command_message(.verb, .suggestion))]
    UnknownCommand {
        /// The verb as typed, lower-cased.
        verb: String,
        /// A registered verb that looks close, if any.
        suggestion: Option<String>,
    },

    /// Wrong number of parameters for a command.
    #[error("La commande '{verb}' {}", arity_message(.takes_parameter))]
    Arity {
        /// The verb as typed.
        verb: String,
        /// Whether the command expects a parameter at all.
        takes_parameter: bool,
    },

    /// The direction token is not one of N, E, S, O, U, D.
    #[error("Direction '{0}' inconnue. Directions possibles : N, E, S, O, U, D.")]
    UnknownDirection(String),

    /// A gate refused the move.
    #[error("{0}")]
    GateRefused(String),

    /// An answer that the pending encounter cannot use.
    #[error("Choix invalide ({expected}).")]
    InvalidChoice {
        /// The accepted answers.
        expected: String,
    },

    /// The world content is inconsistent.
    #[error("invalid world content: {0}")]
    Content(String),

    /// The world content is not valid JSON.
    #[error("invalid world file: {0}")]
    Json(#[from] serde_json::Error),
}

fn unknown_command_message(verb: &str, suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(
            "Commande '{verb}' non reconnue. Vouliez-vous dire '{s}' ? Entrez 'help'."
        ),
        None => format!("Commande '{verb}' non reconnue. Entrez 'help'."),
    }
}

fn arity_message(takes_parameter: &bool) -> &'static str {
    if *takes_parameter {
        "prend 1 seul paramètre."
    } else {
        "ne prend pas de paramètre."
    }
}
