use crate::location::Direction;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Recoverable failures of world and player operations.
///
/// The `Display` output is the text shown to the player. None of these
/// leave the state half-modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No passage in that direction.
    #[error("{}", no_exit_message(.0))]
    NoExit(Direction),

    /// The history stack is empty.
    #[error("Impossible de revenir en arrière : aucun historique.")]
    NoHistory,

    /// The item is not in the current room.
    #[error("'{0}' n'est pas présent dans cette pièce.")]
    ItemNotHere(String),

    /// The player does not carry the item.
    #[error("Vous ne possédez pas '{0}'.")]
    ItemNotCarried(String),

    /// Not enough units of an item.
    #[error("Pas assez de '{item}' (il en faut {needed}, vous en avez {available}).")]
    NotEnough {
        /// Item name.
        item: String,
        /// Requested quantity.
        needed: u32,
        /// Quantity held.
        available: u32,
    },

    /// No character with that name in the room.
    #[error("Il n'y a personne du nom de '{0}' ici.")]
    CharacterNotHere(String),

    /// No quest with that title.
    #[error("Quête '{0}' non trouvée.")]
    QuestNotFound(String),

    /// The quest exists but cannot be activated (already active or done).
    #[error("Impossible d'activer '{0}'.")]
    QuestNotActivatable(String),

    /// Player name outside the accepted length bounds.
    #[error("Entrez un nom entre {min} et {max} caractères.")]
    InvalidName {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },

    /// A location with the same name already exists.
    #[error("location already exists: \"{0}\"")]
    DuplicateLocation(String),

    /// A named location could not be resolved.
    #[error("location not found: \"{0}\"")]
    LocationNotFound(String),
}

fn no_exit_message(direction: &Direction) -> &'static str {
    if direction.is_vertical() {
        "Il n'y a pas d'échelle pour monter ou descendre !"
    } else {
        "Notre perroquet n'a aperçu aucune île dans cette direction !"
    }
}
