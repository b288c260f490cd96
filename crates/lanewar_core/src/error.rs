//! Error types for the game simulation.
//!
//! Two families live here. [`GameError`] covers real failures (bad
//! identifiers, config and replay I/O). [`ActionError`] covers player
//! actions the rules refuse; those are recoverable, and their `Display`
//! text is exactly the line written to the in-game log.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A type identifier did not name any entity kind.
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    /// An ability identifier did not name any ability.
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    /// Config file parsing error.
    #[error("Failed to parse config '{path}': {message}")]
    ConfigParseError {
        /// Path (or `<inline>`) of the config that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File path involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Replay format version does not match this build.
    #[error("Replay version mismatch: expected {expected}, got {found}")]
    ReplayVersion {
        /// Version this build writes.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Reason a player action was refused.
///
/// Refusals never mutate state apart from the log line they produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Not enough resources to place a structure.
    #[error("Not enough funds to build")]
    CannotAffordStructure,

    /// Not enough resources to train a unit.
    #[error("Not enough resources")]
    CannotAffordUnit,

    /// The structure that trains this unit is missing.
    #[error("Required structures are missing")]
    MissingPrerequisite,

    /// Training would exceed the population cap.
    #[error("Not enough population capacity")]
    PopulationCapped,

    /// Production needs at least some stored energy.
    #[error("Not enough energy for production")]
    NoEnergy,

    /// Airstrike energy check failed.
    #[error("Not enough energy for an airstrike")]
    AirstrikeEnergy,

    /// Repair energy check failed.
    #[error("Not enough energy for repairs")]
    RepairEnergy,

    /// Boost energy check failed.
    #[error("Not enough energy for a rally cry")]
    BoostEnergy,

    /// An airstrike was confirmed without being called first.
    #[error("No airstrike is waiting for a target")]
    NoPendingAirstrike,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_messages_are_log_lines() {
        assert_eq!(
            ActionError::MissingPrerequisite.to_string(),
            "Required structures are missing"
        );
        assert_eq!(
            ActionError::CannotAffordStructure.to_string(),
            "Not enough funds to build"
        );
    }

    #[test]
    fn test_game_error_display() {
        let err = GameError::ReplayVersion {
            expected: 1,
            found: 7,
        };
        assert_eq!(err.to_string(), "Replay version mismatch: expected 1, got 7");
    }
}
