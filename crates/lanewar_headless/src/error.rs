//! Errors raised by the headless runner itself.
//!
//! Malformed commands and refused actions are reported to the controller as
//! responses; only transport failures end a session.

use thiserror::Error;

use lanewar_core::error::GameError;

/// Runner failure.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Reading commands or writing responses failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Loading a config or saving a replay failed.
    #[error(transparent)]
    Game(#[from] GameError),
}
