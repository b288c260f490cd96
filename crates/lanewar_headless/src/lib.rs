//! Headless game runner for AI testing and CI verification.
//!
//! This crate provides a headless game runner that can be controlled via
//! JSON commands on stdin, with game state output on stdout. This enables:
//!
//! - **AI testing**: An agent can play the game without graphics
//! - **CI verification**: Automated testing of game logic and determinism
//! - **Replay verification**: Check that replays produce identical results
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from controller (tick, build, train, ability, etc.)
//! - **stdout**: State updates and responses (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response specification.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! echo '{"cmd":"tick","count":60}' | cargo run -p lanewar_headless
//!
//! # Record a session, then check it replays
//! cargo run -p lanewar_headless -- run --record session.replay
//! cargo run -p lanewar_headless -- replay --file session.replay --verify
//! ```

pub mod error;
pub mod protocol;
pub mod runner;
pub mod session;

pub use error::RunnerError;
pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner};
