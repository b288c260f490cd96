//! # Lanewar Core
//!
//! Deterministic simulation core for a two-lane base defense game.
//!
//! This crate contains **only** game logic:
//! - No rendering
//! - No audio playback (sound cues are emitted as events)
//! - No wall-clock time (every timer reads the simulation clock)
//! - No system randomness (a seeded `ChaCha8` stream is part of the state)
//! - No floating-point math in the tick loop (uses fixed-point)
//!
//! This separation enables:
//! - Headless runners and tests
//! - Replays that reproduce a session bit for bit
//! - Save/restore through plain serialization
//!
//! ## Crate Structure
//!
//! - [`simulation`] - The [`Simulation`](simulation::Simulation) and its tick loop
//! - [`kind`] - The 14 entity kinds with their stats and catalogs
//! - [`components`], [`store`] - Entity data and ownership
//! - [`economy`], [`combat`], [`movement`], [`waves`], [`abilities`], [`supply`] - Rules
//! - [`world`], [`clock`] - Map and time
//! - [`events`], [`snapshot`] - Output for presenters
//! - [`config`] - Tunable rules, loadable from RON
//! - [`replay`] - Recording and playback
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod abilities;
pub mod clock;
pub mod combat;
pub mod components;
pub mod config;
pub mod economy;
pub mod error;
pub mod events;
pub mod kind;
pub mod math;
pub mod movement;
pub mod replay;
pub mod simulation;
pub mod snapshot;
pub mod store;
pub mod supply;
pub mod waves;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::abilities::Ability;
    pub use crate::components::{Entity, EntityId, Faction};
    pub use crate::config::{GameConfig, RulesConfig, WorldConfig};
    pub use crate::error::{ActionError, GameError, Result};
    pub use crate::events::{GameOutcome, SoundCue, TickEvents};
    pub use crate::kind::EntityKind;
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::replay::{Replay, ReplayAction};
    pub use crate::simulation::{ActionResult, Simulation};
    pub use crate::snapshot::{Hud, Snapshot};
    pub use crate::world::Lane;
}
