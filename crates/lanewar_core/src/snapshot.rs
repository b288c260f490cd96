//! Read-only views for presenters.
//!
//! Views convert fixed-point values to plain numbers. They are produced
//! from simulation state and never fed back into it.

use serde::{Deserialize, Serialize};

use crate::clock::SimClock;
use crate::components::{Entity, EntityId, Faction};
use crate::economy::Economy;
use crate::events::GameOutcome;
use crate::kind::EntityKind;
use crate::math::{Fixed, Vec2Fixed};
use crate::world::SupplyDrop;

/// Heads-up display numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hud {
    /// Resources, floored.
    pub resources: i64,
    /// Stored energy, floored.
    pub energy: i64,
    /// Energy capacity.
    pub energy_cap: u32,
    /// Population in use.
    pub pop: u32,
    /// Population capacity.
    pub pop_cap: u32,
    /// Level of the next wave.
    pub wave: u32,
    /// Score.
    pub score: u32,
    /// Session clock as `mm:ss`.
    pub time: String,
}

impl Hud {
    /// Assemble the HUD from the pieces of state it shows.
    #[must_use]
    pub fn capture(economy: &Economy, wave: u32, score: u32, clock: &SimClock) -> Self {
        Self {
            resources: economy.resources.floor().to_num(),
            energy: economy.energy.floor().to_num(),
            energy_cap: economy.energy_cap,
            pop: economy.pop,
            pop_cap: economy.pop_cap,
            wave,
            score,
            time: clock.label(),
        }
    }
}

/// A point in presenter coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl From<Vec2Fixed> for Point {
    fn from(v: Vec2Fixed) -> Self {
        Self {
            x: v.x.to_num(),
            y: v.y.to_num(),
        }
    }
}

/// One entity as a presenter sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    /// Entity id.
    pub id: EntityId,
    /// Kind.
    pub kind: EntityKind,
    /// Faction.
    pub faction: Faction,
    /// Position.
    pub position: Point,
    /// Current hit points.
    pub hp: f64,
    /// Hit points at full health.
    pub max_hp: u32,
    /// Drawn as a building.
    pub is_structure: bool,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            faction: entity.faction,
            position: entity.position.into(),
            hp: entity.hp.to_num(),
            max_hp: entity.kind.max_hp(),
            is_structure: entity.is_structure(),
        }
    }
}

/// A supply drop and its countdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropView {
    /// Drop point.
    pub position: Point,
    /// Seconds until the next crate.
    pub timer: f64,
}

impl From<&SupplyDrop> for DropView {
    fn from(drop: &SupplyDrop) -> Self {
        Self {
            position: drop.position.into(),
            timer: drop.timer.max(Fixed::ZERO).to_num(),
        }
    }
}

/// Everything a renderer or UI needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Live entities in creation order.
    pub entities: Vec<EntityView>,
    /// HUD numbers.
    pub hud: Hud,
    /// Log lines, newest first.
    pub log: Vec<String>,
    /// The session has ended.
    pub game_over: bool,
    /// How it ended.
    pub outcome: Option<GameOutcome>,
    /// Updates are suspended.
    pub paused: bool,
    /// Airstrike target marker awaiting confirmation.
    pub pending_strike: Option<Point>,
    /// Impact points of strikes in flight.
    pub strikes_in_flight: Vec<Point>,
    /// Supply drops.
    pub supply_drops: Vec<DropView>,
}
