//! Entity kinds and their stat tables.
//!
//! Every entity in a session is one of fourteen [`EntityKind`]s. Stats,
//! build costs and training requirements are looked up by exhaustive
//! `match`, so adding a kind without stats is a compile error rather
//! than a silent "type not found" at runtime.
//!
//! # Example
//!
//! ```
//! use lanewar_core::kind::EntityKind;
//!
//! let kind: EntityKind = "power".parse().unwrap();
//! assert_eq!(kind, EntityKind::Power);
//! assert_eq!(kind.buildable().map(|b| b.cost), Some(500));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::math::Fixed;

/// Closed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Player rifle squad.
    Infantry,
    /// Player anti-structure rocket squad.
    Rocket,
    /// Player main battle tank.
    Tank,
    /// Player supply truck (gathers, never fights).
    Truck,
    /// Weakest enemy wave unit.
    EnemyLight,
    /// Mid-tier enemy wave unit.
    EnemyHeavy,
    /// Long-range enemy wave unit.
    EnemyArty,
    /// Defensive tower.
    Turret,
    /// Defensive bunker.
    Bunker,
    /// Supply center (unlocks trucks).
    Supply,
    /// Power plant.
    Power,
    /// Headquarters; losing it ends the game.
    Hq,
    /// War factory (unlocks tanks).
    Factory,
    /// Barracks (unlocks infantry and rockets).
    Barracks,
}

/// Base stats of a mobile unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    /// Maximum hit points.
    pub hp: u32,
    /// Movement speed in world units per second.
    pub speed: u32,
    /// Attack range; zero means the unit never attacks.
    pub range: u32,
    /// Damage per shot.
    pub damage: u32,
    /// Damage multiplier against buildings, in percent.
    pub versus_building_pct: Option<u32>,
    /// Resources delivered per completed route (trucks).
    pub gather: Option<u32>,
}

/// Base stats of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureStats {
    /// Maximum hit points.
    pub hp: u32,
    /// Attack range (zero for non-defensive structures).
    pub range: u32,
    /// Damage per shot (zero for non-defensive structures).
    pub damage: u32,
}

/// Build catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buildable {
    /// Resource cost.
    pub cost: u32,
    /// Power produced (positive) or drained (negative).
    pub power: i32,
    /// Population capacity added.
    pub pop_cap: u32,
}

/// Training catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trainable {
    /// Resource cost.
    pub cost: u32,
    /// Population consumed while alive.
    pub pop: u32,
    /// Structure the player must own to train this unit.
    pub prerequisite: EntityKind,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Infantry,
        Self::Rocket,
        Self::Tank,
        Self::Truck,
        Self::EnemyLight,
        Self::EnemyHeavy,
        Self::EnemyArty,
        Self::Turret,
        Self::Bunker,
        Self::Supply,
        Self::Power,
        Self::Hq,
        Self::Factory,
        Self::Barracks,
    ];

    /// Kinds offered in the build menu, in menu order.
    pub const BUILD_MENU: [Self; 6] = [
        Self::Power,
        Self::Supply,
        Self::Barracks,
        Self::Factory,
        Self::Turret,
        Self::Bunker,
    ];

    /// Kinds offered in the training menu, in menu order.
    pub const TRAIN_MENU: [Self; 4] = [Self::Infantry, Self::Rocket, Self::Truck, Self::Tank];

    /// Stable string identifier used by UI buttons and the headless protocol.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infantry => "infantry",
            Self::Rocket => "rocket",
            Self::Tank => "tank",
            Self::Truck => "truck",
            Self::EnemyLight => "enemy_light",
            Self::EnemyHeavy => "enemy_heavy",
            Self::EnemyArty => "enemy_arty",
            Self::Turret => "turret",
            Self::Bunker => "bunker",
            Self::Supply => "supply",
            Self::Power => "power",
            Self::Hq => "hq",
            Self::Factory => "factory",
            Self::Barracks => "barracks",
        }
    }

    /// Human-readable name used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Infantry => "Infantry",
            Self::Rocket => "Rocket trooper",
            Self::Tank => "Battle tank",
            Self::Truck => "Supply truck",
            Self::EnemyLight => "Raider",
            Self::EnemyHeavy => "Assault walker",
            Self::EnemyArty => "Siege gun",
            Self::Turret => "Defense tower",
            Self::Bunker => "Bunker",
            Self::Supply => "Supply center",
            Self::Power => "Power plant",
            Self::Hq => "Headquarters",
            Self::Factory => "War factory",
            Self::Barracks => "Barracks",
        }
    }

    /// Whether this kind is a building rather than a mobile unit.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(
            self,
            Self::Turret
                | Self::Bunker
                | Self::Supply
                | Self::Power
                | Self::Hq
                | Self::Factory
                | Self::Barracks
        )
    }

    /// Whether a structure of this kind fires at enemies.
    #[must_use]
    pub const fn is_defensive(self) -> bool {
        matches!(self, Self::Turret | Self::Bunker)
    }

    /// Unit stats, or `None` for structures.
    #[must_use]
    pub const fn unit_stats(self) -> Option<UnitStats> {
        let (hp, speed, range, damage, versus_building_pct, gather) = match self {
            Self::Infantry => (120, 80, 70, 14, Some(60), None),
            Self::Rocket => (110, 75, 110, 22, Some(130), None),
            Self::Tank => (320, 65, 85, 26, Some(110), None),
            Self::Truck => (180, 90, 0, 0, None, Some(80)),
            Self::EnemyLight => (130, 80, 70, 13, None, None),
            Self::EnemyHeavy => (280, 65, 95, 24, None, None),
            Self::EnemyArty => (180, 55, 160, 16, None, None),
            Self::Turret
            | Self::Bunker
            | Self::Supply
            | Self::Power
            | Self::Hq
            | Self::Factory
            | Self::Barracks => return None,
        };
        Some(UnitStats {
            hp,
            speed,
            range,
            damage,
            versus_building_pct,
            gather,
        })
    }

    /// Structure stats, or `None` for units.
    #[must_use]
    pub const fn structure_stats(self) -> Option<StructureStats> {
        let (hp, range, damage) = match self {
            Self::Turret => (320, 180, 18),
            Self::Bunker => (420, 140, 14),
            Self::Supply => (340, 0, 0),
            Self::Power => (260, 0, 0),
            Self::Barracks => (300, 0, 0),
            Self::Factory => (360, 0, 0),
            Self::Hq => (800, 0, 0),
            Self::Infantry
            | Self::Rocket
            | Self::Tank
            | Self::Truck
            | Self::EnemyLight
            | Self::EnemyHeavy
            | Self::EnemyArty => return None,
        };
        Some(StructureStats { hp, range, damage })
    }

    /// Maximum hit points for any kind.
    #[must_use]
    pub const fn max_hp(self) -> u32 {
        match (self.unit_stats(), self.structure_stats()) {
            (Some(unit), _) => unit.hp,
            (None, Some(structure)) => structure.hp,
            (None, None) => 0,
        }
    }

    /// Maximum hit points as a fixed-point value.
    #[must_use]
    pub fn max_hp_fixed(self) -> Fixed {
        Fixed::from_num(self.max_hp())
    }

    /// Build catalog entry, or `None` if the player cannot build this kind.
    #[must_use]
    pub const fn buildable(self) -> Option<Buildable> {
        let (cost, power, pop_cap) = match self {
            Self::Power => (500, 6, 0),
            Self::Supply => (650, -2, 2),
            Self::Barracks => (420, -3, 4),
            Self::Factory => (850, -4, 5),
            Self::Turret => (500, -2, 0),
            Self::Bunker => (700, -2, 0),
            _ => return None,
        };
        Some(Buildable {
            cost,
            power,
            pop_cap,
        })
    }

    /// Training catalog entry, or `None` if the player cannot train this kind.
    #[must_use]
    pub const fn trainable(self) -> Option<Trainable> {
        let (cost, pop, prerequisite) = match self {
            Self::Infantry => (140, 1, Self::Barracks),
            Self::Rocket => (220, 1, Self::Barracks),
            Self::Truck => (300, 1, Self::Supply),
            Self::Tank => (520, 2, Self::Factory),
            _ => return None,
        };
        Some(Trainable {
            cost,
            pop,
            prerequisite,
        })
    }

    /// Population a live unit of this kind occupies.
    #[must_use]
    pub const fn pop_cost(self) -> u32 {
        match self.trainable() {
            Some(entry) => entry.pop,
            None => 0,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GameError::UnknownKind(s.to_string()))
    }
}
