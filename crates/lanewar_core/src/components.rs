//! Entity data.
//!
//! An [`Entity`] is plain data: identity, kind, faction, position, hit
//! points and an attack cooldown, plus a [`Body`] carrying the fields that
//! only structures or only units have. Behavior lives in the systems.

use serde::{Deserialize, Serialize};

use crate::kind::EntityKind;
use crate::math::{fixed_serde, option_fixed_serde, Fixed, Vec2Fixed};

/// Unique identifier for entities.
pub type EntityId = u64;

/// Side an entity fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// The human player.
    #[default]
    Player,
    /// The wave-spawning opponent.
    Enemy,
}

impl Faction {
    /// The opposing faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Weapon mounted on a structure. Zero range means unarmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Armament {
    /// Attack range.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Damage per shot.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
}

/// Mobile unit state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    /// World units per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Attack range; zero for trucks.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Damage per shot.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Waypoints to follow, in order.
    pub path: Option<Vec<Vec2Fixed>>,
    /// Index of the waypoint currently being approached.
    pub waypoint: usize,
    /// Resources delivered at the end of each route (trucks only).
    #[serde(with = "option_fixed_serde")]
    pub gather: Option<Fixed>,
    /// Simulation time until which the damage boost applies.
    #[serde(with = "option_fixed_serde")]
    pub boosted_until: Option<Fixed>,
}

impl UnitState {
    /// Whether the boost window is open at `now`.
    #[must_use]
    pub fn is_boosted(&self, now: Fixed) -> bool {
        self.boosted_until.is_some_and(|until| now < until)
    }

    /// The waypoint being approached, if the path has one left.
    #[must_use]
    pub fn current_waypoint(&self) -> Option<Vec2Fixed> {
        self.path.as_ref()?.get(self.waypoint).copied()
    }

    /// Number of waypoints on the assigned path.
    #[must_use]
    pub fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }
}

/// Class-specific entity data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    /// A building.
    Structure(Armament),
    /// A mobile unit.
    Unit(UnitState),
}

/// A building or unit in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// What this entity is.
    pub kind: EntityKind,
    /// Side it fights for.
    pub faction: Faction,
    /// World position.
    pub position: Vec2Fixed,
    /// Remaining hit points; the entity is purged at zero or below.
    #[serde(with = "fixed_serde")]
    pub hp: Fixed,
    /// Seconds until the next shot may fire.
    #[serde(with = "fixed_serde")]
    pub cooldown: Fixed,
    /// Structure or unit data.
    pub body: Body,
}

impl Entity {
    /// Build a structure of `kind` at full health.
    ///
    /// Returns `None` if `kind` is not a structure.
    #[must_use]
    pub fn structure(id: EntityId, kind: EntityKind, position: Vec2Fixed, faction: Faction) -> Option<Self> {
        let stats = kind.structure_stats()?;
        Some(Self {
            id,
            kind,
            faction,
            position,
            hp: Fixed::from_num(stats.hp),
            cooldown: Fixed::ZERO,
            body: Body::Structure(Armament {
                range: Fixed::from_num(stats.range),
                damage: Fixed::from_num(stats.damage),
            }),
        })
    }

    /// Build a unit of `kind` at full health following `path`.
    ///
    /// Returns `None` if `kind` is not a unit.
    #[must_use]
    pub fn unit(
        id: EntityId,
        kind: EntityKind,
        position: Vec2Fixed,
        faction: Faction,
        path: Option<Vec<Vec2Fixed>>,
    ) -> Option<Self> {
        let stats = kind.unit_stats()?;
        Some(Self {
            id,
            kind,
            faction,
            position,
            hp: Fixed::from_num(stats.hp),
            cooldown: Fixed::ZERO,
            body: Body::Unit(UnitState {
                speed: Fixed::from_num(stats.speed),
                range: Fixed::from_num(stats.range),
                damage: Fixed::from_num(stats.damage),
                path,
                waypoint: 0,
                gather: stats.gather.map(Fixed::from_num),
                boosted_until: None,
            }),
        })
    }

    /// Whether this entity is a building.
    #[must_use]
    pub const fn is_structure(&self) -> bool {
        matches!(self.body, Body::Structure(_))
    }

    /// Whether this entity still has hit points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > Fixed::ZERO
    }

    /// Whether this is the headquarters of `faction`.
    #[must_use]
    pub fn is_hq_of(&self, faction: Faction) -> bool {
        self.kind == EntityKind::Hq && self.faction == faction
    }

    /// Unit state, if this is a unit.
    #[must_use]
    pub const fn unit_state(&self) -> Option<&UnitState> {
        match &self.body {
            Body::Unit(state) => Some(state),
            Body::Structure(_) => None,
        }
    }

    /// Mutable unit state, if this is a unit.
    pub fn unit_state_mut(&mut self) -> Option<&mut UnitState> {
        match &mut self.body {
            Body::Unit(state) => Some(state),
            Body::Structure(_) => None,
        }
    }

    /// Attack range.
    #[must_use]
    pub fn range(&self) -> Fixed {
        match &self.body {
            Body::Structure(armament) => armament.range,
            Body::Unit(state) => state.range,
        }
    }

    /// Base damage per shot.
    #[must_use]
    pub fn damage(&self) -> Fixed {
        match &self.body {
            Body::Structure(armament) => armament.damage,
            Body::Unit(state) => state.damage,
        }
    }

    /// Heal by `amount`, never above the kind's maximum.
    pub fn heal(&mut self, amount: Fixed) {
        let max = self.kind.max_hp_fixed();
        self.hp = (self.hp + amount).min(max);
    }
}
