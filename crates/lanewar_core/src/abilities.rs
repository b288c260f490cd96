//! Energy-powered player abilities.
//!
//! Costs are checked and paid by the caller; the functions here only
//! apply effects to the entity store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combat::{self, Kill};
use crate::components::Faction;
use crate::config::RulesConfig;
use crate::error::GameError;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::store::EntityStore;

/// A player ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Delayed area bombardment at a chosen point.
    Airstrike,
    /// Heal every player entity.
    Repair,
    /// Temporary damage bonus for every player unit ("rally cry").
    Boost,
}

impl Ability {
    /// Every ability.
    pub const ALL: [Self; 3] = [Self::Airstrike, Self::Repair, Self::Boost];

    /// Identifier used by the string-keyed API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Airstrike => "airstrike",
            Self::Repair => "repair",
            Self::Boost => "boost",
        }
    }

    /// Energy cost under `rules`.
    #[must_use]
    pub const fn cost(self, rules: &RulesConfig) -> u32 {
        match self {
            Self::Airstrike => rules.airstrike.cost,
            Self::Repair => rules.repair.cost,
            Self::Boost => rules.boost.cost,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ability {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ability| ability.as_str() == s)
            .ok_or_else(|| GameError::UnknownAbility(s.to_string()))
    }
}

/// An airstrike in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledStrike {
    /// Simulation time of impact.
    #[serde(with = "fixed_serde")]
    pub fire_at: Fixed,
    /// Impact point.
    pub point: Vec2Fixed,
}

impl ScheduledStrike {
    /// Whether the strike lands at or before `now`.
    #[must_use]
    pub fn is_due(&self, now: Fixed) -> bool {
        now >= self.fire_at
    }
}

/// Deal the airstrike's flat damage to every live enemy strictly inside
/// the blast radius around `point`.
///
/// Positions are read at impact time, not at confirmation.
pub fn resolve_strike(store: &mut EntityStore, point: Vec2Fixed, rules: &RulesConfig) -> Vec<Kill> {
    let victims: Vec<_> = store
        .iter()
        .filter(|e| e.faction == Faction::Enemy && e.is_alive())
        .filter(|e| e.position.within(point, rules.airstrike.radius))
        .map(|e| e.id)
        .collect();

    victims
        .into_iter()
        .filter_map(|id| combat::apply_damage(store, id, rules.airstrike.damage, rules))
        .collect()
}

/// Heal every player entity, capped at its kind's maximum.
///
/// Returns the number of entities touched.
pub fn apply_repair(store: &mut EntityStore, rules: &RulesConfig) -> usize {
    let mut healed = 0;
    for entity in store.iter_mut().filter(|e| e.faction == Faction::Player) {
        entity.heal(rules.repair.amount);
        healed += 1;
    }
    healed
}

/// Open the boost window on every player unit until `now + duration`.
///
/// Returns the number of units boosted.
pub fn apply_boost(store: &mut EntityStore, now: Fixed, rules: &RulesConfig) -> usize {
    let until = now + rules.boost.duration;
    let mut boosted = 0;
    for entity in store.iter_mut().filter(|e| e.faction == Faction::Player) {
        if let Some(state) = entity.unit_state_mut() {
            state.boosted_until = Some(until);
            boosted += 1;
        }
    }
    boosted
}
