//! Player economy: resources, energy and population.
//!
//! Capacities are never stored as truth. Every tick
//! [`Economy::recalculate`] derives them from the live entity set, so a
//! destroyed power plant lowers the energy cap on the very next tick.

use serde::{Deserialize, Serialize};

use crate::components::Faction;
use crate::config::RulesConfig;
use crate::math::{fixed_serde, Fixed};
use crate::store::EntityStore;

/// Player economy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    /// Spendable resources.
    #[serde(with = "fixed_serde")]
    pub resources: Fixed,
    /// Stored energy, `0 ..= available`.
    #[serde(with = "fixed_serde")]
    pub energy: Fixed,
    /// Base capacity plus positive power output.
    pub energy_cap: u32,
    /// Power drawn by consumers.
    pub energy_drain: u32,
    /// Population used by live player units.
    pub pop: u32,
    /// Base capacity plus structure contributions.
    pub pop_cap: u32,
}

impl Economy {
    /// Start-of-session economy.
    #[must_use]
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            resources: rules.start_resources,
            energy: rules.start_energy,
            energy_cap: rules.base_energy_cap,
            energy_drain: 0,
            pop: 0,
            pop_cap: rules.base_pop_cap,
        }
    }

    /// Energy usable after drain: `max(0, energy_cap - energy_drain)`.
    #[must_use]
    pub fn available_energy(&self) -> Fixed {
        Fixed::from_num(self.energy_cap.saturating_sub(self.energy_drain))
    }

    /// Recompute caps and population from the live entity set.
    ///
    /// Stored energy above the new available level is clamped down at
    /// once. Returns the available energy.
    pub fn recalculate(&mut self, store: &EntityStore, rules: &RulesConfig) -> Fixed {
        let mut energy_cap = rules.base_energy_cap;
        let mut energy_drain = 0;
        let mut pop_cap = rules.base_pop_cap;
        let mut pop = 0;

        for entity in store.iter().filter(|e| e.faction == Faction::Player) {
            if entity.is_structure() {
                let Some(entry) = entity.kind.buildable() else {
                    continue;
                };
                if entry.power > 0 {
                    energy_cap += entry.power.unsigned_abs();
                } else {
                    energy_drain += entry.power.unsigned_abs();
                }
                pop_cap += entry.pop_cap;
            } else {
                pop += entity.kind.pop_cost();
            }
        }

        self.energy_cap = energy_cap;
        self.energy_drain = energy_drain;
        self.pop_cap = pop_cap;
        self.pop = pop;

        let available = self.available_energy();
        if self.energy > available {
            self.energy = available;
        }
        available
    }

    /// Passive income: `delta * (base + truck_income * trucks)`.
    pub fn accrue_income(&mut self, delta: Fixed, trucks: usize, rules: &RulesConfig) {
        let rate = rules.base_income + rules.truck_income * Fixed::from_num(trucks);
        self.resources += delta * rate;
    }

    /// Regenerate energy toward `available`.
    pub fn regenerate(&mut self, delta: Fixed, available: Fixed, rules: &RulesConfig) {
        self.energy = (self.energy + delta * rules.energy_regen).clamp(Fixed::ZERO, available);
    }

    /// Check if the player can afford a cost.
    #[must_use]
    pub fn can_afford(&self, cost: u32) -> bool {
        self.resources >= Fixed::from_num(cost)
    }

    /// Spend resources if available. Returns true on success.
    pub fn spend(&mut self, cost: u32) -> bool {
        if self.can_afford(cost) {
            self.resources -= Fixed::from_num(cost);
            true
        } else {
            false
        }
    }

    /// Spend stored energy if available. Returns true on success.
    pub fn spend_energy(&mut self, cost: u32) -> bool {
        let cost = Fixed::from_num(cost);
        if self.energy >= cost {
            self.energy -= cost;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Entity;
    use crate::kind::EntityKind;
    use crate::math::Vec2Fixed;

    fn add(store: &mut EntityStore, kind: EntityKind, faction: Faction) {
        let id = store.allocate_id();
        let entity = Entity::structure(id, kind, Vec2Fixed::ZERO, faction)
            .or_else(|| Entity::unit(id, kind, Vec2Fixed::ZERO, faction, None))
            .unwrap();
        store.insert(entity);
    }

    #[test]
    fn test_start_economy() {
        let rules = RulesConfig::default();
        let economy = Economy::new(&rules);
        assert_eq!(economy.resources, Fixed::from_num(1500));
        assert_eq!(economy.energy, Fixed::from_num(4));
        assert_eq!(economy.energy_cap, 4);
        assert_eq!((economy.pop, economy.pop_cap), (0, 5));
    }

    #[test]
    fn test_recalculate_sums_player_structures() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        add(&mut store, EntityKind::Hq, Faction::Player);
        add(&mut store, EntityKind::Power, Faction::Player);
        add(&mut store, EntityKind::Power, Faction::Player);
        add(&mut store, EntityKind::Barracks, Faction::Player);
        add(&mut store, EntityKind::Supply, Faction::Player);
        add(&mut store, EntityKind::Power, Faction::Enemy);

        let mut economy = Economy::new(&rules);
        let available = economy.recalculate(&store, &rules);

        assert_eq!(economy.energy_cap, 16);
        assert_eq!(economy.energy_drain, 5);
        assert_eq!(economy.pop_cap, 11);
        assert_eq!(available, Fixed::from_num(11));
    }

    #[test]
    fn test_recalculate_counts_player_unit_population() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        add(&mut store, EntityKind::Tank, Faction::Player);
        add(&mut store, EntityKind::Infantry, Faction::Player);
        add(&mut store, EntityKind::EnemyHeavy, Faction::Enemy);

        let mut economy = Economy::new(&rules);
        economy.recalculate(&store, &rules);
        assert_eq!(economy.pop, 3);
    }

    #[test]
    fn test_drain_above_cap_clamps_energy_to_zero() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        add(&mut store, EntityKind::Factory, Faction::Player);
        add(&mut store, EntityKind::Turret, Faction::Player);

        let mut economy = Economy::new(&rules);
        let available = economy.recalculate(&store, &rules);
        assert_eq!(available, Fixed::ZERO);
        assert_eq!(economy.energy, Fixed::ZERO);
    }

    #[test]
    fn test_income_scales_with_trucks() {
        let rules = RulesConfig::default();
        let mut economy = Economy::new(&rules);
        economy.accrue_income(Fixed::from_num(2), 2, &rules);
        assert_eq!(economy.resources, Fixed::from_num(1514));
    }

    #[test]
    fn test_regenerate_stops_at_available() {
        let rules = RulesConfig::default();
        let mut economy = Economy::new(&rules);
        economy.energy = Fixed::from_num(3);
        economy.regenerate(Fixed::from_num(10), Fixed::from_num(4), &rules);
        assert_eq!(economy.energy, Fixed::from_num(4));
    }

    #[test]
    fn test_spend_fails_without_mutation() {
        let rules = RulesConfig::default();
        let mut economy = Economy::new(&rules);
        assert!(!economy.spend(2000));
        assert_eq!(economy.resources, Fixed::from_num(1500));
        assert!(economy.spend(500));
        assert_eq!(economy.resources, Fixed::from_num(1000));
    }
}
