//! Combat resolution.
//!
//! Targeting is a linear nearest-opponent scan per attacker per tick.
//! That is fine at lane-battle scale (a few hundred entities); past that
//! a spatial index would be needed.

use crate::components::{Entity, EntityId, Faction};
use crate::config::RulesConfig;
use crate::kind::EntityKind;
use crate::math::Fixed;
use crate::store::EntityStore;

/// A kill produced by a damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    /// Entity that dropped to zero hit points.
    pub target: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Its faction.
    pub faction: Faction,
    /// Score awarded for the kill.
    pub score: u32,
    /// The kill destroyed the enemy headquarters.
    pub enemy_hq: bool,
}

/// Whether `entity` ever fires: defensive structures and units with range.
#[must_use]
pub fn can_attack(entity: &Entity) -> bool {
    if !entity.is_alive() || entity.range() <= Fixed::ZERO {
        return false;
    }
    !entity.is_structure() || entity.kind.is_defensive()
}

/// Nearest live opponent strictly inside the attacker's range.
#[must_use]
pub fn target_in_range(store: &EntityStore, attacker: &Entity) -> Option<EntityId> {
    let (target, dist_sq) =
        store.nearest(attacker.position, attacker.faction.opponent(), attacker.id)?;
    let range = attacker.range();
    (dist_sq < range * range).then_some(target)
}

/// Damage one shot from `attacker` deals to `target`.
///
/// Base damage times the attacker's versus-building modifier (buildings
/// only, default 1) times the boost multiplier while boosted.
#[must_use]
pub fn shot_damage(attacker: &Entity, target: &Entity, now: Fixed, rules: &RulesConfig) -> Fixed {
    let mut damage = attacker.damage();

    if target.is_structure() {
        if let Some(pct) = attacker
            .kind
            .unit_stats()
            .and_then(|stats| stats.versus_building_pct)
        {
            damage = damage * Fixed::from_num(pct) / Fixed::from_num(100);
        }
    }

    let boosted = attacker
        .unit_state()
        .is_some_and(|state| state.is_boosted(now));
    if boosted {
        damage *= rules.boost.multiplier;
    }

    damage
}

/// Cooldown an attacker waits after firing.
#[must_use]
pub fn reload_time(attacker: &Entity, rules: &RulesConfig) -> Fixed {
    if attacker.is_structure() {
        rules.structure_cooldown
    } else {
        rules.unit_cooldown
    }
}

/// Subtract `amount` from the target's hit points.
///
/// Returns a [`Kill`] only on the hit that takes a live target to zero,
/// so each entity is scored at most once even if it is hit again
/// before the purge.
pub fn apply_damage(
    store: &mut EntityStore,
    target: EntityId,
    amount: Fixed,
    rules: &RulesConfig,
) -> Option<Kill> {
    let entity = store.get_mut(target)?;
    if !entity.is_alive() {
        return None;
    }

    entity.hp -= amount;
    if entity.is_alive() {
        return None;
    }

    let enemy_hq = entity.is_hq_of(Faction::Enemy);
    let mut score = 0;
    if entity.faction == Faction::Enemy {
        score += rules.kill_score;
    }
    if enemy_hq {
        score += rules.hq_kill_bonus;
    }

    tracing::trace!(entity = target, kind = %entity.kind, score, "entity destroyed");

    Some(Kill {
        target,
        kind: entity.kind,
        faction: entity.faction,
        score,
        enemy_hq,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Armament, Body};
    use crate::math::Vec2Fixed;

    fn add(store: &mut EntityStore, kind: EntityKind, x: i32, faction: Faction) -> EntityId {
        let id = store.allocate_id();
        let pos = Vec2Fixed::from_ints(x, 0);
        let entity = Entity::structure(id, kind, pos, faction)
            .or_else(|| Entity::unit(id, kind, pos, faction, None))
            .unwrap();
        store.insert(entity)
    }

    #[test]
    fn test_target_in_range_is_strict() {
        let mut store = EntityStore::new();
        let infantry = add(&mut store, EntityKind::Infantry, 0, Faction::Player);
        let raider = add(&mut store, EntityKind::EnemyLight, 70, Faction::Enemy);

        let attacker = store.get(infantry).unwrap().clone();
        assert_eq!(target_in_range(&store, &attacker), None, "range 70 excludes distance 70");

        store.get_mut(raider).unwrap().position = Vec2Fixed::from_ints(69, 0);
        assert_eq!(target_in_range(&store, &attacker), Some(raider));
    }

    #[test]
    fn test_non_defensive_structures_never_attack() {
        let mut store = EntityStore::new();
        let hq = add(&mut store, EntityKind::Hq, 0, Faction::Enemy);
        let truck = add(&mut store, EntityKind::Truck, 0, Faction::Player);
        let turret = add(&mut store, EntityKind::Turret, 0, Faction::Player);
        assert!(!can_attack(store.get(hq).unwrap()));
        assert!(!can_attack(store.get(truck).unwrap()));
        assert!(can_attack(store.get(turret).unwrap()));
    }

    #[test]
    fn test_armed_economy_structure_still_holds_fire() {
        let mut store = EntityStore::new();
        let power = add(&mut store, EntityKind::Power, 0, Faction::Player);
        let bunker = add(&mut store, EntityKind::Bunker, 0, Faction::Player);
        store.get_mut(power).unwrap().body = Body::Structure(Armament {
            range: Fixed::from_num(100),
            damage: Fixed::from_num(5),
        });
        assert!(!can_attack(store.get(power).unwrap()));
        assert!(can_attack(store.get(bunker).unwrap()));

        store.get_mut(bunker).unwrap().hp = Fixed::ZERO;
        assert!(!can_attack(store.get(bunker).unwrap()));
    }

    #[test]
    fn test_versus_building_modifier_applies_to_structures_only() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        let rocket = add(&mut store, EntityKind::Rocket, 0, Faction::Player);
        let hq = add(&mut store, EntityKind::Hq, 50, Faction::Enemy);
        let raider = add(&mut store, EntityKind::EnemyLight, 50, Faction::Enemy);

        let attacker = store.get(rocket).unwrap();
        let vs_hq = shot_damage(attacker, store.get(hq).unwrap(), Fixed::ZERO, &rules);
        let vs_unit = shot_damage(attacker, store.get(raider).unwrap(), Fixed::ZERO, &rules);

        assert_eq!(vs_unit, Fixed::from_num(22));
        assert!((vs_hq - Fixed::from_num(28.6)).abs() < Fixed::from_num(0.0001));
    }

    #[test]
    fn test_enemy_units_have_no_building_modifier() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        let heavy = add(&mut store, EntityKind::EnemyHeavy, 0, Faction::Enemy);
        let power = add(&mut store, EntityKind::Power, 50, Faction::Player);
        let damage = shot_damage(
            store.get(heavy).unwrap(),
            store.get(power).unwrap(),
            Fixed::ZERO,
            &rules,
        );
        assert_eq!(damage, Fixed::from_num(24));
    }

    #[test]
    fn test_boost_multiplies_damage_while_window_open() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        let infantry = add(&mut store, EntityKind::Infantry, 0, Faction::Player);
        let raider = add(&mut store, EntityKind::EnemyLight, 50, Faction::Enemy);
        store
            .get_mut(infantry)
            .and_then(Entity::unit_state_mut)
            .unwrap()
            .boosted_until = Some(Fixed::from_num(5));

        let attacker = store.get(infantry).unwrap();
        let target = store.get(raider).unwrap();
        assert_eq!(
            shot_damage(attacker, target, Fixed::from_num(1), &rules),
            Fixed::from_num(21)
        );
        assert_eq!(
            shot_damage(attacker, target, Fixed::from_num(6), &rules),
            Fixed::from_num(14)
        );
    }

    #[test]
    fn test_kill_scored_once() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        let raider = add(&mut store, EntityKind::EnemyLight, 0, Faction::Enemy);

        assert!(apply_damage(&mut store, raider, Fixed::from_num(100), &rules).is_none());
        let kill = apply_damage(&mut store, raider, Fixed::from_num(100), &rules).unwrap();
        assert_eq!(kill.score, 12);
        assert!(!kill.enemy_hq);
        assert!(apply_damage(&mut store, raider, Fixed::from_num(100), &rules).is_none());
    }

    #[test]
    fn test_enemy_hq_kill_awards_bonus() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        let hq = add(&mut store, EntityKind::Hq, 0, Faction::Enemy);
        let kill = apply_damage(&mut store, hq, Fixed::from_num(800), &rules).unwrap();
        assert_eq!(kill.score, 512);
        assert!(kill.enemy_hq);
    }

    #[test]
    fn test_player_losses_score_nothing() {
        let rules = RulesConfig::default();
        let mut store = EntityStore::new();
        let infantry = add(&mut store, EntityKind::Infantry, 0, Faction::Player);
        let kill = apply_damage(&mut store, infantry, Fixed::from_num(500), &rules).unwrap();
        assert_eq!(kill.score, 0);
        assert_eq!(kill.faction, Faction::Player);
    }
}
