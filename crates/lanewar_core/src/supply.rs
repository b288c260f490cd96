//! Supply drop timers and truck dispatch.

use rand::Rng;

use crate::components::{EntityId, Faction};
use crate::config::RulesConfig;
use crate::kind::EntityKind;
use crate::math::{Fixed, Vec2Fixed};
use crate::store::EntityStore;
use crate::world::SupplyDrop;

/// Count down every drop timer by `delta`.
///
/// Each drop whose timer reaches zero is re-armed with a fresh countdown
/// in `[supply_drop_min, supply_drop_min + supply_drop_spread)` and its
/// position is returned, in drop order.
pub fn tick_drops<R: Rng>(
    drops: &mut [SupplyDrop],
    delta: Fixed,
    rng: &mut R,
    rules: &RulesConfig,
) -> Vec<Vec2Fixed> {
    let mut expired = Vec::new();
    for drop in drops.iter_mut() {
        drop.timer -= delta;
        if drop.timer <= Fixed::ZERO {
            drop.timer = respawn_time(rng, rules);
            expired.push(drop.position);
        }
    }
    expired
}

/// Draw a respawn countdown.
fn respawn_time<R: Rng>(rng: &mut R, rules: &RulesConfig) -> Fixed {
    let spread = rules.supply_drop_spread.to_bits();
    if spread <= 0 {
        return rules.supply_drop_min;
    }
    rules.supply_drop_min + Fixed::from_bits(rng.gen_range(0..spread))
}

/// Redirect the first player truck (lowest id) to `drop` and back to `home`.
///
/// The truck abandons whatever route it was looping, including an earlier
/// supply run. Returns the truck's id, or `None` without a player truck.
pub fn dispatch_truck(store: &mut EntityStore, drop: Vec2Fixed, home: Vec2Fixed) -> Option<EntityId> {
    let truck = store
        .iter_mut()
        .find(|e| e.kind == EntityKind::Truck && e.faction == Faction::Player)?;

    let id = truck.id;
    let state = truck.unit_state_mut()?;
    state.path = Some(vec![drop, home]);
    state.waypoint = 0;
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Entity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn drop_at(x: i32, timer: f64) -> SupplyDrop {
        SupplyDrop {
            position: Vec2Fixed::from_ints(x, 0),
            timer: Fixed::from_num(timer),
        }
    }

    #[test]
    fn test_expired_drop_rearms_in_range() {
        let rules = RulesConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut drops = vec![drop_at(10, 0.04), drop_at(20, 5.0)];

        let expired = tick_drops(&mut drops, Fixed::from_num(0.05), &mut rng, &rules);

        assert_eq!(expired, vec![Vec2Fixed::from_ints(10, 0)]);
        assert!(drops[0].timer >= Fixed::from_num(25));
        assert!(drops[0].timer < Fixed::from_num(35));
        assert_eq!(drops[1].timer, Fixed::from_num(5.0) - Fixed::from_num(0.05));
    }

    #[test]
    fn test_zero_spread_uses_minimum() {
        let rules = RulesConfig {
            supply_drop_spread: Fixed::ZERO,
            ..RulesConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut drops = vec![drop_at(0, 0.0)];
        tick_drops(&mut drops, Fixed::from_num(0.05), &mut rng, &rules);
        assert_eq!(drops[0].timer, Fixed::from_num(25));
    }

    #[test]
    fn test_dispatch_always_redirects_first_truck() {
        let mut store = EntityStore::new();
        let add_truck = |store: &mut EntityStore| {
            let id = store.allocate_id();
            let truck = Entity::unit(id, EntityKind::Truck, Vec2Fixed::ZERO, Faction::Player, None).unwrap();
            store.insert(truck)
        };
        let first = add_truck(&mut store);
        let second = add_truck(&mut store);

        let home = Vec2Fixed::from_ints(144, 273);
        let north = Vec2Fixed::from_ints(360, 120);
        let south = Vec2Fixed::from_ints(360, 600);

        assert_eq!(dispatch_truck(&mut store, north, home), Some(first));
        store.get_mut(first).unwrap().unit_state_mut().unwrap().waypoint = 1;
        assert_eq!(dispatch_truck(&mut store, south, home), Some(first));

        let state = store.get(first).unwrap().unit_state().unwrap();
        assert_eq!(state.path.as_deref(), Some(&[south, home][..]));
        assert_eq!(state.waypoint, 0);
        assert!(store.get(second).unwrap().unit_state().unwrap().path.is_none());
    }

    #[test]
    fn test_dispatch_ignores_enemy_units() {
        let mut store = EntityStore::new();
        let id = store.allocate_id();
        store.insert(
            Entity::unit(id, EntityKind::EnemyLight, Vec2Fixed::ZERO, Faction::Enemy, None).unwrap(),
        );
        assert_eq!(
            dispatch_truck(&mut store, Vec2Fixed::ZERO, Vec2Fixed::ZERO),
            None
        );
    }
}
