//! Test fixtures and helpers.
//!
//! Pre-built sessions and entity layouts for consistent testing.

use fixed::types::I32F32;
use lanewar_core::components::{EntityId, Faction};
use lanewar_core::kind::EntityKind;
use lanewar_core::math::Vec2Fixed;
use lanewar_core::simulation::Simulation;

/// Frame delta used by fixtures: one tick at the maximum step.
pub const TICK: f64 = 0.05;

/// Ticks per simulated second at [`TICK`].
pub const TICKS_PER_SECOND: u32 = 20;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a position from integer coordinates.
#[must_use]
pub fn pos(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::from_ints(x, y)
}

/// Fixture tick delta.
#[must_use]
pub fn tick_delta() -> I32F32 {
    fixed_f(TICK)
}

/// Run `ticks` updates at the fixture delta.
pub fn run_ticks(sim: &mut Simulation, ticks: u32) {
    let delta = tick_delta();
    for _ in 0..ticks {
        sim.update(delta);
    }
}

/// Run `seconds` of simulated time at the fixture delta.
pub fn run_seconds(sim: &mut Simulation, seconds: u32) {
    run_ticks(sim, seconds * TICKS_PER_SECOND);
}

/// Fresh stock session.
#[must_use]
pub fn sim_with_seed(seed: u64) -> Simulation {
    Simulation::new(seed)
}

/// Stock session with the economy overwritten.
#[must_use]
pub fn stocked_sim(seed: u64, resources: i32, energy: i32) -> Simulation {
    let mut sim = Simulation::new(seed);
    sim.set_resources(fixed(resources));
    sim.set_energy(fixed(energy));
    sim
}

/// Session with a defended player base and some infantry already trained.
///
/// Builds power, barracks, a supply center and two turrets, then trains
/// three infantry. Ticks once so the economy reflects the buildings.
#[must_use]
pub fn battle_scenario(seed: u64) -> Simulation {
    let mut sim = stocked_sim(seed, 10_000, 4);
    for kind in [
        EntityKind::Power,
        EntityKind::Power,
        EntityKind::Barracks,
        EntityKind::Supply,
        EntityKind::Turret,
        EntityKind::Turret,
    ] {
        let _ = sim.build(kind);
    }
    run_ticks(&mut sim, 1);
    for _ in 0..3 {
        let _ = sim.train(EntityKind::Infantry);
    }
    sim
}

/// Place an idle enemy unit at `(x, y)` with `hp` hit points.
pub fn enemy_at(sim: &mut Simulation, kind: EntityKind, x: i32, y: i32, hp: i32) -> EntityId {
    let id = sim
        .place_unit(kind, pos(x, y), Faction::Enemy, None)
        .expect("enemy fixture kind must be a unit");
    if let Some(entity) = sim.entities_mut().get_mut(id) {
        entity.hp = fixed(hp);
    }
    id
}

/// Place a player unit at `(x, y)` following `path`.
pub fn player_unit_at(
    sim: &mut Simulation,
    kind: EntityKind,
    x: i32,
    y: i32,
    path: Option<Vec<Vec2Fixed>>,
) -> EntityId {
    sim.place_unit(kind, pos(x, y), Faction::Player, path)
        .expect("player fixture kind must be a unit")
}

/// Id of `faction`'s headquarters.
#[must_use]
pub fn hq_of(sim: &Simulation, faction: Faction) -> Option<EntityId> {
    sim.entities()
        .iter()
        .find(|e| e.is_hq_of(faction))
        .map(|e| e.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_scenario_layout() {
        let sim = battle_scenario(3);
        let count = |kind| sim.entities().count_kind(kind);
        assert_eq!(count(EntityKind::Turret), 2);
        assert_eq!(count(EntityKind::Infantry), 3);
        assert_eq!(sim.economy().pop, 3);
        assert!(hq_of(&sim, Faction::Enemy).is_some());
    }

    #[test]
    fn test_enemy_fixture_sets_hp() {
        let mut sim = sim_with_seed(1);
        let id = enemy_at(&mut sim, EntityKind::EnemyLight, 500, 500, 40);
        assert_eq!(sim.entities().get(id).unwrap().hp, fixed(40));
    }
}
