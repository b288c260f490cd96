//! Scripted sessions for determinism checks and benchmarks.
//!
//! A fixed build order stands in for a player so that a seed alone
//! determines the whole session.

use lanewar_core::abilities::Ability;
use lanewar_core::config::GameConfig;
use lanewar_core::kind::EntityKind;
use lanewar_core::math::Fixed;
use lanewar_core::simulation::Simulation;

/// Ticks between scripted training attempts.
const TRAIN_EVERY: u64 = 100;

/// Ticks between scripted defense builds.
const DEFEND_EVERY: u64 = 400;

/// Stockpile the script starts from, enough for the whole opening.
const OPENING_FUNDS: i32 = 3000;

const OPENING: [EntityKind; 3] = [EntityKind::Power, EntityKind::Supply, EntityKind::Barracks];

const ROSTER: [EntityKind; 3] = [EntityKind::Infantry, EntityKind::Truck, EntityKind::Rocket];

/// Play `ticks` updates of the scripted build order.
///
/// Refused actions are part of the script; the session just carries on.
#[must_use]
pub fn build_order_session(seed: u64, config: &GameConfig, ticks: u64) -> Simulation {
    let mut sim = Simulation::with_config(seed, config.clone());
    let delta = sim.rules().max_delta;
    sim.set_resources(Fixed::from_num(OPENING_FUNDS));

    for kind in OPENING {
        let _ = sim.build(kind);
    }

    for tick in 1..=ticks {
        if tick % TRAIN_EVERY == 0 {
            let kind = ROSTER[((tick / TRAIN_EVERY) % ROSTER.len() as u64) as usize];
            let _ = sim.train(kind);
        }
        if tick % DEFEND_EVERY == 0 {
            let _ = sim.build(EntityKind::Turret);
            let _ = sim.use_ability(Ability::Repair);
        }
        sim.update(delta);
        if sim.is_game_over() {
            break;
        }
    }
    sim
}

/// Run the scripted session `runs` times and compare final state hashes.
#[must_use]
pub fn verify_determinism(seed: u64, runs: u32, ticks: u64) -> bool {
    let config = GameConfig::default();
    let hashes: Vec<u64> = (0..runs.max(1))
        .map(|_| build_order_session(seed, &config, ticks).state_hash())
        .collect();

    let deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    if !deterministic {
        tracing::warn!(?hashes, "Runs diverged");
    }
    deterministic
}
