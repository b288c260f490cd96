//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Replays and save/restore only work if the simulation is 100%
//! deterministic. Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different results.
//!   We use fixed-point arithmetic via [`lanewar_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Entities live in a `BTreeMap` and are always visited in id order.
//!
//! - **System randomness and wall-clock time**: Lane picks, build spots and
//!   supply timers draw from the seeded stream owned by the simulation,
//!   and every timer reads the simulation clock.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual rules (economy, combat, waves, etc.)
//! 2. **Property tests**: Random action scripts still produce deterministic outputs
//! 3. **Integration tests**: Full sessions are reproducible
//! 4. **Parallel tests**: Running N sessions on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use lanewar_core::simulation::Simulation;

use crate::fixtures::tick_delta;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use lanewar_test_utils::determinism::verify_determinism;
/// use lanewar_test_utils::fixtures::{battle_scenario, tick_delta};
///
/// let result = verify_determinism(
///     3,
///     100,
///     || battle_scenario(9),
///     |sim| {
///         sim.update(tick_delta());
///     },
///     |sim| sim.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run a [`Simulation`] twice from identical setup and compare final hashes.
///
/// Ticks at the fixture delta.
pub fn verify_simulation_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let delta = tick_delta();
    let result = verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |sim| {
            sim.update(delta);
        },
        Simulation::state_hash,
    );
    result.is_deterministic
}

/// Run N simulations on scoped threads and collect final hashes.
///
/// Catches non-determinism that only shows up under different thread
/// scheduling or memory layout.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> DeterminismResult
where
    F: Fn() -> Simulation + Sync,
{
    let delta = tick_delta();
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.update(delta);
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks: num_ticks,
    }
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// # Returns
///
/// `None` if simulations are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let delta = tick_delta();
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        sim1.update(delta);
        sim2.update(delta);

        if sim1.state_hash() != sim2.state_hash() {
            tracing::warn!(tick, "Simulations diverged");
            return Some(tick);
        }
    }

    None
}

/// Verify that a serialization round-trip preserves simulation state exactly,
/// and that the restored copy keeps evolving identically.
pub fn verify_serialization_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let delta = tick_delta();
    let mut sim = setup_fn();

    for _ in 0..num_ticks {
        sim.update(delta);
    }

    let Ok(bytes) = sim.serialize() else {
        return false;
    };
    let Ok(mut restored) = Simulation::deserialize(&bytes) else {
        return false;
    };

    if restored.state_hash() != sim.state_hash() {
        return false;
    }

    for _ in 0..num_ticks {
        sim.update(delta);
        restored.update(delta);
    }
    restored.state_hash() == sim.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible player inputs for
/// property-based testing.
pub mod strategies {
    use lanewar_core::abilities::Ability;
    use lanewar_core::kind::EntityKind;
    use lanewar_core::math::{Fixed, Vec2Fixed};
    use lanewar_core::replay::ReplayAction;
    use proptest::prelude::*;

    /// A kind from the build menu.
    pub fn arb_buildable() -> impl Strategy<Value = EntityKind> {
        proptest::sample::select(EntityKind::BUILD_MENU.to_vec())
    }

    /// A kind from the training menu.
    pub fn arb_trainable() -> impl Strategy<Value = EntityKind> {
        proptest::sample::select(EntityKind::TRAIN_MENU.to_vec())
    }

    /// Any ability.
    pub fn arb_ability() -> impl Strategy<Value = Ability> {
        proptest::sample::select(Ability::ALL.to_vec())
    }

    /// A point on the default field.
    pub fn arb_field_point() -> impl Strategy<Value = Vec2Fixed> {
        (0i32..1200, 0i32..720).prop_map(|(x, y)| Vec2Fixed::from_ints(x, y))
    }

    /// A frame delta in hundredths of a second, including over-long frames
    /// the simulation must clamp.
    pub fn arb_delta() -> impl Strategy<Value = Fixed> {
        (0i32..=20).prop_map(|hundredths| Fixed::from_num(hundredths) / Fixed::from_num(100))
    }

    /// One player input or frame.
    pub fn arb_action() -> impl Strategy<Value = ReplayAction> {
        prop_oneof![
            4 => arb_delta().prop_map(ReplayAction::Tick),
            2 => arb_buildable().prop_map(ReplayAction::Build),
            2 => arb_trainable().prop_map(ReplayAction::Train),
            1 => arb_ability().prop_map(ReplayAction::Ability),
            1 => arb_field_point().prop_map(ReplayAction::AimStrike),
            1 => arb_field_point().prop_map(ReplayAction::ConfirmStrike),
        ]
    }

    /// A script of up to `max_len` inputs.
    pub fn arb_action_script(max_len: usize) -> impl Strategy<Value = Vec<ReplayAction>> {
        prop::collection::vec(arb_action(), 0..max_len)
    }
}
