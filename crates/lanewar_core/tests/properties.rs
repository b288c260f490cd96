//! Property tests over random play.

use lanewar_core::config::WaveRules;
use lanewar_core::prelude::*;
use lanewar_core::waves::WaveComposition;
use lanewar_test_utils::determinism::strategies::{arb_action_script, arb_buildable, arb_trainable};
use lanewar_test_utils::fixtures::{fixed, stocked_sim, tick_delta};
use proptest::prelude::*;

/// `base + Σ positive power` over live player buildings.
fn expected_energy_cap(sim: &Simulation) -> u32 {
    let base = sim.rules().base_energy_cap;
    sim.entities()
        .iter()
        .filter(|e| e.faction == Faction::Player && e.is_structure())
        .filter_map(|e| e.kind.buildable())
        .filter(|entry| entry.power > 0)
        .fold(base, |cap, entry| cap + entry.power.unsigned_abs())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn energy_stays_within_cap_after_every_tick(
        seed in any::<u64>(),
        builds in prop::collection::vec(arb_buildable(), 0..12),
        frames in 1u32..80,
    ) {
        let mut sim = stocked_sim(seed, 20_000, 4);
        for kind in builds {
            let _ = sim.build(kind);
            for _ in 0..frames {
                sim.update(tick_delta());
                let economy = sim.economy();
                prop_assert!(economy.energy >= fixed(0));
                prop_assert!(economy.energy <= Fixed::from_num(economy.energy_cap));
                prop_assert_eq!(economy.energy_cap, expected_energy_cap(&sim));
            }
        }
    }

    #[test]
    fn refused_training_leaves_state_untouched(
        seed in any::<u64>(),
        kind in arb_trainable(),
        resources in 0i32..600,
    ) {
        // No barracks, supply center or factory: every unit lacks its prerequisite
        // or its price.
        let mut sim = stocked_sim(seed, resources, 4);
        let hash = sim.state_hash();
        let log_len = sim.log().len();

        prop_assert!(sim.train(kind).is_err());
        prop_assert_eq!(sim.state_hash(), hash);
        prop_assert_eq!(sim.log().len(), log_len + 1);
    }

    #[test]
    fn wave_light_count_is_capped_and_monotonic(level in 1u32..500) {
        let rules = WaveRules::default();
        let here = WaveComposition::for_level(level, &rules);
        let next = WaveComposition::for_level(level + 1, &rules);
        prop_assert_eq!(here.light, (6 + 2 * level).min(30));
        prop_assert!(next.light >= here.light);
        prop_assert!(here.light <= 30);
    }

    #[test]
    fn recorded_scripts_survive_save_and_load(
        seed in any::<u64>(),
        script in arb_action_script(120),
    ) {
        let mut sim = Simulation::new(seed);
        let mut replay = Replay::new(seed, sim.config().clone());
        for action in script {
            replay.apply_and_record(&mut sim, action);
        }
        replay.finalize(sim.state_hash());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.replay");
        replay.save(&path).unwrap();
        let loaded = Replay::load(&path).unwrap();

        prop_assert_eq!(&loaded.entries, &replay.entries);
        prop_assert_eq!(loaded.final_hash, replay.final_hash);
        prop_assert_eq!(loaded.play().state_hash(), sim.state_hash());
    }
}
