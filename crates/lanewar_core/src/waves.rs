//! Enemy wave scheduling and composition.

use serde::{Deserialize, Serialize};

use crate::config::{RulesConfig, WaveRules};
use crate::kind::EntityKind;
use crate::math::{fixed_serde, Fixed};

/// Units making up one wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveComposition {
    /// Number of `enemy_light` units.
    pub light: u32,
    /// Number of `enemy_heavy` units.
    pub heavy: u32,
    /// Number of `enemy_arty` units.
    pub arty: u32,
}

impl WaveComposition {
    /// Composition of wave `level`.
    ///
    /// `light = min(base + per_wave * level, cap)`, one heavy every
    /// `heavy_every` waves and one artillery piece every `arty_every`.
    #[must_use]
    pub fn for_level(level: u32, rules: &WaveRules) -> Self {
        let light = rules
            .light_base
            .saturating_add(rules.light_per_wave.saturating_mul(level))
            .min(rules.light_cap);
        Self {
            light,
            heavy: level.checked_div(rules.heavy_every).unwrap_or(0),
            arty: level.checked_div(rules.arty_every).unwrap_or(0),
        }
    }

    /// Total unit count.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.light + self.heavy + self.arty
    }

    /// Kinds to spawn, lights first, then heavies, then artillery.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> {
        std::iter::repeat(EntityKind::EnemyLight)
            .take(self.light as usize)
            .chain(std::iter::repeat(EntityKind::EnemyHeavy).take(self.heavy as usize))
            .chain(std::iter::repeat(EntityKind::EnemyArty).take(self.arty as usize))
    }
}

/// Wave counter and spawn timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDirector {
    /// Level of the next wave to spawn.
    pub wave: u32,
    /// Simulation time of the last spawn (or of the session start).
    #[serde(with = "fixed_serde")]
    pub last_spawn: Fixed,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveDirector {
    /// Director for a fresh session: wave 1, timer started at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wave: 1,
            last_spawn: Fixed::ZERO,
        }
    }

    /// Whether strictly more than the wave interval has passed.
    #[must_use]
    pub fn is_due(&self, now: Fixed, rules: &RulesConfig) -> bool {
        now - self.last_spawn > rules.wave_interval
    }

    /// Take the composition of the current wave and advance the counter.
    ///
    /// Returns the level that was launched alongside its composition.
    pub fn launch(&mut self, now: Fixed, rules: &RulesConfig) -> (u32, WaveComposition) {
        let level = self.wave;
        let composition = WaveComposition::for_level(level, &rules.waves);
        self.wave += 1;
        self.last_spawn = now;
        (level, composition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_waves() {
        let rules = WaveRules::default();
        let one = WaveComposition::for_level(1, &rules);
        assert_eq!((one.light, one.heavy, one.arty), (8, 0, 0));

        let six = WaveComposition::for_level(6, &rules);
        assert_eq!((six.light, six.heavy, six.arty), (18, 3, 2));
        assert_eq!(six.total(), 23);
        assert_eq!(six.kinds().count(), 23);
    }

    #[test]
    fn test_light_units_cap_at_thirty() {
        let rules = WaveRules::default();
        assert_eq!(WaveComposition::for_level(12, &rules).light, 30);
        assert_eq!(WaveComposition::for_level(50, &rules).light, 30);
    }

    #[test]
    fn test_due_only_after_full_interval() {
        let rules = RulesConfig::default();
        let director = WaveDirector::new();
        assert!(!director.is_due(Fixed::from_num(11), &rules));
        assert!(director.is_due(Fixed::from_num(11.01), &rules));
    }

    #[test]
    fn test_launch_advances_counter_and_timer() {
        let rules = RulesConfig::default();
        let mut director = WaveDirector::new();
        let now = Fixed::from_num(11.05);
        let (level, composition) = director.launch(now, &rules);
        assert_eq!(level, 1);
        assert_eq!(composition.light, 8);
        assert_eq!(director.wave, 2);
        assert_eq!(director.last_spawn, now);
        assert!(!director.is_due(now + Fixed::from_num(5), &rules));
    }

    proptest! {
        #[test]
        fn prop_light_count_non_decreasing_and_capped(level in 1u32..500) {
            let rules = WaveRules::default();
            let this = WaveComposition::for_level(level, &rules);
            let next = WaveComposition::for_level(level + 1, &rules);
            prop_assert_eq!(this.light, (6 + 2 * level).min(30));
            prop_assert!(next.light >= this.light);
            prop_assert!(this.light <= 30);
            prop_assert_eq!(this.heavy, level / 2);
            prop_assert_eq!(this.arty, level / 3);
        }
    }
}
