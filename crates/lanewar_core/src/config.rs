//! Session configuration.
//!
//! [`GameConfig`] bundles the static map ([`WorldConfig`]) and the tuning
//! knobs of the rules ([`RulesConfig`]). `Default` reproduces the stock
//! game; RON files can override any subset of fields.
//!
//! # Example RON
//!
//! ```ron
//! GameConfig(
//!     rules: (
//!         wave_interval: 8.0,
//!         start_resources: 3000.0,
//!     ),
//! )
//! ```
//!
//! Per-kind unit and structure stats are not configurable here; they
//! live in [`crate::kind`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_decimal_serde, Fixed, Vec2Fixed};

/// Largest accepted field width or height. Squared distances across the
/// field must stay inside the fixed-point range.
pub const MAX_WORLD_EXTENT: u32 = 40_000;

/// Complete configuration for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Map layout.
    pub world: WorldConfig,
    /// Economy, combat, wave and ability tuning.
    pub rules: RulesConfig,
}

impl GameConfig {
    /// Parse a config from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigParseError`] on malformed RON or when
    /// the parsed layout fails [`validate`](Self::validate).
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text).map_err(|e| GameError::ConfigParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`from_ron_str`](Self::from_ron_str) tagged
    /// with the file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text).map_err(|e| match e {
            GameError::ConfigParseError { message, .. } => GameError::ConfigParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Serialize to pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize config: {e}")))
    }

    /// Check structural requirements the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigParseError`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| GameError::ConfigParseError {
            path: "<inline>".to_string(),
            message: message.to_string(),
        };

        if self.world.width == 0 || self.world.height == 0 {
            return Err(invalid("world dimensions must be positive"));
        }
        if self.world.width > MAX_WORLD_EXTENT || self.world.height > MAX_WORLD_EXTENT {
            return Err(invalid("world dimensions must not exceed 40000"));
        }
        if self.world.lanes.iter().any(Vec::is_empty) {
            return Err(invalid("every lane needs at least one waypoint"));
        }
        if self.rules.max_delta <= Fixed::ZERO {
            return Err(invalid("max_delta must be positive"));
        }
        if self.rules.log_capacity == 0 {
            return Err(invalid("log_capacity must be at least 1"));
        }
        Ok(())
    }
}

/// A supply drop location and its first countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyDropConfig {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Seconds until the first drop.
    #[serde(with = "fixed_decimal_serde")]
    pub timer: Fixed,
}

/// Static map layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Field width in world units.
    pub width: u32,
    /// Field height in world units.
    pub height: u32,
    /// Grid spacing used by presenters.
    pub grid: u32,
    /// The two lane polylines, player side first.
    pub lanes: [Vec<(i32, i32)>; 2],
    /// Supply drop points.
    pub supply_drops: Vec<SupplyDropConfig>,
    /// Player base anchor as percent of (width, height).
    pub player_base_pct: (u32, u32),
    /// Enemy base anchor as percent of (width, height).
    pub enemy_base_pct: (u32, u32),
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 720,
            grid: 32,
            lanes: [
                vec![(120, 200), (600, 220), (1080, 240)],
                vec![(120, 520), (600, 480), (1080, 460)],
            ],
            supply_drops: vec![
                SupplyDropConfig {
                    x: 360,
                    y: 120,
                    timer: Fixed::from_num(8),
                },
                SupplyDropConfig {
                    x: 360,
                    y: 360,
                    timer: Fixed::from_num(12),
                },
                SupplyDropConfig {
                    x: 360,
                    y: 600,
                    timer: Fixed::from_num(18),
                },
            ],
            player_base_pct: (12, 38),
            enemy_base_pct: (82, 38),
        }
    }
}

impl WorldConfig {
    fn anchor(&self, pct: (u32, u32)) -> Vec2Fixed {
        let hundred = Fixed::from_num(100);
        Vec2Fixed::new(
            Fixed::from_num(self.width) * Fixed::from_num(pct.0) / hundred,
            Fixed::from_num(self.height) * Fixed::from_num(pct.1) / hundred,
        )
    }

    /// Player base anchor in world coordinates.
    #[must_use]
    pub fn player_base(&self) -> Vec2Fixed {
        self.anchor(self.player_base_pct)
    }

    /// Enemy base anchor in world coordinates.
    #[must_use]
    pub fn enemy_base(&self) -> Vec2Fixed {
        self.anchor(self.enemy_base_pct)
    }
}

/// Tuning knobs for the rules.
///
/// Durations are in seconds of simulation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Resources at session start.
    #[serde(with = "fixed_decimal_serde")]
    pub start_resources: Fixed,
    /// Energy at session start.
    #[serde(with = "fixed_decimal_serde")]
    pub start_energy: Fixed,
    /// Energy capacity before any power plants.
    pub base_energy_cap: u32,
    /// Population capacity before any structures.
    pub base_pop_cap: u32,
    /// Passive income per second.
    #[serde(with = "fixed_decimal_serde")]
    pub base_income: Fixed,
    /// Extra passive income per second for each live truck.
    #[serde(with = "fixed_decimal_serde")]
    pub truck_income: Fixed,
    /// Energy regained per second.
    #[serde(with = "fixed_decimal_serde")]
    pub energy_regen: Fixed,
    /// Largest delta a single tick may advance.
    #[serde(with = "fixed_decimal_serde")]
    pub max_delta: Fixed,
    /// Cooldown after a turret or bunker fires.
    #[serde(with = "fixed_decimal_serde")]
    pub structure_cooldown: Fixed,
    /// Cooldown after a unit fires.
    #[serde(with = "fixed_decimal_serde")]
    pub unit_cooldown: Fixed,
    /// Distance at which a waypoint counts as reached.
    #[serde(with = "fixed_decimal_serde")]
    pub waypoint_radius: Fixed,
    /// Seconds between enemy waves.
    #[serde(with = "fixed_decimal_serde")]
    pub wave_interval: Fixed,
    /// Wave composition curve.
    pub waves: WaveRules,
    /// Shortest supply drop respawn time.
    #[serde(with = "fixed_decimal_serde")]
    pub supply_drop_min: Fixed,
    /// Random extra respawn time added to `supply_drop_min`, `[0, spread)`.
    #[serde(with = "fixed_decimal_serde")]
    pub supply_drop_spread: Fixed,
    /// Airstrike tuning.
    pub airstrike: AirstrikeRules,
    /// Repair tuning.
    pub repair: RepairRules,
    /// Rally cry tuning.
    pub boost: BoostRules,
    /// Score for each enemy entity destroyed.
    pub kill_score: u32,
    /// Extra score for destroying the enemy headquarters.
    pub hq_kill_bonus: u32,
    /// Score for each truck delivery.
    pub delivery_score: u32,
    /// Log lines kept, newest first.
    pub log_capacity: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            start_resources: Fixed::from_num(1500),
            start_energy: Fixed::from_num(4),
            base_energy_cap: 4,
            base_pop_cap: 5,
            base_income: Fixed::from_num(1),
            truck_income: Fixed::from_num(3),
            energy_regen: Fixed::from_num(0.8),
            max_delta: Fixed::from_num(0.05),
            structure_cooldown: Fixed::from_num(0.55),
            unit_cooldown: Fixed::from_num(0.75),
            waypoint_radius: Fixed::from_num(6),
            wave_interval: Fixed::from_num(11),
            waves: WaveRules::default(),
            supply_drop_min: Fixed::from_num(25),
            supply_drop_spread: Fixed::from_num(10),
            airstrike: AirstrikeRules::default(),
            repair: RepairRules::default(),
            boost: BoostRules::default(),
            kill_score: 12,
            hq_kill_bonus: 500,
            delivery_score: 10,
            log_capacity: 80,
        }
    }
}

/// Enemy wave composition curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveRules {
    /// Light units in a hypothetical wave zero.
    pub light_base: u32,
    /// Light units added per wave.
    pub light_per_wave: u32,
    /// Upper bound on light units.
    pub light_cap: u32,
    /// One heavy unit per this many waves.
    pub heavy_every: u32,
    /// One artillery unit per this many waves.
    pub arty_every: u32,
}

impl Default for WaveRules {
    fn default() -> Self {
        Self {
            light_base: 6,
            light_per_wave: 2,
            light_cap: 30,
            heavy_every: 2,
            arty_every: 3,
        }
    }
}

/// Airstrike tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirstrikeRules {
    /// Energy cost.
    pub cost: u32,
    /// Blast radius.
    #[serde(with = "fixed_decimal_serde")]
    pub radius: Fixed,
    /// Flat damage to every enemy inside the radius.
    #[serde(with = "fixed_decimal_serde")]
    pub damage: Fixed,
    /// Flight time between confirmation and impact.
    #[serde(with = "fixed_decimal_serde")]
    pub delay: Fixed,
}

impl Default for AirstrikeRules {
    fn default() -> Self {
        Self {
            cost: 80,
            radius: Fixed::from_num(120),
            damage: Fixed::from_num(160),
            delay: Fixed::from_num(1.2),
        }
    }
}

/// Repair tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairRules {
    /// Energy cost.
    pub cost: u32,
    /// Hit points restored per entity.
    #[serde(with = "fixed_decimal_serde")]
    pub amount: Fixed,
}

impl Default for RepairRules {
    fn default() -> Self {
        Self {
            cost: 60,
            amount: Fixed::from_num(160),
        }
    }
}

/// Rally cry tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostRules {
    /// Energy cost.
    pub cost: u32,
    /// Seconds the damage bonus lasts.
    #[serde(with = "fixed_decimal_serde")]
    pub duration: Fixed,
    /// Damage multiplier while boosted.
    #[serde(with = "fixed_decimal_serde")]
    pub multiplier: Fixed,
}

impl Default for BoostRules {
    fn default() -> Self {
        Self {
            cost: 40,
            duration: Fixed::from_num(5),
            multiplier: Fixed::from_num(1.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bases() {
        let world = WorldConfig::default();
        let player = world.player_base();
        let enemy = world.enemy_base();
        assert_eq!(player.x, Fixed::from_num(144));
        assert_eq!(enemy.x, Fixed::from_num(984));
        assert!((player.y - Fixed::from_num(273.6)).abs() < Fixed::from_num(0.001));
        assert_eq!(player.y, enemy.y);
    }

    #[test]
    fn test_partial_ron_override_keeps_defaults() {
        let config = GameConfig::from_ron_str("(rules: (wave_interval: 8.0, kill_score: 20))").unwrap();
        assert_eq!(config.rules.wave_interval, Fixed::from_num(8));
        assert_eq!(config.rules.kill_score, 20);
        assert_eq!(config.rules.hq_kill_bonus, 500);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn test_round_trip_through_ron() {
        let config = GameConfig::default();
        let text = config.to_ron_string().unwrap();
        let parsed = GameConfig::from_ron_str(&text).unwrap();
        assert_eq!(parsed.world, config.world);
        assert_eq!(parsed.rules.kill_score, config.rules.kill_score);
    }

    #[test]
    fn test_empty_lane_is_rejected() {
        let err = GameConfig::from_ron_str("(world: (lanes: ([], [(0, 0)])))").unwrap_err();
        assert!(err.to_string().contains("lane"), "{err}");
    }

    #[test]
    fn test_oversized_world_is_rejected() {
        let err = GameConfig::from_ron_str("(world: (width: 50000))").unwrap_err();
        assert!(err.to_string().contains("exceed"), "{err}");

        let mut config = GameConfig::default();
        config.world.height = MAX_WORLD_EXTENT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_ron_is_an_error() {
        assert!(matches!(
            GameConfig::from_ron_str("(rules: (kill_score: \"lots\"))"),
            Err(GameError::ConfigParseError { .. })
        ));
    }
}
