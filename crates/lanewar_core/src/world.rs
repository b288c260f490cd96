//! The fixed map: two lanes, two bases and the supply drops.
//!
//! Only the supply drop timers change during a session; everything else
//! is derived once from [`WorldConfig`].

use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// One of the two lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Lane 0, the upper route.
    North,
    /// Lane 1, the lower route.
    South,
}

impl Lane {
    /// Both lanes, by index.
    pub const ALL: [Self; 2] = [Self::North, Self::South];

    /// Lane index into [`World::lanes`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
        }
    }

    /// Vertical offset of the lane's spawn point from a base anchor.
    const fn spawn_dy(self) -> i32 {
        match self {
            Self::North => -20,
            Self::South => 200,
        }
    }
}

/// A supply crate location with its respawn countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyDrop {
    /// Where the crate lands.
    pub position: Vec2Fixed,
    /// Seconds until the next crate.
    #[serde(with = "fixed_serde")]
    pub timer: Fixed,
}

/// Map state for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Field width.
    pub width: u32,
    /// Field height.
    pub height: u32,
    /// Grid spacing for presenters.
    pub grid: u32,
    /// Lane polylines, player end first.
    pub lanes: [Vec<Vec2Fixed>; 2],
    /// Supply drop points.
    pub supply_drops: Vec<SupplyDrop>,
    /// Player base anchor.
    pub player_base: Vec2Fixed,
    /// Enemy base anchor.
    pub enemy_base: Vec2Fixed,
}

impl World {
    /// Build the map described by `config`.
    #[must_use]
    pub fn from_config(config: &WorldConfig) -> Self {
        let lane = |points: &[(i32, i32)]| -> Vec<Vec2Fixed> {
            points.iter().map(|&(x, y)| Vec2Fixed::from_ints(x, y)).collect()
        };
        Self {
            width: config.width,
            height: config.height,
            grid: config.grid,
            lanes: [lane(&config.lanes[0]), lane(&config.lanes[1])],
            supply_drops: config
                .supply_drops
                .iter()
                .map(|drop| SupplyDrop {
                    position: Vec2Fixed::from_ints(drop.x, drop.y),
                    timer: drop.timer,
                })
                .collect(),
            player_base: config.player_base(),
            enemy_base: config.enemy_base(),
        }
    }

    /// Waypoints of `lane` from the player side to the enemy side.
    #[must_use]
    pub fn lane(&self, lane: Lane) -> &[Vec2Fixed] {
        &self.lanes[lane.index()]
    }

    /// Path an enemy unit walks along `lane`: the lane reversed.
    #[must_use]
    pub fn enemy_path(&self, lane: Lane) -> Vec<Vec2Fixed> {
        self.lane(lane).iter().rev().copied().collect()
    }

    /// Where freshly trained player units appear for `lane`.
    #[must_use]
    pub fn player_spawn(&self, lane: Lane) -> Vec2Fixed {
        self.player_base + Vec2Fixed::from_ints(40, lane.spawn_dy())
    }

    /// Where wave units appear for `lane`.
    #[must_use]
    pub fn enemy_spawn(&self, lane: Lane) -> Vec2Fixed {
        self.enemy_base + Vec2Fixed::from_ints(60, lane.spawn_dy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_path_is_reversed_lane() {
        let world = World::from_config(&WorldConfig::default());
        let path = world.enemy_path(Lane::North);
        assert_eq!(path.first(), Some(&Vec2Fixed::from_ints(1080, 240)));
        assert_eq!(path.last(), Some(&Vec2Fixed::from_ints(120, 200)));
        assert_eq!(path.len(), world.lane(Lane::North).len());
    }

    #[test]
    fn test_spawn_points_offset_from_bases() {
        let world = World::from_config(&WorldConfig::default());
        let north = world.player_spawn(Lane::North);
        let south = world.player_spawn(Lane::South);
        assert_eq!(north.x, Fixed::from_num(184));
        assert_eq!(south.y - north.y, Fixed::from_num(220));
        assert_eq!(world.enemy_spawn(Lane::South).x, Fixed::from_num(1044));
    }

    #[test]
    fn test_supply_drops_copied_from_config() {
        let world = World::from_config(&WorldConfig::default());
        assert_eq!(world.supply_drops.len(), 3);
        assert_eq!(world.supply_drops[0].timer, Fixed::from_num(8));
        assert_eq!(world.supply_drops[2].position, Vec2Fixed::from_ints(360, 600));
    }
}
