//! Waypoint following along lane polylines.

use crate::components::UnitState;
use crate::math::{Fixed, Vec2Fixed};

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// No path, or the path is exhausted; the unit did not move.
    Idle,
    /// Moved toward the current waypoint.
    Moving,
    /// Moved and reached an intermediate waypoint.
    ReachedWaypoint,
    /// Moved and reached the last waypoint of the path.
    ReachedEnd,
}

/// Move `speed * delta` toward the current waypoint.
///
/// Within `arrival_radius` of the waypoint the index advances. On the
/// final waypoint the index is left one past the end; callers that loop
/// (trucks) reset it.
pub fn follow_path(
    position: &mut Vec2Fixed,
    state: &mut UnitState,
    delta: Fixed,
    arrival_radius: Fixed,
) -> PathStep {
    let Some(waypoint) = state.current_waypoint() else {
        return PathStep::Idle;
    };

    *position = position.step_toward(waypoint, state.speed * delta);

    if !position.within(waypoint, arrival_radius) {
        return PathStep::Moving;
    }

    state.waypoint += 1;
    if state.waypoint >= state.path_len() {
        PathStep::ReachedEnd
    } else {
        PathStep::ReachedWaypoint
    }
}
