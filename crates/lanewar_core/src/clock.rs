//! Virtual simulation clock and the in-game message log.
//!
//! Every timer in the game (wave cadence, boost windows, airstrike flight
//! time, supply drops) reads [`SimClock`]. The clock only moves inside
//! `Simulation::update`, so pausing the driver freezes all of them at once.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Seconds of simulated time since the session started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimClock {
    #[serde(with = "fixed_serde")]
    elapsed: Fixed,
}

impl SimClock {
    /// Clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Fixed::ZERO,
        }
    }

    /// Current simulation time in seconds.
    #[must_use]
    pub const fn now(&self) -> Fixed {
        self.elapsed
    }

    /// Move the clock forward.
    pub fn advance(&mut self, delta: Fixed) {
        self.elapsed += delta;
    }

    /// `mm:ss` label, as shown on the HUD.
    #[must_use]
    pub fn label(&self) -> String {
        let total = self.elapsed.to_num::<i64>().max(0);
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

/// Bounded, newest-first log of player-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl GameLog {
    /// Empty log keeping at most `capacity` lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend a message stamped with the clock time.
    pub fn push(&mut self, clock: &SimClock, text: impl AsRef<str>) {
        let text = text.as_ref();
        tracing::debug!(target: "lanewar::game_log", time = %clock.label(), "{text}");
        self.lines.push_front(format!("{} - {}", clock.label(), text));
        self.lines.truncate(self.capacity);
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines, newest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Most recent line.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    /// Number of lines held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_label() {
        let mut clock = SimClock::new();
        assert_eq!(clock.label(), "00:00");
        clock.advance(Fixed::from_num(125.9));
        assert_eq!(clock.label(), "02:05");
    }

    #[test]
    fn test_log_is_newest_first_and_bounded() {
        let clock = SimClock::new();
        let mut log = GameLog::new(3);
        for i in 0..5 {
            log.push(&clock, format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.latest(), Some("00:00 - line 4"));
        assert_eq!(log.lines().last(), Some("00:00 - line 2"));
    }
}
