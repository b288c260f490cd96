//! Replay system for recording and playing back sessions.
//!
//! A replay stores the seed, the configuration and the ordered stream of
//! player actions and frame deltas. Because the simulation is
//! deterministic, replaying the stream from a fresh session recreates
//! the game bit for bit.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::abilities::Ability;
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::kind::EntityKind;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::simulation::Simulation;

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayAction {
    /// `build(kind)`.
    Build(EntityKind),
    /// `train(kind)`.
    Train(EntityKind),
    /// `use_ability(ability)`.
    Ability(Ability),
    /// `aim_airstrike(point)`.
    AimStrike(Vec2Fixed),
    /// `confirm_airstrike(point)`.
    ConfirmStrike(Vec2Fixed),
    /// `toggle_pause()`.
    TogglePause,
    /// `reset()`.
    Reset,
    /// `set_resources(amount)`.
    SetResources(#[serde(with = "fixed_serde")] Fixed),
    /// `set_energy(amount)`.
    SetEnergy(#[serde(with = "fixed_serde")] Fixed),
    /// `update(delta)`.
    Tick(#[serde(with = "fixed_serde")] Fixed),
}

impl ReplayAction {
    /// Apply this input to `sim`. Refusals are part of the recorded game
    /// and are not errors here.
    pub fn apply(&self, sim: &mut Simulation) {
        match *self {
            Self::Build(kind) => {
                let _ = sim.build(kind);
            }
            Self::Train(kind) => {
                let _ = sim.train(kind);
            }
            Self::Ability(ability) => {
                let _ = sim.use_ability(ability);
            }
            Self::AimStrike(point) => {
                let _ = sim.aim_airstrike(point);
            }
            Self::ConfirmStrike(point) => {
                let _ = sim.confirm_airstrike(point);
            }
            Self::TogglePause => {
                sim.toggle_pause();
            }
            Self::Reset => {
                sim.reset();
            }
            Self::SetResources(amount) => sim.set_resources(amount),
            Self::SetEnergy(amount) => sim.set_energy(amount),
            Self::Tick(delta) => {
                sim.update(delta);
            }
        }
    }

    const fn is_tick(&self) -> bool {
        matches!(self, Self::Tick(_))
    }
}

/// A recorded action with the number of ticks that preceded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    /// Ticks run before this action was applied.
    pub tick: u64,
    /// The action.
    pub action: ReplayAction,
}

/// Complete replay data structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Seed the session was created with.
    pub seed: u64,
    /// Session configuration.
    pub config: GameConfig,
    /// Inputs in the order they were applied.
    pub entries: Vec<ReplayEntry>,
    /// Number of ticks recorded.
    pub ticks: u64,
    /// Final state hash for verification.
    pub final_hash: u64,
}

impl Replay {
    /// Start recording a session created with `seed` and `config`.
    #[must_use]
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            version: REPLAY_VERSION,
            seed,
            config,
            entries: Vec::new(),
            ticks: 0,
            final_hash: 0,
        }
    }

    /// Append an action.
    pub fn record(&mut self, action: ReplayAction) {
        let tick = self.ticks;
        if action.is_tick() {
            self.ticks += 1;
        }
        self.entries.push(ReplayEntry { tick, action });
    }

    /// Apply `action` to `sim` and record it.
    pub fn apply_and_record(&mut self, sim: &mut Simulation, action: ReplayAction) {
        action.apply(sim);
        self.record(action);
    }

    /// Store the hash of the session's final state.
    pub fn finalize(&mut self, final_hash: u64) {
        self.final_hash = final_hash;
    }

    /// A fresh session matching the recorded one's starting state.
    #[must_use]
    pub fn initial_simulation(&self) -> Simulation {
        Simulation::with_config(self.seed, self.config.clone())
    }

    /// Re-run every recorded action and return the resulting session.
    #[must_use]
    pub fn play(&self) -> Simulation {
        let mut sim = self.initial_simulation();
        for entry in &self.entries {
            entry.action.apply(&mut sim);
        }
        sim
    }

    /// Whether playing the replay reproduces the recorded final hash.
    #[must_use]
    pub fn verify(&self) -> bool {
        let actual = self.play().state_hash();
        if actual != self.final_hash {
            tracing::warn!(
                expected = self.final_hash,
                actual,
                "Replay diverged from recorded final state"
            );
        }
        actual == self.final_hash
    }

    /// Actions applied after exactly `tick` ticks.
    #[must_use]
    pub fn actions_at_tick(&self, tick: u64) -> Vec<&ReplayAction> {
        self.entries
            .iter()
            .filter(|entry| entry.tick == tick && !entry.action.is_tick())
            .map(|entry| &entry.action)
            .collect()
    }

    /// Number of recorded non-tick actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.action.is_tick()).count()
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize replay: {e}")))?;
        std::fs::write(path, bytes).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or deserialization fails, or if the
    /// file was written by an incompatible format version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let replay: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize replay: {e}")))?;

        if replay.version != REPLAY_VERSION {
            return Err(GameError::ReplayVersion {
                expected: REPLAY_VERSION,
                found: replay.version,
            });
        }

        Ok(replay)
    }
}

/// Step-by-step replay playback.
#[derive(Debug)]
pub struct ReplayPlayer {
    replay: Replay,
    simulation: Simulation,
    current_tick: u64,
    /// Index into the entry stream.
    cursor: usize,
}

impl ReplayPlayer {
    /// Create a player positioned before the first action.
    #[must_use]
    pub fn new(replay: Replay) -> Self {
        let simulation = replay.initial_simulation();
        Self {
            replay,
            simulation,
            current_tick: 0,
            cursor: 0,
        }
    }

    /// Apply entries up to and including the next tick.
    ///
    /// Returns true if there are more ticks to play.
    pub fn advance(&mut self) -> bool {
        while let Some(entry) = self.replay.entries.get(self.cursor) {
            entry.action.apply(&mut self.simulation);
            self.cursor += 1;
            if entry.action.is_tick() {
                self.current_tick += 1;
                break;
            }
        }
        !self.is_finished()
    }

    /// Rewind to the start and play forward to `target_tick`.
    pub fn seek(&mut self, target_tick: u64) {
        self.simulation = self.replay.initial_simulation();
        self.current_tick = 0;
        self.cursor = 0;
        while self.current_tick < target_tick && !self.is_finished() {
            self.advance();
        }
    }

    /// Ticks played so far.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Current simulation state.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// The replay being played.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Whether every entry has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.replay.entries.len()
    }

    /// Progress as a percentage (0-100).
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.replay.ticks == 0 {
            100.0
        } else {
            (self.current_tick as f64 / self.replay.ticks as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted_replay() -> Replay {
        let mut sim = Simulation::new(77);
        let mut replay = Replay::new(77, GameConfig::default());
        let delta = Fixed::from_num(0.05);

        replay.apply_and_record(&mut sim, ReplayAction::Build(EntityKind::Barracks));
        for _ in 0..40 {
            replay.apply_and_record(&mut sim, ReplayAction::Tick(delta));
        }
        replay.apply_and_record(&mut sim, ReplayAction::Train(EntityKind::Infantry));
        replay.apply_and_record(&mut sim, ReplayAction::Train(EntityKind::Rocket));
        for _ in 0..260 {
            replay.apply_and_record(&mut sim, ReplayAction::Tick(delta));
        }
        replay.finalize(sim.state_hash());
        replay
    }

    #[test]
    fn test_record_tracks_ticks() {
        let replay = scripted_replay();
        assert_eq!(replay.ticks, 300);
        assert_eq!(replay.action_count(), 3);
        assert_eq!(replay.actions_at_tick(0), vec![&ReplayAction::Build(EntityKind::Barracks)]);
        assert_eq!(replay.actions_at_tick(40).len(), 2);
        assert!(replay.actions_at_tick(7).is_empty());
    }

    #[test]
    fn test_play_reproduces_final_hash() {
        let replay = scripted_replay();
        assert!(replay.verify());
        assert_eq!(replay.play().state_hash(), replay.final_hash);
    }

    #[test]
    fn test_tampered_replay_fails_verification() {
        let mut replay = scripted_replay();
        replay.entries.remove(0);
        assert!(!replay.verify());
    }

    #[test]
    fn test_save_load() {
        let replay = scripted_replay();
        let path = std::env::temp_dir().join("lanewar_test_replay.bin");
        replay.save(&path).unwrap();

        let loaded = Replay::load(&path).unwrap();
        assert_eq!(loaded.seed, 77);
        assert_eq!(loaded.entries, replay.entries);
        assert_eq!(loaded.final_hash, replay.final_hash);
        assert!(loaded.verify());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut replay = scripted_replay();
        replay.version = REPLAY_VERSION + 1;
        let path = std::env::temp_dir().join("lanewar_test_replay_version.bin");
        replay.save(&path).unwrap();

        let err = Replay::load(&path).unwrap_err();
        assert!(matches!(err, GameError::ReplayVersion { found, .. } if found == REPLAY_VERSION + 1));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_player_advance_and_seek() {
        let replay = scripted_replay();
        let expected = replay.final_hash;
        let mut player = ReplayPlayer::new(replay);

        for _ in 0..5 {
            assert!(player.advance());
        }
        assert_eq!(player.current_tick(), 5);

        player.seek(150);
        assert_eq!(player.current_tick(), 150);
        assert!((player.progress_percent() - 50.0).abs() < 0.01);

        while player.advance() {}
        assert!(player.is_finished());
        assert_eq!(player.simulation().state_hash(), expected);
    }
}
