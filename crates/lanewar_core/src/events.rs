//! Events the simulation emits for presentation layers.

use serde::{Deserialize, Serialize};

use crate::combat::Kill;
use crate::components::EntityId;

/// Sound a presenter should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// A player structure or unit appeared.
    Spawn,
    /// A shot landed.
    Hit,
}

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// The enemy headquarters fell.
    Victory,
    /// The player headquarters fell.
    Defeat,
}

/// Events generated during one tick or by one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Sound cues, in emission order.
    pub cues: Vec<SoundCue>,
    /// Entities purged this tick.
    pub deaths: Vec<EntityId>,
    /// Entities created.
    pub spawned: Vec<EntityId>,
    /// Kills scored.
    pub kills: Vec<Kill>,
    /// Set on the tick the session ends.
    pub outcome: Option<GameOutcome>,
}

impl TickEvents {
    /// Number of cues of `cue`.
    #[must_use]
    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}
