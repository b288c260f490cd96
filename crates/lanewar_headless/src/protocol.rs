//! JSON protocol for headless game communication.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** Game state updates and responses
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0","seed":42}`
//! 2. Controller sends commands as JSON lines
//! 3. Runner answers every command; `query` returns the full snapshot
//! 4. When the session ends, outputs `{"type":"game_over","result":"victory"|"defeat",...}`
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","seed":42}
//! -> {"cmd":"build","kind":"power"}
//! <- {"type":"ack","cmd":"build"}
//! -> {"cmd":"train","kind":"infantry"}
//! <- {"type":"refused","cmd":"train","reason":"Required structures are missing"}
//! -> {"cmd":"tick","count":220}
//! <- {"type":"ack","cmd":"tick"}
//! -> {"cmd":"query"}
//! <- {"type":"state","hash":1234,"snapshot":{...}}
//! -> {"cmd":"quit"}
//! <- {"type":"bye"}
//! ```

use serde::{Deserialize, Serialize};

use lanewar_core::events::GameOutcome;
use lanewar_core::snapshot::Snapshot;

/// Protocol version reported in `ready`.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (controller -> runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Advance the simulation by `count` updates of `delta` seconds.
    Tick {
        /// Number of updates (default 1).
        #[serde(default = "default_tick_count")]
        count: u32,
        /// Seconds per update; defaults to the maximum step.
        #[serde(default)]
        delta: Option<f64>,
    },

    /// Query current game state without advancing time.
    Query,

    /// Build a structure by type identifier.
    Build {
        /// Kind identifier, e.g. `"power"`.
        kind: String,
    },

    /// Train a unit by type identifier.
    Train {
        /// Kind identifier, e.g. `"infantry"`.
        kind: String,
    },

    /// Use an ability by identifier.
    Ability {
        /// `"airstrike"`, `"repair"` or `"boost"`.
        name: String,
    },

    /// Move the pending airstrike marker.
    Aim {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Confirm the pending airstrike at a point.
    Strike {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Toggle pause.
    Pause,

    /// Start a new campaign.
    Reset,

    /// Overwrite player resources.
    SetResources {
        /// New stockpile.
        amount: f64,
    },

    /// Overwrite stored energy.
    SetEnergy {
        /// New energy level.
        amount: f64,
    },

    /// Report the current state hash (for determinism verification).
    Hash,

    /// Quit the session.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (runner -> controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready {
        /// Protocol version.
        version: String,
        /// Session seed.
        seed: u64,
    },

    /// Acknowledgment of a command.
    Ack {
        /// Command name.
        cmd: String,
    },

    /// Error processing a command.
    Error {
        /// What went wrong.
        message: String,
        /// Command name, when the line parsed.
        cmd: Option<String>,
    },

    /// The rules refused an action; the text matches the in-game log line.
    Refused {
        /// Command name.
        cmd: String,
        /// Refusal reason.
        reason: String,
    },

    /// Current game state.
    State {
        /// State hash.
        hash: u64,
        /// Full presenter view.
        snapshot: Box<Snapshot>,
    },

    /// Session has ended.
    GameOver {
        /// Victory or defeat.
        result: GameOutcome,
        /// Final score.
        score: u32,
        /// Session clock, `mm:ss`.
        time: String,
    },

    /// State hash for determinism verification.
    StateHash {
        /// Session clock, `mm:ss`.
        time: String,
        /// State hash.
        hash: u64,
    },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    #[must_use]
    pub fn ready(seed: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            seed,
        }
    }

    /// Create an acknowledgment.
    #[must_use]
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Create a refusal response.
    pub fn refused(cmd: &str, reason: impl ToString) -> Self {
        Self::Refused {
            cmd: cmd.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Serialize to JSON line (with newline).
    #[must_use]
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed or unknown commands.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for acknowledgment.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Tick { .. } => "tick",
            Self::Query => "query",
            Self::Build { .. } => "build",
            Self::Train { .. } => "train",
            Self::Ability { .. } => "ability",
            Self::Aim { .. } => "aim",
            Self::Strike { .. } => "strike",
            Self::Pause => "pause",
            Self::Reset => "reset",
            Self::SetResources { .. } => "set_resources",
            Self::SetEnergy { .. } => "set_energy",
            Self::Hash => "hash",
            Self::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tick_command() {
        let json = r#"{"cmd":"tick","count":60}"#;
        let cmd = Command::from_json(json).unwrap();
        assert_eq!(
            cmd,
            Command::Tick {
                count: 60,
                delta: None
            }
        );
    }

    #[test]
    fn test_default_tick_count() {
        let json = r#"{"cmd":"tick"}"#;
        let cmd = Command::from_json(json).unwrap();
        assert!(matches!(cmd, Command::Tick { count: 1, .. }));
    }

    #[test]
    fn test_parse_build_and_strike() {
        let cmd = Command::from_json(r#"{"cmd":"build","kind":"power"}"#).unwrap();
        assert!(matches!(cmd, Command::Build { ref kind } if kind == "power"));
        assert_eq!(cmd.name(), "build");

        let cmd = Command::from_json(r#"{"cmd":"strike","x":600.0,"y":360}"#).unwrap();
        assert_eq!(cmd, Command::Strike { x: 600.0, y: 360.0 });
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Command::from_json(r#"{"cmd":"teleport"}"#).is_err());
    }

    #[test]
    fn test_serialize_refused_response() {
        let json = Response::refused("train", "Not enough resources").to_json_line();
        assert!(json.contains(r#""type":"refused""#));
        assert!(json.contains(r#""reason":"Not enough resources""#));
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_serialize_game_over() {
        let json = Response::GameOver {
            result: GameOutcome::Victory,
            score: 512,
            time: "03:10".to_string(),
        }
        .to_json_line();
        assert!(json.contains(r#""type":"game_over""#));
        assert!(json.contains(r#""result":"victory""#));
    }
}
