//! Headless game runner implementation.
//!
//! Reads [`Command`]s line by line, drives a [`Simulation`] synchronously and
//! writes one or more [`Response`]s per command. Every input that reaches the
//! simulation is also recorded into a [`Replay`].

use std::io::{BufRead, Write};
use std::path::PathBuf;

use lanewar_core::abilities::Ability;
use lanewar_core::config::GameConfig;
use lanewar_core::kind::EntityKind;
use lanewar_core::math::{Fixed, Vec2Fixed};
use lanewar_core::replay::{Replay, ReplayAction};
use lanewar_core::simulation::{ActionResult, Simulation};

use crate::error::RunnerError;
use crate::protocol::{Command, Response};

/// Upper bound on updates a single `tick` command may request.
pub const MAX_TICKS_PER_COMMAND: u32 = 100_000;

/// Headless runner configuration.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Session seed.
    pub seed: u64,
    /// Rules and map; defaults to the stock game.
    pub game: GameConfig,
    /// Output state after every `tick` (vs only on `query`).
    pub auto_state_output: bool,
    /// Where to save the recorded replay when the session ends.
    pub record_path: Option<PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            game: GameConfig::default(),
            auto_state_output: false,
            record_path: None,
        }
    }
}

/// What the read loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Headless runner: one simulation session driven by JSON lines.
#[derive(Debug)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
    sim: Simulation,
    replay: Replay,
    reported_outcome: bool,
}

impl HeadlessRunner {
    /// Create a runner with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    /// Create a runner with custom configuration.
    #[must_use]
    pub fn with_config(config: HeadlessConfig) -> Self {
        let sim = Simulation::with_config(config.seed, config.game.clone());
        let replay = Replay::new(config.seed, config.game.clone());
        Self {
            config,
            sim,
            replay,
            reported_outcome: false,
        }
    }

    /// The live simulation.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Inputs recorded so far.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Run the session until `quit` or end of input.
    ///
    /// Writes `ready` first and `bye` last. The replay is finalized and, if a
    /// record path is configured, saved before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input, writing output or saving the replay
    /// fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), RunnerError> {
        tracing::info!(seed = self.config.seed, "Headless session started");
        write_response(&mut output, &Response::ready(self.config.seed))?;

        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (responses, flow) = match Command::from_json(trimmed) {
                Ok(cmd) => {
                    tracing::debug!(cmd = cmd.name(), "Command received");
                    self.handle(cmd)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed command");
                    (
                        vec![Response::error(format!("Invalid command: {e}"), None)],
                        Flow::Continue,
                    )
                }
            };

            for response in &responses {
                write_response(&mut output, response)?;
            }
            if flow == Flow::Quit {
                break;
            }
        }

        self.finish()?;
        write_response(&mut output, &Response::Bye)?;
        Ok(())
    }

    /// Process one command and return the responses it produces.
    pub fn respond(&mut self, cmd: Command) -> Vec<Response> {
        self.handle(cmd).0
    }

    fn handle(&mut self, cmd: Command) -> (Vec<Response>, Flow) {
        let name = cmd.name();
        let mut responses = Vec::new();

        match cmd {
            Command::Tick { count, delta } => {
                let delta = match delta {
                    Some(seconds) => match to_fixed(seconds) {
                        Some(d) => d,
                        None => return (vec![out_of_range(name)], Flow::Continue),
                    },
                    None => self.sim.rules().max_delta,
                };
                let count = count.min(MAX_TICKS_PER_COMMAND);
                for _ in 0..count {
                    self.apply(ReplayAction::Tick(delta));
                }
                responses.push(Response::ack(name));
                if self.config.auto_state_output {
                    responses.push(self.state());
                }
            }
            Command::Query => responses.push(self.state()),
            Command::Build { kind } => match kind.parse::<EntityKind>() {
                Ok(kind) => {
                    let result = self.sim.build(kind);
                    self.replay.record(ReplayAction::Build(kind));
                    responses.push(action_response(name, &result));
                }
                Err(e) => responses.push(Response::error(e.to_string(), Some(name))),
            },
            Command::Train { kind } => match kind.parse::<EntityKind>() {
                Ok(kind) => {
                    let result = self.sim.train(kind);
                    self.replay.record(ReplayAction::Train(kind));
                    responses.push(action_response(name, &result));
                }
                Err(e) => responses.push(Response::error(e.to_string(), Some(name))),
            },
            Command::Ability { name: ability } => match ability.parse::<Ability>() {
                Ok(ability) => {
                    let result = self.sim.use_ability(ability);
                    self.replay.record(ReplayAction::Ability(ability));
                    responses.push(action_response(name, &result));
                }
                Err(e) => responses.push(Response::error(e.to_string(), Some(name))),
            },
            Command::Aim { x, y } => match to_point(x, y) {
                Some(point) => {
                    let result = self.sim.aim_airstrike(point);
                    self.replay.record(ReplayAction::AimStrike(point));
                    responses.push(match result {
                        Ok(()) => Response::ack(name),
                        Err(e) => Response::refused(name, e),
                    });
                }
                None => responses.push(out_of_range(name)),
            },
            Command::Strike { x, y } => match to_point(x, y) {
                Some(point) => {
                    let result = self.sim.confirm_airstrike(point);
                    self.replay.record(ReplayAction::ConfirmStrike(point));
                    responses.push(action_response(name, &result));
                }
                None => responses.push(out_of_range(name)),
            },
            Command::Pause => {
                self.apply(ReplayAction::TogglePause);
                responses.push(Response::ack(name));
            }
            Command::Reset => {
                self.apply(ReplayAction::Reset);
                self.reported_outcome = false;
                responses.push(Response::ack(name));
            }
            Command::SetResources { amount } => match to_fixed(amount) {
                Some(amount) => {
                    self.apply(ReplayAction::SetResources(amount));
                    responses.push(Response::ack(name));
                }
                None => responses.push(out_of_range(name)),
            },
            Command::SetEnergy { amount } => match to_fixed(amount) {
                Some(amount) => {
                    self.apply(ReplayAction::SetEnergy(amount));
                    responses.push(Response::ack(name));
                }
                None => responses.push(out_of_range(name)),
            },
            Command::Hash => responses.push(Response::StateHash {
                time: self.sim.hud().time.clone(),
                hash: self.sim.state_hash(),
            }),
            Command::Quit => return (responses, Flow::Quit),
        }

        if let Some(game_over) = self.take_outcome() {
            responses.push(game_over);
        }
        (responses, Flow::Continue)
    }

    fn apply(&mut self, action: ReplayAction) {
        self.replay.apply_and_record(&mut self.sim, action);
    }

    fn state(&self) -> Response {
        Response::State {
            hash: self.sim.state_hash(),
            snapshot: Box::new(self.sim.snapshot()),
        }
    }

    /// `game_over` is reported once per campaign.
    fn take_outcome(&mut self) -> Option<Response> {
        if self.reported_outcome {
            return None;
        }
        let result = self.sim.outcome()?;
        self.reported_outcome = true;
        tracing::info!(?result, score = self.sim.score(), "Session ended");
        Some(Response::GameOver {
            result,
            score: self.sim.score(),
            time: self.sim.hud().time.clone(),
        })
    }

    fn finish(&mut self) -> Result<(), RunnerError> {
        self.replay.finalize(self.sim.state_hash());
        if let Some(path) = &self.config.record_path {
            self.replay.save(path)?;
            tracing::info!(
                path = %path.display(),
                actions = self.replay.action_count(),
                "Replay saved"
            );
        }
        Ok(())
    }
}

impl Default for HeadlessRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn write_response<W: Write>(output: &mut W, response: &Response) -> std::io::Result<()> {
    output.write_all(response.to_json_line().as_bytes())?;
    output.flush()
}

fn action_response(cmd: &str, result: &ActionResult) -> Response {
    match result {
        Ok(_) => Response::ack(cmd),
        Err(e) => Response::refused(cmd, e),
    }
}

fn out_of_range(cmd: &str) -> Response {
    Response::error("Value out of range", Some(cmd))
}

fn to_fixed(value: f64) -> Option<Fixed> {
    if value.is_finite() {
        Fixed::checked_from_num(value)
    } else {
        None
    }
}

fn to_point(x: f64, y: f64) -> Option<Vec2Fixed> {
    Some(Vec2Fixed::new(to_fixed(x)?, to_fixed(y)?))
}
