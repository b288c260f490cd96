//! Headless lane-defense runner.
//!
//! This binary runs the game without graphics, controlled via JSON on stdin/stdout.
//! Designed for AI agents, CI testing, and replay verification.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p lanewar_headless
//!
//! # Custom rules, recording the session
//! cargo run -p lanewar_headless -- run --config rules.ron --record session.replay
//!
//! # Verify determinism of a scripted session
//! cargo run -p lanewar_headless -- verify --seed 7 --runs 5
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lanewar_core::config::GameConfig;
use lanewar_core::replay::{Replay, ReplayPlayer};
use lanewar_headless::runner::{HeadlessConfig, HeadlessRunner};
use lanewar_headless::session;

#[derive(Parser)]
#[command(name = "lanewar_headless")]
#[command(about = "Headless lane-defense runner for AI testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single interactive session
    Run {
        /// Session seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// RON rules file (defaults to the stock rules)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output state after every tick
        #[arg(long)]
        auto_state: bool,

        /// Save a replay of the session to this path on exit
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Verify determinism by running a scripted session several times
    Verify {
        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,

        /// Simulated seconds per run
        #[arg(long, default_value = "300")]
        seconds: u64,
    },

    /// Replay a recorded session
    Replay {
        /// Replay file path
        #[arg(short, long)]
        file: PathBuf,

        /// Verify replay produces identical hash
        #[arg(long)]
        verify: bool,
    },

    /// Run N ticks of the scripted session for benchmarking
    Benchmark {
        /// Number of ticks to run
        #[arg(short, long, default_value = "36000")]
        ticks: u64,

        /// Session seed
        #[arg(long, default_value = "1")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is for protocol
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    match cli.command {
        Some(Commands::Run {
            seed,
            config,
            auto_state,
            record,
        }) => cmd_run(seed, config, auto_state, record),
        Some(Commands::Verify {
            seed,
            runs,
            seconds,
        }) => cmd_verify(seed, runs, seconds),
        Some(Commands::Replay { file, verify }) => cmd_replay(file, verify),
        Some(Commands::Benchmark { ticks, seed }) => cmd_benchmark(ticks, seed),
        None => cmd_run(0, None, false, None),
    }
}

/// Run an interactive session over stdin/stdout
fn cmd_run(seed: u64, config: Option<PathBuf>, auto_state: bool, record: Option<PathBuf>) {
    let game = match config {
        Some(path) => match GameConfig::load(&path) {
            Ok(game) => game,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let mut runner = HeadlessRunner::with_config(HeadlessConfig {
        seed,
        game,
        auto_state_output: auto_state,
        record_path: record,
    });

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = runner.run(stdin.lock(), stdout.lock()) {
        eprintln!("Session failed: {e}");
        std::process::exit(1);
    }
}

/// Verify determinism
fn cmd_verify(seed: u64, runs: u32, seconds: u64) {
    let ticks_per_second = 20;
    tracing::info!(seed, runs, seconds, "Verifying determinism");

    if session::verify_determinism(seed, runs, seconds * ticks_per_second) {
        eprintln!("PASS: All {runs} runs produced identical results");
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        std::process::exit(1);
    }
}

/// Replay a recorded session
fn cmd_replay(file: PathBuf, verify: bool) {
    if verify {
        tracing::info!("Verifying replay: {}", file.display());
    } else {
        tracing::info!("Playing replay: {}", file.display());
    }

    let replay = match Replay::load(&file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load replay: {e}");
            std::process::exit(1);
        }
    };

    eprintln!("Loaded replay:");
    eprintln!("  Seed: {}", replay.seed);
    eprintln!("  Actions: {}", replay.action_count());
    eprintln!("  Duration: {} ticks", replay.ticks);

    if verify {
        let expected = replay.final_hash;
        let actual = replay.play().state_hash();
        if expected == actual {
            eprintln!("PASS: Replay verification successful");
            eprintln!("  Hash: {actual:016x}");
        } else {
            eprintln!("FAIL: Replay produced different hash!");
            eprintln!("  Expected: {expected:016x}");
            eprintln!("  Actual:   {actual:016x}");
            std::process::exit(1);
        }
        return;
    }

    let mut player = ReplayPlayer::new(replay);
    let mut last_percent = 0;
    while player.advance() {
        let percent = player.progress_percent() as u32;
        if percent >= last_percent + 10 {
            eprintln!("Progress: {percent}%");
            last_percent = percent - percent % 10;
        }
    }

    let sim = player.simulation();
    eprintln!("Replay complete at tick {}", player.current_tick());
    eprintln!("Final state hash: {:016x}", sim.state_hash());
    eprintln!("\nFinal State:");
    eprintln!("  Time: {}", sim.hud().time);
    eprintln!("  Wave: {}", sim.wave());
    eprintln!("  Score: {}", sim.score());
    eprintln!("  Entities: {}", sim.entities().len());
    if let Some(outcome) = sim.outcome() {
        eprintln!("  Outcome: {outcome:?}");
    }
}

/// Run benchmark
fn cmd_benchmark(ticks: u64, seed: u64) {
    tracing::info!("Running {} tick benchmark", ticks);

    let config = GameConfig::default();

    // Warmup
    let _ = session::build_order_session(seed, &config, 100);

    let start = Instant::now();
    let sim = session::build_order_session(seed, &config, ticks);
    let elapsed = start.elapsed();

    let tps = ticks as f64 / elapsed.as_secs_f64();

    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BENCHMARK RESULTS");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Ticks: {ticks}");
    eprintln!("Duration: {:.3}s", elapsed.as_secs_f64());
    eprintln!("Ticks/second: {tps:.1}");
    eprintln!("ms/tick: {:.4}", elapsed.as_secs_f64() * 1000.0 / ticks.max(1) as f64);
    eprintln!("Session clock: {}", sim.hud().time);
    eprintln!("Final entities: {}", sim.entities().len());
    eprintln!("State hash: {:016x}", sim.state_hash());
}
