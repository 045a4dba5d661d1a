//! Headless simulation runner (default binary).
//!
//! Plays one session on a manual clock with a seeded bot and prints the
//! outcome. No terminal, no rendering, no wall-clock waiting.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;

use sumfall::core::{EngineConfig, SimpleRng};
use sumfall::engine::{ManualClock, NullSink, RecordingSink, Session};
use sumfall::types::{Command, EngineEvent, GameMode};

type SimSession = Session<ManualClock, RecordingSink, NullSink>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Run a headless falling-number game with a scripted bot.
#[derive(Debug, Parser)]
#[command(name = "sumfall-sim", version)]
struct Args {
    /// Game mode: classic, timeAttack, zen, challenges or survival.
    #[arg(short, long, default_value = "classic")]
    mode: GameMode,

    /// Seed for tiles and bot moves (overrides the config file).
    #[arg(short, long)]
    seed: Option<u32>,

    /// Maximum number of fall ticks to simulate.
    #[arg(short, long, default_value = "10000", value_name = "N")]
    ticks: u32,

    /// JSON file with engine settings; missing fields use defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Also print the final session snapshot.
    #[arg(long)]
    snapshot: bool,

    /// Log lock/cascade/level details (same as RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("invalid engine config")?;

    let clock = ManualClock::new();
    let mut session = Session::new(
        config,
        args.mode,
        clock.clone(),
        RecordingSink::new(),
        NullSink,
    );

    log::info!(
        "simulating {} with seed {} for up to {} ticks",
        args.mode,
        config.seed,
        args.ticks
    );
    let ticks = run(&mut session, &clock, config.seed, args.ticks);
    if !session.is_game_over() {
        log::warn!("tick budget of {} ran out before game over", args.ticks);
    }
    report(&session, ticks, &args)
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Drive the session one fall interval at a time until game over or the tick budget runs out.
///
/// Returns the number of fall intervals simulated.
fn run(session: &mut SimSession, clock: &ManualClock, seed: u32, max_ticks: u32) -> u32 {
    let mut bot = SimpleRng::new(seed ^ 0x9E37_79B9);
    let mut ticks = 0;

    while ticks < max_ticks && !session.is_game_over() {
        if let Some(command) = bot_command(&mut bot) {
            session.apply(command);
        }
        clock.advance(session.fall_interval_ms());
        session.update();
        ticks += 1;
    }
    ticks
}

/// Random play: mostly drift sideways, sometimes rotate or drop fast.
fn bot_command(rng: &mut SimpleRng) -> Option<Command> {
    match rng.next_range(100) {
        0..=29 => Some(Command::MoveLeft),
        30..=59 => Some(Command::MoveRight),
        60..=69 => Some(Command::Rotate),
        70..=74 => Some(Command::ToggleFastFall),
        _ => None,
    }
}

fn report(session: &SimSession, ticks: u32, args: &Args) -> Result<()> {
    let events = &session.effects().events;
    let clears = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::LineClear { .. }))
        .count();
    let level_ups = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::LevelUp { .. }))
        .count();
    let snapshot = session.snapshot();

    match args.format {
        Format::Json => {
            let mut doc = json!({
                "mode": session.mode(),
                "ticks": ticks,
                "finished": session.is_game_over(),
                "outcome": session.outcome(),
                "clears": clears,
                "levelUps": level_ups,
            });
            if args.snapshot {
                doc["snapshot"] = serde_json::to_value(&snapshot).context("failed to encode snapshot")?;
            }
            let text = serde_json::to_string_pretty(&doc).context("failed to encode report")?;
            println!("{text}");
        }
        Format::Text => {
            let status = if session.is_game_over() {
                "game over"
            } else {
                "still running"
            };
            println!(
                "{}: {} after {} ticks, score {}, level {}, target {}, {} clear(s), {} power-up(s), {} mistake(s), {:.1}s played",
                session.mode(),
                status,
                ticks,
                snapshot.score,
                snapshot.level,
                snapshot.target,
                clears,
                snapshot.power_ups.total(),
                snapshot.mistakes,
                snapshot.elapsed_ms as f64 / 1000.0,
            );
            if let Some(outcome) = session.outcome() {
                println!(
                    "max combo {}, max level {}, perfect: {}",
                    outcome.max_combo, outcome.max_level, outcome.perfect_game
                );
            }
            if args.snapshot {
                for row in snapshot.board.iter() {
                    let line: Vec<String> = row.iter().map(|v| format!("{v:>3}")).collect();
                    println!("{}", line.join(""));
                }
            }
        }
    }
    Ok(())
}
