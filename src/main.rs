//! Headless dualfall runner (default binary).
//!
//! Plays one autoplayed session through the fixed-step runner, logs every
//! event and prints the final field and score.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;

use dualfall::core::{GameConfig, GameState};
use dualfall::engine::{Autoplayer, Runner};
use dualfall::types::{GameEvent, Mode, TICK_MS};

#[derive(Parser)]
#[command(name = "dualfall", version, about = "Headless falling-block session with a wrap-around wide mode")]
struct Cli {
    /// JSON config file (camelCase keys, every key optional)
    #[arg(long)]
    config: Option<PathBuf>,
    /// narrow or wide; overrides the config file
    #[arg(long, value_parser = parse_mode)]
    mode: Option<Mode>,
    /// Seeds both the piece randomizer and the autoplayer
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many 16 ms ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,
    /// Place each piece in one tick instead of steering it under gravity
    #[arg(long)]
    instant: bool,
    /// -v for debug logs, -vv for trace
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    Mode::from_str(s).ok_or_else(|| format!("unknown mode '{s}' (expected narrow or wide)"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = load_config(&cli)?;
    let mut game_state = GameState::new(config.clone()).context("invalid game config")?;
    let mut autoplayer = Autoplayer::new(config.seed);
    let mut runner = Runner::default();
    let tick = Duration::from_millis(TICK_MS as u64);

    log::info!(
        "starting {} session, {}x{}, seed {}",
        config.mode.as_str(),
        config.field_width(),
        config.height,
        config.seed
    );

    while runner.ticks() < cli.max_ticks && !game_state.game_over() {
        if cli.instant {
            autoplayer
                .place(&mut game_state)
                .context("autoplayer could not place piece")?;
            runner.step_once(&mut game_state, false);
        } else {
            let command = autoplayer.next_command(&game_state);
            if let Some(command) = command {
                runner.queue(command);
            }
            // Hold soft drop once the piece is lined up
            runner.advance(&mut game_state, tick, command.is_none());
        }

        for event in game_state.drain_events() {
            log_event(event);
        }
    }

    let snapshot = game_state.snapshot();
    print!("{}", snapshot.render_ascii());
    println!(
        "mode {} | score {} | lines {} | pieces {} | ticks {}{}",
        snapshot.mode.as_str(),
        snapshot.score,
        snapshot.lines,
        snapshot.pieces_spawned,
        runner.ticks(),
        if snapshot.game_over { " | game over" } else { "" }
    );

    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn log_event(event: GameEvent) {
    match event {
        GameEvent::PieceSpawned(kind) => log::debug!("spawned {}", kind.as_str()),
        GameEvent::LineDestroyed(row) => log::debug!("line {} destroyed", row),
        GameEvent::GameOver => log::info!("game over"),
        other => log::trace!("{}", other.as_str()),
    }
}
