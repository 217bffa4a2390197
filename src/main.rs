//! Tilejump headless runner
//!
//! Plays a level with a simple autopilot and prints the run summary as JSON.
//!
//! Usage: `tilejump [LEVEL.json] [MAX_TICKS]` (built-in first level when no
//! path is given).

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use glam::Vec2;
#[cfg(not(target_arch = "wasm32"))]
use tilejump::consts::*;
#[cfg(not(target_arch = "wasm32"))]
use tilejump::level::{self, Level};
#[cfg(not(target_arch = "wasm32"))]
use tilejump::sim::{FixedStep, GameState, GameStatus, KeyState, point_supported};

/// Two minutes of simulated play
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_MAX_TICKS: u64 = 120 * TICK_RATE as u64;

/// Pretend host frame time (50 Hz, so the stepper has catching up to do)
#[cfg(not(target_arch = "wasm32"))]
const HOST_FRAME_DT: f32 = 1.0 / 50.0;

/// Enemies closer than this (px) make the autopilot jump
#[cfg(not(target_arch = "wasm32"))]
const ENEMY_JUMP_RANGE: f32 = 48.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tilejump (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on the web; hosts drive `tick` themselves
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> tilejump::GameResult<()> {
    let mut args = std::env::args().skip(1);

    let level = match args.next() {
        Some(path) => {
            log::info!("Loading level from {path}");
            Level::from_json(&std::fs::read_to_string(&path)?)?
        }
        None => level::create_default(),
    };

    let max_ticks = args
        .next()
        .and_then(|raw| {
            raw.parse::<u64>()
                .inspect_err(|e| log::warn!("Ignoring tick limit '{raw}': {e}"))
                .ok()
        })
        .unwrap_or(DEFAULT_MAX_TICKS);

    let mut state = level::parse(&level)?;
    let mut stepper = FixedStep::new();

    while state.status == GameStatus::Playing && state.time_ticks < max_ticks {
        let input = autopilot(&state);
        stepper.advance(&mut state, &input, HOST_FRAME_DT)?;
    }

    log::info!(
        "Run ended {:?} after {} ticks ({} lives left)",
        state.status,
        state.time_ticks,
        state.player.lives
    );
    println!("{}", serde_json::to_string_pretty(&state.summary())?);
    Ok(())
}

/// Hold right and hop over walls, gaps and enemies
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState) -> KeyState {
    let player = &state.player;
    let bounds = player.bounds();
    let ahead = bounds.right() + 4.0;

    let wall_ahead = point_supported(Vec2::new(ahead, bounds.center().y), &state.platforms);
    let gap_ahead = !point_supported(
        Vec2::new(ahead + player.size.x, bounds.bottom()),
        &state.platforms,
    );
    let enemy_ahead = state.enemies.iter().any(|e| {
        let dx = e.pos.x - bounds.right();
        (0.0..ENEMY_JUMP_RANGE).contains(&dx) && (e.pos.y - player.pos.y).abs() < player.size.y
    });

    KeyState {
        right: true,
        jump: player.on_ground && (wall_ahead || gap_ahead || enemy_ahead),
        ..Default::default()
    }
}
