//! Tilejump - a tile-based 2D platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `level`: Level document format, generators and the level loader
//! - `editor`: Grid editing, import/export and play-testing
//! - `tuning`: Data-driven game balance
//! - `error`: Crate error type

pub mod editor;
pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use tuning::Tuning;

/// Game configuration constants
///
/// Units are pixels and seconds (y grows downward). Speeds are px/s and
/// accelerations px/s², the per-tick figures scaled by `TICK_RATE`.
pub mod consts {
    /// Nominal simulation rate (Hz)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will try to catch up on (s)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Visible area
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 400.0;

    /// Player movement
    pub const GRAVITY: f32 = 0.5 * TICK_RATE * TICK_RATE;
    pub const PLAYER_SPEED: f32 = 3.0 * TICK_RATE;
    pub const RUN_MULTIPLIER: f32 = 1.5;
    pub const JUMP_FORCE: f32 = 12.0 * TICK_RATE;
    /// Horizontal velocity kept per nominal tick when no direction is held
    pub const FRICTION: f32 = 0.8;

    /// Enemies fall at half the player's gravity
    pub const ENEMY_GRAVITY_SCALE: f32 = 0.5;
    pub const STOMP_BOUNCE: f32 = 6.0 * TICK_RATE;
    pub const STOMP_SCORE: u64 = 200;
    pub const COIN_VALUE: u32 = 100;

    /// Timers (ms)
    pub const INVULNERABILITY_MS: f32 = 2000.0;
    pub const STAR_DURATION_MS: f32 = 10_000.0;

    pub const STARTING_LIVES: u8 = 3;

    /// Entity sizes (px) and walking speeds (px/s)
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    pub const GOOMBA_WIDTH: f32 = 24.0;
    pub const GOOMBA_HEIGHT: f32 = 24.0;
    pub const GOOMBA_SPEED: f32 = 2.0 * TICK_RATE;
    pub const KOOPA_WIDTH: f32 = 28.0;
    pub const KOOPA_HEIGHT: f32 = 32.0;
    pub const KOOPA_SPEED: f32 = 2.5 * TICK_RATE;
    pub const MUSHROOM_SIZE: f32 = 24.0;
    /// Coins, fire flowers and stars
    pub const SMALL_COLLECTIBLE_SIZE: f32 = 16.0;

    /// Flag geometry (px)
    pub const FLAG_POLE_WIDTH: f32 = 10.0;
    pub const FLAG_POLE_HEIGHT: f32 = 250.0;
    pub const FLAG_WIDTH: f32 = 30.0;
    pub const FLAG_HEIGHT: f32 = 20.0;

    /// Particles
    pub const EXPLOSION_LIFE: f32 = 30.0 / TICK_RATE;
    pub const COIN_PARTICLE_LIFE: f32 = 20.0 / TICK_RATE;
    /// Max horizontal speed of an explosion particle (px/s)
    pub const EXPLOSION_SPREAD: f32 = 2.0 * TICK_RATE;
    /// Upward speed of a freshly spawned particle (px/s)
    pub const PARTICLE_RISE: f32 = 2.0 * TICK_RATE;

    /// Cosmetic RNG seed for runs that don't choose one
    pub const DEFAULT_SEED: u64 = 0x7469_6c65_6a75_6d70;
}
