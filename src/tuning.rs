//! Data-driven gameplay tuning
//!
//! Every constant `tick` reads lives here so a level pack can ship its own
//! feel as a JSON document. Missing fields fall back to the defaults in
//! `consts`, so a tuning file only needs to list what it changes.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Physics and scoring constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    // === Player movement ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Walking speed (px/s)
    pub player_speed: f32,
    /// Speed factor while "run" is held
    pub run_multiplier: f32,
    /// Upward launch speed of a jump (px/s)
    pub jump_force: f32,
    /// Horizontal velocity kept per nominal tick with no direction held
    pub friction: f32,

    // === Enemies ===
    /// Enemies fall with this fraction of the player's gravity
    pub enemy_gravity_scale: f32,
    /// Upward speed given to the player after a stomp (px/s)
    pub stomp_bounce: f32,
    /// Points per stomped enemy
    pub stomp_score: u64,

    // === Timers ===
    /// Damage invulnerability window (ms)
    pub invulnerability_ms: f32,
    /// Star power invulnerability window (ms)
    pub star_duration_ms: f32,

    // === Camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Particles ===
    /// Explosion particle lifetime (s)
    pub explosion_life: f32,
    /// Coin pop particle lifetime (s)
    pub coin_particle_life: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            player_speed: PLAYER_SPEED,
            run_multiplier: RUN_MULTIPLIER,
            jump_force: JUMP_FORCE,
            friction: FRICTION,

            enemy_gravity_scale: ENEMY_GRAVITY_SCALE,
            stomp_bounce: STOMP_BOUNCE,
            stomp_score: STOMP_SCORE,

            invulnerability_ms: INVULNERABILITY_MS,
            star_duration_ms: STAR_DURATION_MS,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            explosion_life: EXPLOSION_LIFE,
            coin_particle_life: COIN_PARTICLE_LIFE,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)
            .map_err(|e| GameError::InvalidTuning(e.to_string()))?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make the simulation misbehave
    pub fn validate(&self) -> GameResult<()> {
        let positive = [
            ("gravity", self.gravity),
            ("playerSpeed", self.player_speed),
            ("runMultiplier", self.run_multiplier),
            ("jumpForce", self.jump_force),
            ("enemyGravityScale", self.enemy_gravity_scale),
            ("viewportWidth", self.viewport_width),
            ("viewportHeight", self.viewport_height),
            ("explosionLife", self.explosion_life),
            ("coinParticleLife", self.coin_particle_life),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("stompBounce", self.stomp_bounce),
            ("invulnerabilityMs", self.invulnerability_ms),
            ("starDurationMs", self.star_duration_ms),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.friction) {
            return Err(GameError::InvalidTuning(format!(
                "friction must be within [0, 1], got {}",
                self.friction
            )));
        }
        Ok(())
    }

    /// Invulnerability window in seconds
    pub fn invulnerability_secs(&self) -> f64 {
        f64::from(self.invulnerability_ms) / 1000.0
    }

    /// Star power window in seconds
    pub fn star_secs(&self) -> f64 {
        f64::from(self.star_duration_ms) / 1000.0
    }
}
