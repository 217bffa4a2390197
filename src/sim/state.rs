//! Game state and runtime entity types
//!
//! A `GameState` is built once per play by the level loader and then mutated
//! in place by `tick` until its status leaves `Playing`. Nothing in here is
//! shared: every entity is owned by exactly one state and discarded with it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::level::{CollectibleKind, EnemyKind};
use crate::tuning::Tuning;

/// Horizontal facing / travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    Playing,
    Paused,
    /// Lives exhausted
    GameOver,
    /// Flag pole reached
    Complete,
}

impl GameStatus {
    /// Terminal statuses can only be left by building a fresh state
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Complete)
    }
}

/// Player power-up level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUp {
    #[default]
    Small,
    Big,
    Fire,
}

/// Terrain kinds that compile into platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Ground,
    Brick,
    Cloud,
    Pipe,
}

/// Static solid geometry. Never moves once spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Aabb,
    pub solid: bool,
    pub breakable: bool,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(bounds: Aabb, kind: PlatformKind, breakable: bool) -> Self {
        Self {
            bounds,
            solid: true,
            breakable,
            kind,
        }
    }
}

/// A walking enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub direction: Direction,
    pub alive: bool,
}

impl Enemy {
    /// Spawn an enemy of `kind` at `pos`, walking left at its kind's speed
    pub fn spawn(id: impl Into<String>, kind: EnemyKind, pos: Vec2) -> Self {
        let (size, speed) = match kind {
            EnemyKind::Koopa => (Vec2::new(KOOPA_WIDTH, KOOPA_HEIGHT), KOOPA_SPEED),
            EnemyKind::Goomba | EnemyKind::Piranha => {
                (Vec2::new(GOOMBA_WIDTH, GOOMBA_HEIGHT), GOOMBA_SPEED)
            }
        };
        let direction = Direction::Left;
        Self {
            id: id.into(),
            kind,
            pos,
            vel: Vec2::new(direction.sign() * speed, 0.0),
            size,
            direction,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Reverse horizontal travel
    pub fn turn_around(&mut self) {
        self.vel.x = -self.vel.x;
        self.direction = self.direction.flipped();
    }

    /// Face and travel in `direction` without changing speed
    pub fn head(&mut self, direction: Direction) {
        self.vel.x = direction.sign() * self.vel.x.abs();
        self.direction = direction;
    }
}

/// Something the player can pick up once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: String,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub value: u32,
    /// One-way: never goes back to false
    pub collected: bool,
}

impl Collectible {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Cosmetic particle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Coin,
    Explosion,
    Brick,
}

/// A particle for visual effects (never affects gameplay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    /// Seconds at spawn, for fade-out
    pub max_life: f32,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, vel: Vec2, life: f32) -> Self {
        Self {
            kind,
            pos,
            vel,
            life,
            max_life: life,
        }
    }

    /// Remaining life as a 0-1 fraction
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Direction,
    pub on_ground: bool,
    pub is_jumping: bool,
    pub is_running: bool,
    pub invulnerable: bool,
    /// Game time (seconds) at which invulnerability wears off
    pub invulnerable_until: f64,
    pub lives: u8,
    pub power_up: PowerUp,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            facing: Direction::Right,
            on_ground: false,
            is_jumping: false,
            is_running: false,
            invulnerable: false,
            invulnerable_until: 0.0,
            lives: STARTING_LIVES,
            power_up: PowerUp::Small,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Become invulnerable until `until`, never shortening an active window
    pub fn grant_invulnerability(&mut self, until: f64) {
        self.invulnerable = true;
        self.invulnerable_until = self.invulnerable_until.max(until);
    }
}

/// End-of-level flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagPole {
    pub pole: Aabb,
    /// Flag cloth, anchored at the top of the pole
    pub flag: Aabb,
    pub reached: bool,
}

impl FlagPole {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pole: Aabb::from_pos_size(pos, Vec2::new(FLAG_POLE_WIDTH, FLAG_POLE_HEIGHT)),
            flag: Aabb::from_pos_size(pos, Vec2::new(FLAG_WIDTH, FLAG_HEIGHT)),
            reached: false,
        }
    }
}

/// Figures reported when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub level_id: String,
    pub score: u64,
    pub coins_collected: u32,
    pub enemies_defeated: u32,
    pub completed: bool,
    /// Simulated seconds
    pub time_elapsed: f64,
}

/// Complete simulation state for one run (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Id of the level this run was compiled from
    pub level_id: String,
    /// Level extent in pixels
    pub level_width: f32,
    pub level_height: f32,
    /// Respawn point in pixels
    pub spawn: Vec2,
    /// Horizontal camera offset
    pub camera_x: f32,
    /// Never decreases within a run
    pub score: u64,
    /// Simulated seconds
    pub game_time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub status: GameStatus,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub flag_pole: Option<FlagPole>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub coins_collected: u32,
    pub enemies_defeated: u32,
    /// Constants this run was started with
    pub tuning: Tuning,
    /// Cosmetic RNG (particle spread only)
    pub rng: Pcg32,
}

impl GameState {
    /// Create an empty run over a level of the given pixel extent.
    ///
    /// The loader fills in terrain and entities; tests build states by hand.
    pub fn new(level_id: impl Into<String>, level_width: f32, level_height: f32, spawn: Vec2) -> Self {
        Self {
            level_id: level_id.into(),
            level_width,
            level_height,
            spawn,
            camera_x: 0.0,
            score: 0,
            game_time: 0.0,
            time_ticks: 0,
            status: GameStatus::Playing,
            player: Player::new(spawn),
            platforms: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            flag_pole: None,
            particles: Vec::new(),
            coins_collected: 0,
            enemies_defeated: 0,
            tuning: Tuning::default(),
            rng: Pcg32::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Reseed the cosmetic RNG (for replays)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    /// `playing → paused`. Returns false (and changes nothing) otherwise.
    pub fn pause(&mut self) -> bool {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
            log::info!("Paused at t={:.2}s", self.game_time);
            true
        } else {
            false
        }
    }

    /// `paused → playing`. Returns false (and changes nothing) otherwise.
    pub fn resume(&mut self) -> bool {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
            log::info!("Resumed at t={:.2}s", self.game_time);
            true
        } else {
            false
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            level_id: self.level_id.clone(),
            score: self.score,
            coins_collected: self.coins_collected,
            enemies_defeated: self.enemies_defeated,
            completed: self.status == GameStatus::Complete,
            time_elapsed: self.game_time,
        }
    }

    /// Uncollected collectibles
    pub fn remaining_collectibles(&self) -> impl Iterator<Item = &Collectible> {
        self.collectibles.iter().filter(|c| !c.collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        let mut state = GameState::new("t", 640.0, 320.0, Vec2::ZERO);
        assert!(!state.resume());
        assert!(state.pause());
        assert_eq!(state.status, GameStatus::Paused);
        assert!(!state.pause());
        assert!(state.resume());
        assert_eq!(state.status, GameStatus::Playing);

        state.status = GameStatus::GameOver;
        assert!(!state.pause());
        assert!(!state.resume());
        assert_eq!(state.status, GameStatus::GameOver);
    }

    #[test]
    fn test_enemy_spawn_sizes() {
        let koopa = Enemy::spawn("k", EnemyKind::Koopa, Vec2::ZERO);
        assert_eq!(koopa.size, Vec2::new(28.0, 32.0));
        assert_eq!(koopa.vel.x, -KOOPA_SPEED);
        assert_eq!(koopa.direction, Direction::Left);

        let goomba = Enemy::spawn("g", EnemyKind::Goomba, Vec2::ZERO);
        assert_eq!(goomba.size, Vec2::new(24.0, 24.0));
        assert_eq!(goomba.vel.x, -GOOMBA_SPEED);
    }

    #[test]
    fn test_turn_around_keeps_direction_in_sync() {
        let mut enemy = Enemy::spawn("g", EnemyKind::Goomba, Vec2::ZERO);
        enemy.turn_around();
        assert!(enemy.vel.x > 0.0);
        assert_eq!(enemy.direction, Direction::Right);
        enemy.head(Direction::Right);
        assert!(enemy.vel.x > 0.0);
        enemy.head(Direction::Left);
        assert!(enemy.vel.x < 0.0);
        assert_eq!(enemy.direction, Direction::Left);
    }

    #[test]
    fn test_invulnerability_never_shortens() {
        let mut player = Player::new(Vec2::ZERO);
        player.grant_invulnerability(10.0);
        player.grant_invulnerability(2.0);
        assert!(player.invulnerable);
        assert_eq!(player.invulnerable_until, 10.0);
    }

    #[test]
    fn test_flag_anchored_at_pole_top() {
        let flag = FlagPole::at(Vec2::new(100.0, 50.0));
        assert_eq!(flag.pole.size, Vec2::new(10.0, 250.0));
        assert_eq!(flag.flag.pos, flag.pole.pos);
        assert_eq!(flag.flag.size, Vec2::new(30.0, 20.0));
    }
}
