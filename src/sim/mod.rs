//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (and only for cosmetic particles)
//! - Stable iteration order (entities in level order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod stepper;
pub mod tick;

pub use collision::{Aabb, Contact, Contacts, point_supported, resolve_platform, resolve_platforms};
pub use state::{
    Collectible, Direction, Enemy, FlagPole, GameState, GameStatus, Particle, ParticleKind,
    Platform, PlatformKind, Player, PowerUp, RunSummary,
};
pub use stepper::FixedStep;
pub use tick::{KeyState, tick};
