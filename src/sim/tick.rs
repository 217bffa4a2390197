//! Fixed timestep simulation tick
//!
//! Advances a `GameState` by one step from a snapshot of held keys. The whole
//! state is validated before anything is touched, so a failed tick leaves the
//! state exactly as it was.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{point_supported, resolve_platforms};
use super::state::{Direction, GameState, GameStatus, Particle, ParticleKind, PowerUp};
use crate::consts::*;
use crate::error::{GameError, GameResult};
use crate::level::CollectibleKind;

/// Keys held during a single tick (pure input snapshot)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    /// Not bound to an action; hosts usually map it to `jump` as well
    pub up: bool,
    /// Not bound to an action
    pub down: bool,
    pub jump: bool,
    pub run: bool,
}

/// Advance the game state by one fixed timestep.
///
/// A state that is not `Playing` is left untouched. Order per step: player
/// intent, jump, gravity, integration, platform collision, world bounds,
/// camera, enemies, enemy contacts, pickups, flag, particles, clock.
pub fn tick(state: &mut GameState, input: &KeyState, dt: f32) -> GameResult<()> {
    validate(state, dt)?;

    if state.status != GameStatus::Playing {
        return Ok(());
    }

    state.time_ticks += 1;
    if state.player.invulnerable && state.game_time >= state.player.invulnerable_until {
        state.player.invulnerable = false;
    }

    update_player(state, input, dt);
    apply_world_bounds(state);
    update_camera(state);
    update_enemies(state, dt);

    if state.status == GameStatus::Playing {
        resolve_enemy_contacts(state);
    }
    state.enemies.retain(|e| e.alive);

    if state.status == GameStatus::Playing {
        collect_pickups(state);
        check_flag(state);
    }

    update_particles(state, dt);
    state.game_time += f64::from(dt);

    Ok(())
}

/// Reject corrupt state before any mutation happens
fn validate(state: &GameState, dt: f32) -> GameResult<()> {
    let invalid = |what: String| Err(GameError::InvalidTickInput(what));

    if !dt.is_finite() || dt <= 0.0 {
        return invalid(format!("dt must be finite and positive, got {dt}"));
    }
    if !(state.level_width.is_finite() && state.level_width > 0.0)
        || !(state.level_height.is_finite() && state.level_height > 0.0)
    {
        return invalid(format!(
            "level extent must be positive, got {}x{}",
            state.level_width, state.level_height
        ));
    }
    if !state.game_time.is_finite() || !state.spawn.is_finite() || !state.camera_x.is_finite() {
        return invalid("clock, spawn or camera is not finite".to_string());
    }

    let player = &state.player;
    if !player.pos.is_finite() || !player.vel.is_finite() || !player.invulnerable_until.is_finite()
    {
        return invalid(format!(
            "player state is not finite (pos {}, vel {})",
            player.pos, player.vel
        ));
    }
    if !(player.size.is_finite() && player.size.cmpgt(Vec2::ZERO).all()) {
        return invalid(format!("player size must be positive, got {}", player.size));
    }

    if let Some(enemy) = state
        .enemies
        .iter()
        .find(|e| !(e.pos.is_finite() && e.vel.is_finite() && e.size.is_finite()))
    {
        return invalid(format!("enemy '{}' is not finite", enemy.id));
    }
    if state.platforms.iter().any(|p| !p.bounds.is_finite()) {
        return invalid("platform bounds are not finite".to_string());
    }
    if let Some(item) = state.collectibles.iter().find(|c| !c.bounds().is_finite()) {
        return invalid(format!("collectible '{}' is not finite", item.id));
    }
    if state
        .particles
        .iter()
        .any(|p| !(p.pos.is_finite() && p.vel.is_finite() && p.life.is_finite()))
    {
        return invalid("particle state is not finite".to_string());
    }

    state.tuning.validate()
}

/// Horizontal intent, jump, gravity, integration and platform collision
fn update_player(state: &mut GameState, input: &KeyState, dt: f32) {
    let GameState {
        player,
        platforms,
        tuning,
        ..
    } = state;

    player.is_running = input.run;
    let speed = if input.run {
        tuning.player_speed * tuning.run_multiplier
    } else {
        tuning.player_speed
    };

    if input.left {
        player.vel.x = -speed;
        player.facing = Direction::Left;
    } else if input.right {
        player.vel.x = speed;
        player.facing = Direction::Right;
    } else {
        // Friction is specified per nominal tick
        player.vel.x *= tuning.friction.powf(dt / SIM_DT);
    }

    if input.jump && player.on_ground {
        player.vel.y = -tuning.jump_force;
        player.is_jumping = true;
        player.on_ground = false;
    }

    player.vel.y += tuning.gravity * dt;

    let prev = player.pos;
    player.pos += player.vel * dt;

    player.on_ground = false;
    let contacts = resolve_platforms(&mut player.pos, &mut player.vel, player.size, prev, platforms);
    if contacts.ground {
        player.on_ground = true;
        player.is_jumping = false;
    }
}

/// Left wall clamp and falling out of the level
fn apply_world_bounds(state: &mut GameState) {
    if state.player.pos.x < 0.0 {
        state.player.pos.x = 0.0;
    }

    if state.player.pos.y > state.level_height {
        lose_life(state, "fell out of the level");
        if state.status == GameStatus::Playing {
            state.player.pos = state.spawn;
            state.player.vel = Vec2::ZERO;
            log::debug!("Respawned at {}", state.spawn);
        }
    }
}

/// Keep the player centred, clamped to the level
fn update_camera(state: &mut GameState) {
    let viewport = state.tuning.viewport_width;
    let max_x = (state.level_width - viewport).max(0.0);
    state.camera_x = (state.player.pos.x - viewport / 2.0).clamp(0.0, max_x);
}

/// Gravity, platform collision, wall bounce, ledge avoidance and level bounds
fn update_enemies(state: &mut GameState, dt: f32) {
    let GameState {
        enemies,
        platforms,
        tuning,
        level_width,
        level_height,
        ..
    } = state;
    let gravity = tuning.gravity * tuning.enemy_gravity_scale;

    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        enemy.vel.y += gravity * dt;

        let prev = enemy.pos;
        enemy.pos += enemy.vel * dt;

        let contacts = resolve_platforms(&mut enemy.pos, &mut enemy.vel, enemy.size, prev, platforms);
        if contacts.wall.is_some() {
            enemy.turn_around();
        }

        if contacts.ground {
            let bounds = enemy.bounds();
            let look_ahead_x = if enemy.vel.x > 0.0 {
                bounds.right() + enemy.size.x
            } else {
                bounds.left() - enemy.size.x
            };
            if !point_supported(Vec2::new(look_ahead_x, bounds.bottom()), platforms) {
                enemy.turn_around();
            }
        }

        if enemy.pos.x < 0.0 {
            enemy.pos.x = 0.0;
            enemy.head(Direction::Right);
        } else if enemy.pos.x > *level_width - enemy.size.x {
            enemy.pos.x = *level_width - enemy.size.x;
            enemy.head(Direction::Left);
        }

        if enemy.pos.y > *level_height {
            enemy.alive = false;
            log::debug!("Enemy '{}' fell out of the level", enemy.id);
        }
    }
}

/// Stomp or take damage. Skipped entirely while invulnerable.
fn resolve_enemy_contacts(state: &mut GameState) {
    // Stomp geometry is fixed for the whole pass
    let descending = state.player.vel.y > 0.0;
    let player_top = state.player.pos.y;
    let mut stomped = false;

    for i in 0..state.enemies.len() {
        if state.status != GameStatus::Playing || state.player.invulnerable {
            break;
        }

        let enemy = &state.enemies[i];
        if !enemy.alive || !state.player.bounds().overlaps(&enemy.bounds()) {
            continue;
        }

        if descending && player_top < enemy.pos.y {
            let pos = enemy.pos;
            state.enemies[i].alive = false;
            stomped = true;
            state.score = state.score.saturating_add(state.tuning.stomp_score);
            state.enemies_defeated = state.enemies_defeated.saturating_add(1);

            let spread = state.rng.random_range(-EXPLOSION_SPREAD..=EXPLOSION_SPREAD);
            let life = state.tuning.explosion_life;
            state.particles.push(Particle::new(
                ParticleKind::Explosion,
                pos,
                Vec2::new(spread, -PARTICLE_RISE),
                life,
            ));
            log::debug!("Stomped '{}', score {}", state.enemies[i].id, state.score);
        } else {
            let cause = format!("hit by {:?}", enemy.kind);
            lose_life(state, &cause);
            let until = state.game_time + state.tuning.invulnerability_secs();
            state.player.grant_invulnerability(until);
        }
    }

    if stomped {
        state.player.vel.y = -state.tuning.stomp_bounce;
    }
}

/// Mark overlapped collectibles collected, exactly once each
fn collect_pickups(state: &mut GameState) {
    let GameState {
        player,
        collectibles,
        particles,
        tuning,
        score,
        coins_collected,
        game_time,
        ..
    } = state;
    let player_bounds = player.bounds();

    for item in collectibles.iter_mut().filter(|c| !c.collected) {
        if !player_bounds.overlaps(&item.bounds()) {
            continue;
        }

        item.collected = true;
        *score = score.saturating_add(u64::from(item.value));

        match item.kind {
            CollectibleKind::Coin => *coins_collected = coins_collected.saturating_add(1),
            CollectibleKind::Mushroom => {
                if player.power_up == PowerUp::Small {
                    player.power_up = PowerUp::Big;
                }
            }
            CollectibleKind::FireFlower => player.power_up = PowerUp::Fire,
            CollectibleKind::Star => {
                player.grant_invulnerability(*game_time + tuning.star_secs());
            }
        }

        particles.push(Particle::new(
            ParticleKind::Coin,
            item.pos,
            Vec2::new(0.0, -PARTICLE_RISE),
            tuning.coin_particle_life,
        ));
        log::debug!("Collected {:?} '{}' (+{}), score {}", item.kind, item.id, item.value, score);
    }
}

/// Touching the pole or flag completes the level
fn check_flag(state: &mut GameState) {
    let player_bounds = state.player.bounds();
    let Some(flag) = state.flag_pole.as_mut() else {
        return;
    };
    if flag.reached {
        return;
    }
    if player_bounds.overlaps(&flag.pole) || player_bounds.overlaps(&flag.flag) {
        flag.reached = true;
        state.status = GameStatus::Complete;
        log::info!(
            "Level '{}' complete at t={:.2}s, score {}",
            state.level_id,
            state.game_time,
            state.score
        );
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Take one life and drop any power-up. Ends the run when none remain.
fn lose_life(state: &mut GameState, cause: &str) {
    if state.status != GameStatus::Playing {
        return;
    }
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.power_up = PowerUp::Small;
    log::debug!("Lost a life ({cause}), {} left", player.lives);

    if player.lives == 0 {
        state.status = GameStatus::GameOver;
        log::info!(
            "Game over ({cause}) at t={:.2}s, score {}",
            state.game_time,
            state.score
        );
    }
}
