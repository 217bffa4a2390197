//! Level loader: compiles a level document into a fresh `GameState`
//!
//! Pure function of its input. The level is validated first so a malformed
//! document never yields a half-built state.

use glam::Vec2;

use super::format::*;
use crate::consts::*;
use crate::error::GameResult;
use crate::sim::collision::Aabb;
use crate::sim::state::{Collectible, Enemy, FlagPole, GameState, Platform, PlatformKind};
use crate::tuning::Tuning;

/// Compile `level` with the default tuning
pub fn parse(level: &Level) -> GameResult<GameState> {
    parse_with(level, Tuning::default())
}

/// Compile `level`, embedding `tuning` in the resulting state
pub fn parse_with(level: &Level, tuning: Tuning) -> GameResult<GameState> {
    level.validate()?;
    tuning.validate()?;

    let tile_size = level.dimensions.tile_size as f32;
    let to_pixels = |x: u32, y: u32| Vec2::new(x as f32 * tile_size, y as f32 * tile_size);

    let spawn = to_pixels(level.start_position.x, level.start_position.y);
    let mut state = GameState::new(
        level.id.clone(),
        level.pixel_width() as f32,
        level.pixel_height() as f32,
        spawn,
    );
    state.tuning = tuning;

    for (col, row, tile) in level.cells() {
        let origin = to_pixels(col, row);
        match tile.kind {
            TileKind::Ground => state.platforms.push(terrain(tile, PlatformKind::Ground, origin, tile_size)),
            TileKind::Brick => state.platforms.push(terrain(tile, PlatformKind::Brick, origin, tile_size)),
            TileKind::Cloud => state.platforms.push(terrain(tile, PlatformKind::Cloud, origin, tile_size)),
            TileKind::Pipe => state.platforms.push(terrain(tile, PlatformKind::Pipe, origin, tile_size)),
            TileKind::Coin => {
                let size = tile_size / 2.0;
                state.collectibles.push(Collectible {
                    id: format!("coin-{row}-{col}"),
                    kind: CollectibleKind::Coin,
                    pos: origin + Vec2::splat(tile_size / 4.0),
                    size: Vec2::splat(size),
                    value: COIN_VALUE,
                    collected: false,
                });
            }
            TileKind::EnemySpawn => match tile.enemy_type() {
                Some(kind) => state
                    .enemies
                    .push(Enemy::spawn(format!("enemy-{row}-{col}"), kind, origin)),
                None => log::warn!("Enemy spawn at ({col}, {row}) has no enemy type, skipping"),
            },
            // Markers only: the top-level start/flag fields are authoritative
            TileKind::Air | TileKind::FlagPole | TileKind::PlayerSpawn => {}
        }
    }

    for placement in &level.objects.enemies {
        state.enemies.push(Enemy::spawn(
            placement.id.clone(),
            placement.kind,
            to_pixels(placement.x, placement.y),
        ));
    }

    for placement in &level.objects.collectibles {
        let side = match placement.kind {
            CollectibleKind::Mushroom => MUSHROOM_SIZE,
            CollectibleKind::Coin | CollectibleKind::FireFlower | CollectibleKind::Star => {
                SMALL_COLLECTIBLE_SIZE
            }
        };
        state.collectibles.push(Collectible {
            id: placement.id.clone(),
            kind: placement.kind,
            pos: to_pixels(placement.x, placement.y),
            size: Vec2::splat(side),
            value: placement.value,
            collected: false,
        });
    }

    state.flag_pole = level.flag_pole.map(|flag| FlagPole::at(to_pixels(flag.x, flag.y)));

    log::info!(
        "Loaded level '{}' ({}x{} tiles): {} platforms, {} enemies, {} collectibles, flag={}",
        level.name,
        level.dimensions.width,
        level.dimensions.height,
        state.platforms.len(),
        state.enemies.len(),
        state.collectibles.len(),
        state.flag_pole.is_some(),
    );

    Ok(state)
}

/// Build the platform for a terrain tile
fn terrain(tile: &Tile, kind: PlatformKind, origin: Vec2, tile_size: f32) -> Platform {
    let props = tile.properties.unwrap_or_default();
    let height = match kind {
        PlatformKind::Pipe => props
            .pipe_height
            .filter(|h| *h > 0)
            .map_or(tile_size, |h| h as f32 * tile_size),
        PlatformKind::Ground | PlatformKind::Brick | PlatformKind::Cloud => tile_size,
    };
    let breakable = match kind {
        PlatformKind::Brick => props.breakable.unwrap_or(true),
        PlatformKind::Ground | PlatformKind::Cloud | PlatformKind::Pipe => false,
    };
    Platform::new(Aabb::new(origin.x, origin.y, tile_size, height), kind, breakable)
}
