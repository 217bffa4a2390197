//! Deterministic level generators
//!
//! Used as editor defaults and as test fixtures, so they must produce the
//! same level on every call.

use super::format::*;

/// An all-air level with the start position near the bottom-left.
pub fn create_empty(width: u32, height: u32, tile_size: u32) -> Level {
    let tiles = (0..height)
        .map(|row| (0..width).map(|col| Tile::air(row, col)).collect())
        .collect();

    Level {
        id: format!("level-{width}x{height}"),
        name: "New Level".to_string(),
        version: LEVEL_FORMAT_VERSION.to_string(),
        dimensions: Dimensions {
            width,
            height,
            tile_size,
        },
        tiles,
        flag_pole: None,
        start_position: TileCoord::new(1.min(width.saturating_sub(1)), height.saturating_sub(3)),
        metadata: Metadata {
            author: "Player".to_string(),
            description: "A custom level".to_string(),
            difficulty: Difficulty::default(),
            theme: Theme::Overworld,
            time_limit: None,
        },
        objects: LevelObjects::default(),
    }
}

/// The classic first level: a ground lane, brick and cloud platforms, two
/// pipes, three coins, three enemies, a mushroom and a flag.
pub fn create_default() -> Level {
    const WIDTH: u32 = 62;
    const HEIGHT: u32 = 13;
    const TILE_SIZE: u32 = 32;
    const GROUND_ROW: usize = 11;

    let mut tiles: Vec<Vec<Tile>> = (0..HEIGHT)
        .map(|row| (0..WIDTH).map(|col| Tile::air(row, col)).collect())
        .collect();

    for (col, tile) in tiles[GROUND_ROW].iter_mut().enumerate() {
        *tile = Tile::new(format!("ground-{col}"), TileKind::Ground);
    }

    let breakable = TileProperties {
        breakable: Some(true),
        ..Default::default()
    };
    for (row, cols) in [(9, 6..10), (7, 12..16)] {
        for col in cols {
            tiles[row][col] =
                Tile::new(format!("brick-{col}"), TileKind::Brick).with_properties(breakable);
        }
    }
    for (row, cols) in [(6, 18..22), (4, 25..29)] {
        for col in cols {
            tiles[row][col] = Tile::new(format!("cloud-{col}"), TileKind::Cloud);
        }
    }

    // Two-wide pipes standing on the ground row
    for (rows, left) in [(7..GROUND_ROW, 31), (6..GROUND_ROW, 37)] {
        for row in rows {
            for col in [left, left + 1] {
                tiles[row][col] = Tile::new(format!("pipe-{col}-{row}"), TileKind::Pipe);
            }
        }
    }

    for (i, (row, col)) in [(8, 7), (6, 13), (5, 19)].into_iter().enumerate() {
        tiles[row][col] = Tile::new(format!("coin-{}", i + 1), TileKind::Coin);
    }

    let spawns = [
        ("goomba-1", 9, EnemyKind::Goomba),
        ("goomba-2", 15, EnemyKind::Goomba),
        ("koopa-1", 22, EnemyKind::Koopa),
    ];
    for (id, col, kind) in spawns {
        tiles[GROUND_ROW - 1][col] = Tile::new(id, TileKind::EnemySpawn).with_properties(TileProperties {
            enemy_type: Some(kind),
            ..Default::default()
        });
    }

    Level {
        id: "default-level-1".to_string(),
        name: "World 1-1".to_string(),
        version: LEVEL_FORMAT_VERSION.to_string(),
        dimensions: Dimensions {
            width: WIDTH,
            height: HEIGHT,
            tile_size: TILE_SIZE,
        },
        tiles,
        flag_pole: Some(TileCoord::new(58, 3)),
        start_position: TileCoord::new(1, 9),
        metadata: Metadata {
            author: "System".to_string(),
            description: "The classic first level".to_string(),
            difficulty: Difficulty::default(),
            theme: Theme::Overworld,
            time_limit: None,
        },
        objects: LevelObjects {
            collectibles: vec![CollectiblePlacement {
                id: "mushroom-1".to_string(),
                kind: CollectibleKind::Mushroom,
                value: 1000,
                x: 26,
                y: 3,
                properties: None,
            }],
            ..Default::default()
        },
    }
}
