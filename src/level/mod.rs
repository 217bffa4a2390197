//! Level data: the document format, generators, the loader that compiles a
//! level into a runtime state, and world progression rules.

pub mod format;
pub mod generators;
pub mod loader;
pub mod world;

pub use format::{
    CollectibleKind, CollectiblePlacement, Difficulty, Dimensions, EnemyKind, EnemyPlacement,
    LEVEL_FORMAT_VERSION, Level, LevelObjects, Metadata, Spawner, SpawnerKind, Theme, Tile,
    TileCoord, TileKind, TileProperties,
};
pub use generators::{create_default, create_empty};
pub use loader::{parse, parse_with};
pub use world::{UnlockRequirement, World};
