//! Level document schema
//!
//! This is the authoring/storage unit shared by the editor and the loader.
//! Field names follow the JSON document format (camelCase, kebab-case tile
//! types) so exported files stay readable by other tools.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GameError, GameResult};

/// Current document version written by the generators and editor
pub const LEVEL_FORMAT_VERSION: &str = "1.0.0";

/// Largest pixel extent a level may span; every pixel coordinate up to it is
/// exact in `f32`
pub const MAX_PIXEL_EXTENT: u32 = 1 << 24;

/// Grid size in tiles plus the pixel size of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
}

/// A tile-grid coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// What a grid cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileKind {
    #[default]
    Air,
    Ground,
    Brick,
    Cloud,
    Pipe,
    Coin,
    EnemySpawn,
    FlagPole,
    PlayerSpawn,
}

/// Enemy sub-types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Goomba,
    Koopa,
    Piranha,
}

/// Collectible sub-types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleKind {
    Coin,
    Mushroom,
    FireFlower,
    Star,
}

/// Optional per-tile settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_type: Option<EnemyKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collectible_type: Option<CollectibleKind>,
    /// Pipe height in tiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipe_height: Option<u32>,
}

/// One cell of the authoring grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<TileProperties>,
}

impl Tile {
    pub fn new(id: impl Into<String>, kind: TileKind) -> Self {
        Self {
            id: id.into(),
            kind,
            properties: None,
        }
    }

    /// Empty cell with the conventional grid id
    pub fn air(row: u32, col: u32) -> Self {
        Self::new(format!("tile-{row}-{col}"), TileKind::Air)
    }

    pub fn with_properties(mut self, properties: TileProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn enemy_type(&self) -> Option<EnemyKind> {
        self.properties.and_then(|p| p.enemy_type)
    }
}

/// Visual theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Castle,
    #[default]
    Overworld,
    Underground,
    Underwater,
}

/// Difficulty rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> GameResult<Self> {
        Self::try_from(value).map_err(GameError::MalformedLevel)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "difficulty must be within {}..={}, got {value}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

/// Authoring metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub author: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub theme: Theme,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

/// An enemy placed off-grid (tile coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    pub x: u32,
    pub y: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// A collectible placed off-grid (tile coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectiblePlacement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CollectibleKind,
    pub value: u32,
    pub x: u32,
    pub y: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// What a spawner produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnerKind {
    Enemy,
    Item,
    Player,
}

/// A spawner marker. Stored and round-tripped, not instantiated by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SpawnerKind,
    pub x: u32,
    pub y: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// Entities placed independently of the grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelObjects {
    pub enemies: Vec<EnemyPlacement>,
    pub collectibles: Vec<CollectiblePlacement>,
    pub spawners: Vec<Spawner>,
}

/// A complete level document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    pub name: String,
    pub version: String,
    pub dimensions: Dimensions,
    /// Row-major grid: `tiles[row][col]`
    pub tiles: Vec<Vec<Tile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_pole: Option<TileCoord>,
    pub start_position: TileCoord,
    pub metadata: Metadata,
    #[serde(default)]
    pub objects: LevelObjects,
}

impl Level {
    /// Check the structural invariants the loader relies on.
    ///
    /// Never repairs anything: a ragged or mis-sized grid is an error, not
    /// something to pad or truncate.
    pub fn validate(&self) -> GameResult<()> {
        let Dimensions {
            width,
            height,
            tile_size,
        } = self.dimensions;

        if width == 0 || height == 0 || tile_size == 0 {
            return Err(GameError::MalformedLevel(format!(
                "dimensions must be positive, got {width}x{height} tiles of {tile_size}px"
            )));
        }
        for (axis, tiles) in [("width", width), ("height", height)] {
            let extent = tiles
                .checked_mul(tile_size)
                .filter(|px| *px <= MAX_PIXEL_EXTENT);
            if extent.is_none() {
                return Err(GameError::MalformedLevel(format!(
                    "{axis} of {tiles} tiles at {tile_size}px exceeds {MAX_PIXEL_EXTENT}px"
                )));
            }
        }
        if self.tiles.len() != height as usize {
            return Err(GameError::MalformedLevel(format!(
                "grid has {} rows, dimensions say {height}",
                self.tiles.len()
            )));
        }
        if let Some((row, cells)) = self
            .tiles
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width as usize)
        {
            return Err(GameError::MalformedLevel(format!(
                "row {row} has {} tiles, dimensions say {width}",
                cells.len()
            )));
        }
        if let Some((col, row, _)) = self
            .cells()
            .find(|(_, _, tile)| tile.kind == TileKind::Air && tile.properties.is_some())
        {
            return Err(GameError::MalformedLevel(format!(
                "air tile at ({col}, {row}) carries properties"
            )));
        }
        if !self.in_grid(self.start_position) {
            return Err(GameError::MalformedLevel(format!(
                "start position ({}, {}) is outside the grid",
                self.start_position.x, self.start_position.y
            )));
        }
        if let Some(flag) = self.flag_pole.filter(|f| !self.in_grid(*f)) {
            return Err(GameError::MalformedLevel(format!(
                "flag pole ({}, {}) is outside the grid",
                flag.x, flag.y
            )));
        }
        Ok(())
    }

    /// Whether a coordinate addresses a cell of this level's grid
    pub fn in_grid(&self, coord: TileCoord) -> bool {
        coord.x < self.dimensions.width && coord.y < self.dimensions.height
    }

    pub fn tile(&self, col: u32, row: u32) -> Option<&Tile> {
        self.tiles.get(row as usize)?.get(col as usize)
    }

    pub fn tile_mut(&mut self, col: u32, row: u32) -> Option<&mut Tile> {
        self.tiles.get_mut(row as usize)?.get_mut(col as usize)
    }

    pub fn pixel_width(&self) -> u32 {
        self.dimensions.width.saturating_mul(self.dimensions.tile_size)
    }

    pub fn pixel_height(&self) -> u32 {
        self.dimensions.height.saturating_mul(self.dimensions.tile_size)
    }

    /// Iterate `(col, row, tile)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &Tile)> {
        self.tiles.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, tile)| (col as u32, row as u32, tile))
        })
    }

    /// Count cells of a kind
    pub fn count(&self, kind: TileKind) -> usize {
        self.cells().filter(|(_, _, t)| t.kind == kind).count()
    }

    /// Serialize to the pretty-printed document format
    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and validate a document. Fails without side effects.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::generators::{create_default, create_empty};

    #[test]
    fn test_tile_json_shape() {
        let tile = Tile::new("e", TileKind::EnemySpawn).with_properties(TileProperties {
            enemy_type: Some(EnemyKind::Koopa),
            ..Default::default()
        });
        let json = serde_json::to_value(&tile).unwrap();
        assert_eq!(json["type"], "enemy-spawn");
        assert_eq!(json["properties"]["enemyType"], "koopa");
        assert!(json["properties"].get("breakable").is_none());

        let air = serde_json::to_value(Tile::air(2, 3)).unwrap();
        assert_eq!(air["id"], "tile-2-3");
        assert!(air.get("properties").is_none());
    }

    #[test]
    fn test_difficulty_range() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(6).is_err());
        assert_eq!(Difficulty::new(5).unwrap().get(), 5);
        assert!(serde_json::from_str::<Difficulty>("3").is_ok());
        assert!(serde_json::from_str::<Difficulty>("9").is_err());
    }

    #[test]
    fn test_validate_rejects_ragged_grid() {
        let mut level = create_empty(10, 5, 32);
        level.tiles[2].pop();
        let err = level.validate().unwrap_err();
        assert!(matches!(err, GameError::MalformedLevel(msg) if msg.contains("row 2")));
    }

    #[test]
    fn test_validate_rejects_row_count_mismatch() {
        let mut level = create_empty(10, 5, 32);
        level.tiles.pop();
        assert!(matches!(level.validate(), Err(GameError::MalformedLevel(_))));
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let mut level = create_empty(10, 5, 32);
        level.dimensions.tile_size = 0;
        assert!(matches!(level.validate(), Err(GameError::MalformedLevel(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_extent() {
        let level = create_empty(2, 1, 3_000_000_000);
        assert!(matches!(level.validate(), Err(GameError::MalformedLevel(_))));

        let json = level.to_json().unwrap();
        assert!(matches!(
            Level::from_json(&json),
            Err(GameError::MalformedLevel(msg)) if msg.contains("width")
        ));

        // Largest extent that still fits is accepted
        let level = create_empty(1, 1, MAX_PIXEL_EXTENT);
        assert!(level.validate().is_ok());
        assert_eq!(level.pixel_width(), MAX_PIXEL_EXTENT);
        assert!(create_empty(2, 1, MAX_PIXEL_EXTENT).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_air_with_properties() {
        let mut level = create_empty(4, 3, 32);
        level.tiles[1][2].properties = Some(TileProperties {
            breakable: Some(true),
            ..Default::default()
        });
        let err = level.validate().unwrap_err();
        assert!(matches!(err, GameError::MalformedLevel(msg) if msg.contains("(2, 1)")));
    }

    #[test]
    fn test_validate_rejects_start_outside_grid() {
        let mut level = create_empty(10, 5, 32);
        level.start_position = TileCoord::new(10, 0);
        assert!(matches!(level.validate(), Err(GameError::MalformedLevel(_))));
    }

    #[test]
    fn test_json_round_trip_default_level() {
        let level = create_default();
        let json = level.to_json().unwrap();
        assert_eq!(Level::from_json(&json).unwrap(), level);
    }

    #[test]
    fn test_unknown_tile_type_is_parse_error() {
        let level = create_empty(2, 2, 16);
        let json = level.to_json().unwrap().replacen("\"air\"", "\"lava\"", 1);
        assert!(matches!(Level::from_json(&json), Err(GameError::LevelParse(_))));
    }

    #[test]
    fn test_cells_row_major() {
        let level = create_empty(3, 2, 16);
        let coords: Vec<_> = level.cells().map(|(c, r, _)| (c, r)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }
}
