//! Level editor
//!
//! Holds one mutable `Level`, the active tool and a pan offset. Pointer input
//! arrives as viewport pixels; everything else is plain level mutation. Every
//! edit snapshots the previous level for undo.

use std::path::{Path, PathBuf};

use crate::error::GameResult;
use crate::level::{
    self, Difficulty, EnemyKind, Level, Theme, Tile, TileCoord, TileKind, TileProperties,
};
use crate::sim::GameState;

/// Pixels moved per pan step
pub const PAN_STEP: f32 = 64.0;

/// Undo history depth
const MAX_UNDO: usize = 100;

/// What a click paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Ground,
    Brick,
    Cloud,
    Pipe,
    Coin,
    Enemy(EnemyKind),
    PlayerSpawn,
    FlagPole,
    Eraser,
}

/// Pan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pan {
    Left,
    Right,
    Up,
    Down,
}

/// Result of a paint request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    Painted { col: u32, row: u32 },
    /// Pointer was outside the grid; nothing changed
    OutOfBounds,
}

#[derive(Debug, Clone)]
pub struct Editor {
    level: Level,
    tool: Tool,
    camera_x: f32,
    camera_y: f32,
    undo_stack: Vec<Level>,
    redo_stack: Vec<Level>,
    dirty: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(level::create_default())
    }
}

impl Editor {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            tool: Tool::default(),
            camera_x: 0.0,
            camera_y: 0.0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            dirty: false,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn camera(&self) -> (f32, f32) {
        (self.camera_x, self.camera_y)
    }

    /// Unsaved changes since the last export or import
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Paint the active tool at a viewport pixel position.
    ///
    /// The cell is `floor((pixel + camera) / tile_size)` on each axis.
    /// Positions outside the grid are a no-op.
    pub fn paint(&mut self, pixel_x: f32, pixel_y: f32) -> PaintOutcome {
        let Some((col, row)) = self.cell_at(pixel_x, pixel_y) else {
            return PaintOutcome::OutOfBounds;
        };

        let tile = match self.tool {
            Tool::Eraser => Tile::air(row, col),
            Tool::Ground => Tile::new(cell_id(row, col), TileKind::Ground),
            Tool::Brick => Tile::new(cell_id(row, col), TileKind::Brick).with_properties(
                TileProperties {
                    breakable: Some(true),
                    ..Default::default()
                },
            ),
            Tool::Cloud => Tile::new(cell_id(row, col), TileKind::Cloud),
            Tool::Pipe => Tile::new(cell_id(row, col), TileKind::Pipe),
            Tool::Coin => Tile::new(cell_id(row, col), TileKind::Coin),
            Tool::Enemy(kind) => Tile::new(cell_id(row, col), TileKind::EnemySpawn)
                .with_properties(TileProperties {
                    enemy_type: Some(kind),
                    ..Default::default()
                }),
            Tool::PlayerSpawn => Tile::new(cell_id(row, col), TileKind::PlayerSpawn),
            Tool::FlagPole => Tile::new(cell_id(row, col), TileKind::FlagPole),
        };

        let coord = TileCoord::new(col, row);
        let marker_unchanged = match self.tool {
            Tool::PlayerSpawn => self.level.start_position == coord,
            Tool::FlagPole => self.level.flag_pole == Some(coord),
            _ => true,
        };
        if marker_unchanged && self.level.tile(col, row) == Some(&tile) {
            return PaintOutcome::Painted { col, row };
        }

        self.save_undo();
        match self.tool {
            Tool::PlayerSpawn => self.level.start_position = coord,
            Tool::FlagPole => self.level.flag_pole = Some(coord),
            _ => {}
        }
        if let Some(cell) = self.level.tile_mut(col, row) {
            *cell = tile;
        }

        PaintOutcome::Painted { col, row }
    }

    /// Grid cell under a viewport pixel, if any
    pub fn cell_at(&self, pixel_x: f32, pixel_y: f32) -> Option<(u32, u32)> {
        let tile_size = self.level.dimensions.tile_size as f32;
        let col = ((pixel_x + self.camera_x) / tile_size).floor();
        let row = ((pixel_y + self.camera_y) / tile_size).floor();
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }
        let coord = TileCoord::new(col as u32, row as u32);
        self.level.in_grid(coord).then_some((coord.x, coord.y))
    }

    /// Move the view one step. Offsets never go negative.
    pub fn pan(&mut self, direction: Pan) {
        match direction {
            Pan::Left => self.camera_x = (self.camera_x - PAN_STEP).max(0.0),
            Pan::Right => self.camera_x += PAN_STEP,
            Pan::Up => self.camera_y = (self.camera_y - PAN_STEP).max(0.0),
            Pan::Down => self.camera_y += PAN_STEP,
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera_x = 0.0;
        self.camera_y = 0.0;
    }

    // === Metadata ===

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.save_undo();
        self.level.name = name.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.save_undo();
        self.level.metadata.author = author.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.save_undo();
        self.level.metadata.description = description.into();
    }

    /// Set difficulty (1-5). Out-of-range values leave the level untouched.
    pub fn set_difficulty(&mut self, difficulty: u8) -> GameResult<()> {
        let difficulty = Difficulty::new(difficulty)?;
        self.save_undo();
        self.level.metadata.difficulty = difficulty;
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.save_undo();
        self.level.metadata.theme = theme;
    }

    /// Time limit in seconds, `None` for untimed
    pub fn set_time_limit(&mut self, seconds: Option<u32>) {
        self.save_undo();
        self.level.metadata.time_limit = seconds;
    }

    // === Generators ===

    /// Reset to an empty level of the same dimensions
    pub fn clear(&mut self) {
        let dims = self.level.dimensions;
        self.save_undo();
        self.level = level::create_empty(dims.width, dims.height, dims.tile_size);
        log::info!("Cleared level to {}x{} air", dims.width, dims.height);
    }

    /// Replace the level with an empty one
    pub fn create_empty(&mut self, width: u32, height: u32, tile_size: u32) -> GameResult<()> {
        let level = level::create_empty(width, height, tile_size);
        level.validate()?;
        self.replace(level);
        Ok(())
    }

    /// Replace the level with the built-in first level
    pub fn create_default(&mut self) {
        self.replace(level::create_default());
    }

    // === Import / export ===

    /// Serialize the level as a pretty-printed JSON document
    pub fn export(&mut self) -> GameResult<String> {
        let json = self.level.to_json()?;
        self.dirty = false;
        Ok(json)
    }

    /// Replace the level with a parsed document.
    ///
    /// All-or-nothing: a document that fails to parse or validate leaves the
    /// current level untouched.
    pub fn import(&mut self, json: &str) -> GameResult<()> {
        let level = Level::from_json(json)?;
        log::info!("Imported level '{}' ({})", level.name, level.id);
        self.replace(level);
        self.dirty = false;
        Ok(())
    }

    /// Suggested file name: the display name with whitespace runs as `_`
    pub fn export_file_name(&self) -> String {
        let stem = self.level.name.split_whitespace().collect::<Vec<_>>().join("_");
        let stem = if stem.is_empty() { self.level.id.clone() } else { stem };
        format!("{stem}.json")
    }

    /// Write the level into `dir` under `export_file_name()`
    pub fn export_to_dir(&mut self, dir: impl AsRef<Path>) -> GameResult<PathBuf> {
        let path = dir.as_ref().join(self.export_file_name());
        let json = self.export()?;
        std::fs::write(&path, json)?;
        log::info!("Exported level '{}' to {}", self.level.name, path.display());
        Ok(path)
    }

    /// Read and import a level document from disk
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> GameResult<()> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        self.import(&json).inspect_err(|e| {
            log::warn!("Rejected level file {}: {e}", path.display());
        })
    }

    /// Compile the current level into a fresh run
    pub fn play_test(&self) -> GameResult<GameState> {
        level::parse(&self.level)
    }

    // === History ===

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Restore the level as it was before the last edit
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(std::mem::replace(&mut self.level, previous));
        self.dirty = true;
        true
    }

    /// Re-apply the last undone edit
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(std::mem::replace(&mut self.level, next));
        self.dirty = true;
        true
    }

    fn save_undo(&mut self) {
        self.undo_stack.push(self.level.clone());
        self.redo_stack.clear();
        self.dirty = true;

        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.remove(0);
        }
    }

    fn replace(&mut self, level: Level) {
        self.save_undo();
        self.level = level;
        self.reset_camera();
    }
}

fn cell_id(row: u32, col: u32) -> String {
    format!("tile-{row}-{col}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::level::create_empty;

    fn editor() -> Editor {
        Editor::new(create_empty(10, 8, 32))
    }

    #[test]
    fn test_paint_uses_camera_offset() {
        let mut ed = editor();
        assert_eq!(ed.paint(40.0, 70.0), PaintOutcome::Painted { col: 1, row: 2 });
        assert_eq!(ed.level().tile(1, 2).unwrap().kind, TileKind::Ground);

        ed.pan(Pan::Right);
        assert_eq!(ed.paint(0.0, 0.0), PaintOutcome::Painted { col: 2, row: 0 });
        assert_eq!(ed.level().tile(2, 0).unwrap().id, "tile-0-2");
    }

    #[test]
    fn test_paint_out_of_bounds_is_noop() {
        let mut ed = editor();
        let before = ed.level().clone();
        assert_eq!(ed.paint(-1.0, 5.0), PaintOutcome::OutOfBounds);
        assert_eq!(ed.paint(320.0, 5.0), PaintOutcome::OutOfBounds);
        assert_eq!(ed.paint(5.0, 256.0), PaintOutcome::OutOfBounds);
        assert_eq!(ed.paint(f32::NAN, 5.0), PaintOutcome::OutOfBounds);
        assert_eq!(ed.level(), &before);
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_brick_and_enemy_properties() {
        let mut ed = editor();
        ed.set_tool(Tool::Brick);
        ed.paint(0.0, 0.0);
        assert_eq!(
            ed.level().tile(0, 0).unwrap().properties.unwrap().breakable,
            Some(true)
        );

        ed.set_tool(Tool::Enemy(EnemyKind::Koopa));
        ed.paint(32.0, 0.0);
        let tile = ed.level().tile(1, 0).unwrap();
        assert_eq!(tile.kind, TileKind::EnemySpawn);
        assert_eq!(tile.enemy_type(), Some(EnemyKind::Koopa));
    }

    #[test]
    fn test_eraser_clears_properties() {
        let mut ed = editor();
        ed.set_tool(Tool::Brick);
        ed.paint(0.0, 0.0);
        ed.set_tool(Tool::Eraser);
        ed.paint(0.0, 0.0);
        let tile = ed.level().tile(0, 0).unwrap();
        assert_eq!(tile.kind, TileKind::Air);
        assert!(tile.properties.is_none());
    }

    #[test]
    fn test_markers_update_top_level_fields() {
        let mut ed = editor();
        ed.set_tool(Tool::PlayerSpawn);
        ed.paint(64.0, 96.0);
        assert_eq!(ed.level().start_position, TileCoord::new(2, 3));

        ed.set_tool(Tool::FlagPole);
        ed.paint(288.0, 32.0);
        ed.paint(256.0, 32.0);
        // Last write wins; the stray marker tile stays
        assert_eq!(ed.level().flag_pole, Some(TileCoord::new(8, 1)));
        assert_eq!(ed.level().count(TileKind::FlagPole), 2);
    }

    #[test]
    fn test_pan_never_negative() {
        let mut ed = editor();
        ed.pan(Pan::Left);
        ed.pan(Pan::Up);
        assert_eq!(ed.camera(), (0.0, 0.0));
        ed.pan(Pan::Down);
        ed.pan(Pan::Right);
        ed.pan(Pan::Right);
        assert_eq!(ed.camera(), (128.0, 64.0));
        ed.reset_camera();
        assert_eq!(ed.camera(), (0.0, 0.0));
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut ed = Editor::default();
        ed.set_tool(Tool::Coin);
        ed.paint(100.0, 100.0);
        ed.set_name("Round Trip");
        let json = ed.export().unwrap();
        assert!(!ed.is_dirty());

        let mut other = editor();
        other.import(&json).unwrap();
        assert_eq!(other.level(), ed.level());
    }

    #[test]
    fn test_bad_import_leaves_level() {
        let mut ed = editor();
        let before = ed.level().clone();
        assert!(matches!(ed.import("{ nope"), Err(GameError::LevelParse(_))));

        let mut broken = create_empty(4, 4, 32);
        broken.tiles[1].pop();
        let json = serde_json::to_string(&broken).unwrap();
        assert!(matches!(ed.import(&json), Err(GameError::MalformedLevel(_))));

        let huge = create_empty(2, 1, 3_000_000_000);
        let json = serde_json::to_string(&huge).unwrap();
        assert!(matches!(ed.import(&json), Err(GameError::MalformedLevel(_))));
        assert_eq!(ed.level(), &before);
        assert!(ed.play_test().is_ok());
    }

    #[test]
    fn test_difficulty_validated() {
        let mut ed = editor();
        assert!(ed.set_difficulty(4).is_ok());
        assert_eq!(ed.level().metadata.difficulty.get(), 4);
        assert!(matches!(ed.set_difficulty(0), Err(GameError::MalformedLevel(_))));
        assert!(ed.set_difficulty(6).is_err());
        assert_eq!(ed.level().metadata.difficulty.get(), 4);
    }

    #[test]
    fn test_export_file_name() {
        let mut ed = editor();
        ed.set_name("My  Cool\tLevel");
        assert_eq!(ed.export_file_name(), "My_Cool_Level.json");
        ed.set_name("   ");
        assert_eq!(ed.export_file_name(), "level-10x8.json");
    }

    #[test]
    fn test_file_export_and_import() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = Editor::default();
        let path = ed.export_to_dir(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "World_1-1.json");

        let mut other = editor();
        other.import_file(&path).unwrap();
        assert_eq!(other.level(), ed.level());

        assert!(matches!(
            other.import_file(dir.path().join("missing.json")),
            Err(GameError::Io(_))
        ));
    }

    #[test]
    fn test_clear_and_generators() {
        let mut ed = Editor::default();
        ed.clear();
        assert_eq!(ed.level().count(TileKind::Air), 62 * 13);

        assert!(ed.create_empty(0, 5, 32).is_err());
        assert_eq!(ed.level().dimensions.width, 62);
        ed.create_empty(5, 4, 16).unwrap();
        assert_eq!(ed.level().dimensions.tile_size, 16);

        ed.create_default();
        assert_eq!(ed.level(), &level::create_default());
    }

    #[test]
    fn test_undo_redo() {
        let mut ed = editor();
        let empty = ed.level().clone();
        ed.paint(0.0, 0.0);
        let painted = ed.level().clone();

        assert!(ed.undo());
        assert_eq!(ed.level(), &empty);
        assert!(ed.redo());
        assert_eq!(ed.level(), &painted);
        assert!(!ed.redo());

        ed.undo();
        ed.set_tool(Tool::Cloud);
        ed.paint(32.0, 0.0);
        assert!(!ed.can_redo());
    }

    #[test]
    fn test_repaint_same_tile_keeps_history() {
        let mut ed = editor();
        ed.set_tool(Tool::Brick);
        for _ in 0..3 {
            assert_eq!(ed.paint(40.0, 40.0), PaintOutcome::Painted { col: 1, row: 1 });
        }
        ed.set_tool(Tool::FlagPole);
        ed.paint(64.0, 0.0);
        ed.paint(64.0, 0.0);
        // Erasing an empty cell changes nothing either
        ed.set_tool(Tool::Eraser);
        ed.paint(200.0, 200.0);

        assert!(ed.undo());
        assert_eq!(ed.level().flag_pole, None);
        assert!(ed.undo());
        assert_eq!(ed.level().count(TileKind::Brick), 0);
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_play_test_compiles_level() {
        let mut ed = editor();
        ed.set_tool(Tool::Ground);
        for x in 0..10 {
            ed.paint(x as f32 * 32.0, 7.0 * 32.0);
        }
        let state = ed.play_test().unwrap();
        assert_eq!(state.platforms.len(), 10);
        assert_eq!(state.level_id, ed.level().id);
    }
}
