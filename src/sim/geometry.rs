//! Maze geometry catalog
//!
//! Turns the object layers of a tilemap into typed, world-space regions.
//! Everything here is pure data transformation: rectangles in source pixels
//! come in, rectangles in world units come out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_INDEX_EPSILON;
use crate::error::ConfigError;

/// Layer names understood by the core
pub mod layers {
    pub const STARTPOS: &str = "startpos";
    pub const WALL_OBJECTS: &str = "wall_objects";
    pub const GOOD_OBJECTS: &str = "good_objects";
    pub const BAD_OBJECTS: &str = "bad_objects";
    pub const GOAL_OBJECT: &str = "goal_object";
    pub const GOAL_BLOCKING_OBJECT: &str = "goal_blocking_object";
    pub const GOAL: &str = "goal";
    pub const GOAL_GROUND: &str = "goal_ground";
    pub const GOOD_TILES: &str = "good_tiles";
    pub const BAD_TILES: &str = "bad_tiles";

    /// Presentation layers made visible when the goal unlocks
    pub const REVEALED_ON_UNLOCK: [&str; 2] = [GOAL, GOAL_GROUND];
}

/// Axis-aligned rectangle, `(x, y)` is the minimum corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Multiply every component by `scale`
    pub fn scaled(&self, scale: f32) -> Self {
        Self::new(
            self.x * scale,
            self.y * scale,
            self.width * scale,
            self.height * scale,
        )
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// What a region means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    Wall,
    GoodObject,
    BadObject,
    Goal,
    GoalBlocker,
    SpawnPoint,
}

impl RegionKind {
    /// Source object layer this kind is read from
    pub fn layer(&self) -> &'static str {
        match self {
            RegionKind::Wall => layers::WALL_OBJECTS,
            RegionKind::GoodObject => layers::GOOD_OBJECTS,
            RegionKind::BadObject => layers::BAD_OBJECTS,
            RegionKind::Goal => layers::GOAL_OBJECT,
            RegionKind::GoalBlocker => layers::GOAL_BLOCKING_OBJECT,
            RegionKind::SpawnPoint => layers::STARTPOS,
        }
    }
}

/// A tagged world-space rectangle. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Stable id in load order
    pub id: u32,
    pub kind: RegionKind,
    pub rect: Rect,
}

/// Integer tile coordinate inside a tile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    pub x: i32,
    pub y: i32,
}

/// Invert the load-time scaling to find the tile under a world position
pub fn tile_index(world: Vec2, scale: f32, tile_size: Vec2) -> TileIndex {
    let tiles = world / scale / tile_size;
    // Truncate; the epsilon keeps exact multiples from landing one tile short
    TileIndex {
        x: (tiles.x + TILE_INDEX_EPSILON) as i32,
        y: (tiles.y + TILE_INDEX_EPSILON) as i32,
    }
}

// ============================================================================
// Maze data (Tiled JSON map shape)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerType {
    #[default]
    #[serde(rename = "objectgroup")]
    ObjectGroup,
    #[serde(rename = "tilelayer")]
    TileLayer,
    #[serde(other)]
    Other,
}

/// A rectangle object in source pixel units
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

impl MapObject {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MazeLayer {
    pub name: String,
    #[serde(rename = "type", default)]
    pub layer_type: LayerType,
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

/// Parsed tilemap, as far as the core cares about it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeData {
    #[serde(rename = "tilewidth", default = "default_tile_size")]
    pub tile_width: f32,
    #[serde(rename = "tileheight", default = "default_tile_size")]
    pub tile_height: f32,
    #[serde(default)]
    pub layers: Vec<MazeLayer>,
}

fn default_tile_size() -> f32 {
    32.0
}

impl Default for MazeData {
    fn default() -> Self {
        Self {
            tile_width: default_tile_size(),
            tile_height: default_tile_size(),
            layers: Vec::new(),
        }
    }
}

impl MazeData {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// First object layer with the given name
    pub fn object_layer(&self, name: &str) -> Option<&MazeLayer> {
        self.layers
            .iter()
            .find(|l| l.name == name && l.layer_type == LayerType::ObjectGroup)
    }

    /// Append an object layer (builder for tests and tools)
    pub fn with_objects(mut self, name: &str, rects: &[Rect]) -> Self {
        self.layers.push(MazeLayer {
            name: name.to_string(),
            layer_type: LayerType::ObjectGroup,
            objects: rects
                .iter()
                .map(|r| MapObject {
                    name: String::new(),
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                })
                .collect(),
        });
        self
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// All regions of one maze, in world units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCatalog {
    pub walls: Vec<Region>,
    pub good_objects: Vec<Region>,
    pub bad_objects: Vec<Region>,
    pub goal: Region,
    pub goal_blocker: Option<Region>,
    pub spawn_point: Region,
    /// Source tile size in pixels
    pub tile_size: Vec2,
    /// Pixels to world units
    pub scale: f32,
}

impl RegionCatalog {
    /// Spawn position of the actor (centre of the spawn object)
    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_point.rect.center()
    }

    /// Tile under a region's minimum corner
    pub fn tile_index(&self, region: &Region) -> TileIndex {
        tile_index(region.rect.min(), self.scale, self.tile_size)
    }
}

struct RegionLoader<'a> {
    maze: &'a MazeData,
    scale: f32,
    next_id: u32,
}

impl RegionLoader<'_> {
    fn load(&mut self, kind: RegionKind) -> Result<Option<Vec<Region>>, ConfigError> {
        let layer_name = kind.layer();
        let Some(layer) = self.maze.object_layer(layer_name) else {
            return Ok(None);
        };

        let mut regions = Vec::with_capacity(layer.objects.len());
        for (index, object) in layer.objects.iter().enumerate() {
            let rect = object.rect();
            if !rect.is_well_formed() {
                return Err(ConfigError::InvalidRegion {
                    layer: layer_name.to_string(),
                    index,
                    reason: "dimensions must be finite and non-negative",
                });
            }
            regions.push(Region {
                id: self.next_id,
                kind,
                rect: rect.scaled(self.scale),
            });
            self.next_id += 1;
        }
        Ok(Some(regions))
    }

    fn optional(&mut self, kind: RegionKind) -> Result<Vec<Region>, ConfigError> {
        Ok(self.load(kind)?.unwrap_or_default())
    }

    fn required_first(&mut self, kind: RegionKind) -> Result<Region, ConfigError> {
        let layer = kind.layer().to_string();
        let regions = self
            .load(kind)?
            .ok_or_else(|| ConfigError::MissingLayer {
                layer: layer.clone(),
            })?;
        regions
            .into_iter()
            .next()
            .ok_or(ConfigError::MissingObject { layer })
    }
}

/// Build the region catalog for a maze
///
/// `startpos` and `goal_object` are required; every other object layer may be
/// absent.
pub fn load_regions(maze: &MazeData, scale: f32) -> Result<RegionCatalog, ConfigError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::InvalidScale(scale));
    }
    if !(maze.tile_width > 0.0 && maze.tile_height > 0.0) {
        return Err(ConfigError::InvalidSetting {
            field: "tilewidth/tileheight",
            reason: "tile size must be positive",
        });
    }

    let mut loader = RegionLoader {
        maze,
        scale,
        next_id: 1,
    };

    let spawn_point = loader.required_first(RegionKind::SpawnPoint)?;
    let goal = loader.required_first(RegionKind::Goal)?;
    let goal_blocker = loader
        .optional(RegionKind::GoalBlocker)?
        .into_iter()
        .next();
    let walls = loader.optional(RegionKind::Wall)?;
    let good_objects = loader.optional(RegionKind::GoodObject)?;
    let bad_objects = loader.optional(RegionKind::BadObject)?;

    log::info!(
        "Loaded maze: {} walls, {} good, {} bad, blocker={}",
        walls.len(),
        good_objects.len(),
        bad_objects.len(),
        goal_blocker.is_some()
    );

    Ok(RegionCatalog {
        walls,
        good_objects,
        bad_objects,
        goal,
        goal_blocker,
        spawn_point,
        tile_size: Vec2::new(maze.tile_width, maze.tile_height),
        scale,
    })
}
