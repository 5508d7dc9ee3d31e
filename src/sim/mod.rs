//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame deltas feed a fixed sub-step accumulator
//! - Wall-clock time only enters through the `now_ms` argument of `tick`
//! - Stable iteration order (regions by load order, bodies by slot)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod collision;
pub mod geometry;
pub mod overlap;
pub mod physics;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorStatus, DirectionKeys};
pub use collision::{CollisionResult, circle_rect_contact, circle_rect_overlap};
pub use geometry::{
    MazeData, Rect, Region, RegionCatalog, RegionKind, TileIndex, layers, load_regions,
    tile_index,
};
pub use overlap::{OverlapReport, resolve_overlaps};
pub use physics::{BodyHandle, ContactEvent, PhysicsWorld, StepReport};
pub use state::{
    GameEvent, LevelPhase, LevelSession, LevelState, ObjectiveSet, SoundKind, TileLayer,
};
pub use tick::{TickInput, tick};
