//! Tilt Maze - gameplay core for a top-down maze game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, physics, actor, overlaps, level state)
//! - `settings`: Per-session configuration passed into the core
//! - `scene`: Screen routing driven by events the core emits
//! - `error`: Load-time configuration errors

pub mod error;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use scene::{Scene, SceneEvent};
pub use settings::{ActorSettings, InputMode, SessionConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Physics sub-step (61 Hz)
    pub const SUB_STEP: f32 = 1.0 / 61.0;
    /// Frame deltas are clamped to this range before feeding the accumulator
    pub const MIN_FRAME_DELTA: f32 = 1.0 / 61.0;
    pub const MAX_FRAME_DELTA: f32 = 0.25;

    /// Solver iterations per sub-step
    pub const VELOCITY_ITERATIONS: u32 = 6;
    pub const POSITION_ITERATIONS: u32 = 2;

    /// Contact tolerance (world units)
    pub const LINEAR_SLOP: f32 = 0.005;
    /// Fraction of penetration resolved per position iteration
    pub const BAUMGARTE: f32 = 0.2;
    pub const MAX_LINEAR_CORRECTION: f32 = 0.2;
    /// Approach speed below which contacts are treated as inelastic
    pub const RESTITUTION_THRESHOLD: f32 = 1.0;

    /// Keyboard/pointer movement speed (world units per second, scaled by frame delta)
    pub const PLAYER_SPEED: f32 = 150.0;
    /// Accelerometer gain
    pub const TILT_GAIN: f32 = 25.0;
    /// Tilt readings within ±TILT_DEAD_ZONE are ignored
    pub const TILT_DEAD_ZONE: f32 = 0.2;

    /// Seconds added to the level clock for each bad object touched
    pub const BAD_OBJECT_PENALTY_SECS: f32 = 10.0;
    /// Wall-clock delay between reaching the goal and leaving the level
    pub const COMPLETION_DELAY_MS: f64 = 1000.0;

    /// Nudge applied when converting world positions back to tile indices
    pub const TILE_INDEX_EPSILON: f32 = 1e-3;
}

/// Heading angle (radians) of a velocity vector, or `None` when it is zero
#[inline]
pub fn heading_of(vel: Vec2) -> Option<f32> {
    if vel == Vec2::ZERO {
        None
    } else {
        Some(vel.y.atan2(vel.x))
    }
}
