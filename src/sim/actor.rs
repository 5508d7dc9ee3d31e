//! Actor controller
//!
//! Maps raw input to the player's velocity and keeps the render-facing actor
//! state (heading, animation phase, status).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_of;
use crate::settings::InputMode;

/// Directional buttons held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    pub fn right() -> Self {
        Self {
            right: true,
            ..Default::default()
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Default::default()
        }
    }

    pub fn up() -> Self {
        Self {
            up: true,
            ..Default::default()
        }
    }

    pub fn down() -> Self {
        Self {
            down: true,
            ..Default::default()
        }
    }
}

/// Status effects on the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorStatus {
    #[default]
    Normal,
    /// Touched a bad object; does not change movement
    Debuffed,
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Heading in radians; kept while the actor stands still
    pub rotation: f32,
    /// Rolling animation accumulator
    pub anim_phase: f32,
    pub status: ActorStatus,
    /// Bad objects touched so far
    pub debuff_count: u32,
    pub input_mode: InputMode,
    paused: bool,
}

impl Actor {
    pub fn new(spawn: Vec2, radius: f32, input_mode: InputMode) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            radius,
            rotation: 0.0,
            anim_phase: 0.0,
            status: ActorStatus::Normal,
            debuff_count: 0,
            input_mode,
            paused: false,
        }
    }

    /// Velocity for this frame from the input matching the actor's input mode.
    ///
    /// Also advances the animation phase and heading when the result is non-zero.
    pub fn compute_velocity(&mut self, keys: DirectionKeys, tilt: Vec2, dt: f32) -> Vec2 {
        let vel = if self.paused {
            Vec2::ZERO
        } else {
            match self.input_mode {
                InputMode::Keyboard => keys_velocity(keys, dt),
                InputMode::Accelerometer => tilt_velocity(tilt, dt),
            }
        };

        if let Some(heading) = heading_of(vel) {
            self.anim_phase += dt * vel.x.abs().max(vel.y.abs());
            self.rotation = heading;
        }
        self.vel = vel;
        vel
    }

    pub fn apply_debuff(&mut self) {
        self.status = ActorStatus::Debuffed;
        self.debuff_count += 1;
    }

    /// While paused, `compute_velocity` yields zero and animation is frozen
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.vel = Vec2::ZERO;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Axis-aligned movement; opposite keys on one axis cancel
pub fn keys_velocity(keys: DirectionKeys, dt: f32) -> Vec2 {
    let step = PLAYER_SPEED * dt;
    let x = if keys.left && keys.right {
        0.0
    } else if keys.right {
        step
    } else if keys.left {
        -step
    } else {
        0.0
    };
    let y = if keys.up && keys.down {
        0.0
    } else if keys.up {
        step
    } else if keys.down {
        -step
    } else {
        0.0
    };
    Vec2::new(x, y)
}

/// Tilt movement with a dead zone. The vertical reading is inverted so
/// tilting the top of the device away moves the actor up the screen.
pub fn tilt_velocity(tilt: Vec2, dt: f32) -> Vec2 {
    let gated = |v: f32| if v.abs() > TILT_DEAD_ZONE { v } else { 0.0 };
    let x = gated(tilt.x) * TILT_GAIN * dt;
    let y = -gated(tilt.y) * TILT_GAIN * dt;
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn keyboard_actor() -> Actor {
        Actor::new(Vec2::ZERO, 0.35, InputMode::Keyboard)
    }

    #[test]
    fn test_keys_scale_by_speed_and_delta() {
        let vel = keys_velocity(DirectionKeys::right(), 0.5);
        assert_eq!(vel, Vec2::new(75.0, 0.0));
        let vel = keys_velocity(DirectionKeys::down(), 0.5);
        assert_eq!(vel, Vec2::new(0.0, -75.0));
    }

    #[test]
    fn test_opposing_keys_cancel_per_axis() {
        let keys = DirectionKeys {
            left: true,
            right: true,
            up: true,
            down: false,
        };
        let vel = keys_velocity(keys, 1.0);
        assert_eq!(vel, Vec2::new(0.0, PLAYER_SPEED));
    }

    #[test]
    fn test_tilt_dead_zone() {
        assert_eq!(tilt_velocity(Vec2::new(0.19, -0.2), 1.0), Vec2::ZERO);
        let vel = tilt_velocity(Vec2::new(0.5, 0.0), 1.0);
        assert!((vel.x - 12.5).abs() < 1e-5);
    }

    #[test]
    fn test_tilt_vertical_sign_flip() {
        let vel = tilt_velocity(Vec2::new(0.0, -0.8), 0.1);
        assert!((vel.y - 2.0).abs() < 1e-5);
        let vel = tilt_velocity(Vec2::new(0.0, 0.8), 0.1);
        assert!((vel.y + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_input_mode_selects_source() {
        let mut actor = Actor::new(Vec2::ZERO, 0.35, InputMode::Accelerometer);
        let vel = actor.compute_velocity(DirectionKeys::right(), Vec2::ZERO, DT);
        assert_eq!(vel, Vec2::ZERO);
        let vel = actor.compute_velocity(DirectionKeys::default(), Vec2::new(1.0, 0.0), DT);
        assert!(vel.x > 0.0);
    }

    #[test]
    fn test_paused_freezes_velocity_and_animation() {
        let mut actor = keyboard_actor();
        actor.compute_velocity(DirectionKeys::up(), Vec2::ZERO, DT);
        let phase = actor.anim_phase;
        let rotation = actor.rotation;

        actor.set_paused(true);
        for _ in 0..10 {
            let vel = actor.compute_velocity(DirectionKeys::right(), Vec2::ZERO, DT);
            assert_eq!(vel, Vec2::ZERO);
        }
        assert_eq!(actor.anim_phase, phase);
        assert_eq!(actor.rotation, rotation);

        actor.set_paused(false);
        assert_ne!(
            actor.compute_velocity(DirectionKeys::right(), Vec2::ZERO, DT),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_animation_and_heading() {
        let mut actor = keyboard_actor();
        let vel = actor.compute_velocity(DirectionKeys::up(), Vec2::ZERO, DT);
        assert!((actor.anim_phase - DT * vel.y).abs() < 1e-6);
        assert!((actor.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        // Standing still keeps the last heading and phase
        let phase = actor.anim_phase;
        actor.compute_velocity(DirectionKeys::default(), Vec2::ZERO, DT);
        assert_eq!(actor.anim_phase, phase);
        assert!((actor.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_debuff_is_status_only() {
        let mut actor = keyboard_actor();
        let before = actor.compute_velocity(DirectionKeys::left(), Vec2::ZERO, DT);
        actor.apply_debuff();
        let after = actor.compute_velocity(DirectionKeys::left(), Vec2::ZERO, DT);
        assert_eq!(actor.status, ActorStatus::Debuffed);
        assert_eq!(actor.debuff_count, 1);
        assert_eq!(before, after);
    }
}
