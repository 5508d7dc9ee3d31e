//! Per-frame simulation tick
//!
//! Order within a frame: pause handling, completion countdown, movement,
//! physics sub-steps, clock, overlap resolution. Everything the frame wants
//! the outside world to do comes back as a list of events.

use glam::Vec2;

use super::actor::DirectionKeys;
use super::overlap::resolve_overlaps;
use super::physics::ContactEvent;
use super::state::{GameEvent, LevelPhase, LevelSession, SoundKind};
use crate::consts::COMPLETION_DELAY_MS;

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional buttons (keyboard input mode)
    pub keys: DirectionKeys,
    /// Raw accelerometer reading (accelerometer input mode)
    pub tilt: Vec2,
    /// Pause button pressed this frame (edge, not level)
    pub pause_toggled: bool,
}

impl TickInput {
    pub fn keys(keys: DirectionKeys) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    pub fn tilt(tilt: Vec2) -> Self {
        Self {
            tilt,
            ..Default::default()
        }
    }

    pub fn pause_toggle() -> Self {
        Self {
            pause_toggled: true,
            ..Default::default()
        }
    }
}

/// Advance the level by one rendered frame
///
/// `dt` is the frame delta in seconds, `now_ms` the caller's wall clock. The
/// completion delay is measured against `now_ms`, so it keeps running while
/// the level is paused.
pub fn tick(session: &mut LevelSession, input: &TickInput, dt: f32, now_ms: f64) -> Vec<GameEvent> {
    let mut events = std::mem::take(&mut session.pending_events);

    if session.phase == LevelPhase::Finished {
        return finalize(session, events);
    }

    if input.pause_toggled {
        session.toggle_pause();
    }

    if let Some(reached_at) = session.goal_reached_at_ms {
        if now_ms - reached_at >= COMPLETION_DELAY_MS {
            session.finish(&mut events);
            return finalize(session, events);
        }
        if session.phase == LevelPhase::GoalReached {
            session.phase = LevelPhase::Completing;
        }
    }

    if session.paused {
        return finalize(session, events);
    }

    let elapsed_before = session.elapsed_secs;

    // Movement
    let vel = session.actor.compute_velocity(input.keys, input.tilt, dt);
    session.physics.set_velocity(session.actor_body, vel);

    // Physics
    let report = session.physics.step(dt);
    for contact in &report.contacts {
        if let ContactEvent::Began { dynamic, .. } = contact {
            if *dynamic == session.actor_body {
                events.push(GameEvent::SoundRequested {
                    kind: SoundKind::WallHit,
                });
            }
        }
    }
    if let Some(pos) = session.physics.position(session.actor_body) {
        session.actor.pos = pos;
    }

    // Clock and objectives stop once the goal is reached
    if session.phase == LevelPhase::Playing {
        session.elapsed_secs += dt;
        resolve_overlaps(session, now_ms, &mut events);
    }

    if session.elapsed_secs != elapsed_before {
        events.push(GameEvent::ElapsedTimeChanged {
            seconds: session.elapsed_secs,
        });
    }

    finalize(session, events)
}

fn finalize(session: &LevelSession, mut events: Vec<GameEvent>) -> Vec<GameEvent> {
    if !session.config.sound_enabled {
        events.retain(|e| !matches!(e, GameEvent::SoundRequested { .. }));
    }
    events
}
