//! Level state and session ownership
//!
//! A `LevelSession` owns everything mutable about one attempt at a level:
//! the actor, its physics world, the remaining objectives and the clock.

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::geometry::{MazeData, Region, RegionCatalog, TileIndex, layers, load_regions};
use super::physics::{BodyHandle, PhysicsWorld};
use crate::error::ConfigError;
use crate::settings::SessionConfig;

/// Where a level is in its lifecycle (pause is tracked separately)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Objectives are live and the clock runs
    Playing,
    /// The goal was touched this frame
    GoalReached,
    /// Waiting out the completion delay
    Completing,
    /// Terminal; session resources have been released
    Finished,
}

/// Externally visible state, with pause folded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelState {
    Playing,
    Paused,
    GoalReached,
    Completing,
    Finished,
}

/// Tile layers the core asks the presentation to clear cells from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileLayer {
    GoodTiles,
    BadTiles,
}

impl TileLayer {
    pub fn name(&self) -> &'static str {
        match self {
            TileLayer::GoodTiles => layers::GOOD_TILES,
            TileLayer::BadTiles => layers::BAD_TILES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundKind {
    Good,
    Bad,
    WallHit,
    Victory,
}

/// Side effects for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TileClearRequested { layer: TileLayer, tile: TileIndex },
    SoundRequested { kind: SoundKind },
    ObjectivesRemainingChanged { count: u32 },
    ElapsedTimeChanged { seconds: f32 },
    /// Last good object collected; the blocker is gone
    GoalUnlocked,
    LayerRevealed { layer: String },
    DebuffApplied,
    GoalReached { elapsed_seconds: f32 },
    LevelFinished { level_id: u32, elapsed_seconds: f32 },
}

/// Good and bad objects not yet touched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectiveSet {
    pub good: Vec<Region>,
    pub bad: Vec<Region>,
}

impl ObjectiveSet {
    pub fn remaining_good(&self) -> u32 {
        self.good.len() as u32
    }

    pub fn remaining_bad(&self) -> u32 {
        self.bad.len() as u32
    }
}

/// One running level
#[derive(Debug, Clone)]
pub struct LevelSession {
    pub(crate) level_id: u32,
    pub(crate) config: SessionConfig,
    pub(crate) catalog: RegionCatalog,
    pub(crate) physics: PhysicsWorld,
    pub(crate) actor: Actor,
    pub(crate) actor_body: BodyHandle,
    pub(crate) wall_bodies: Vec<BodyHandle>,
    pub(crate) goal_blocker_body: Option<BodyHandle>,
    /// Set once the last good object is gone, blocker or not
    pub(crate) goal_unlocked: bool,
    pub(crate) objectives: ObjectiveSet,
    pub(crate) elapsed_secs: f32,
    pub(crate) phase: LevelPhase,
    pub(crate) paused: bool,
    pub(crate) goal_reached_at_ms: Option<f64>,
    /// Events raised outside `tick`, returned by the next one
    pub(crate) pending_events: Vec<GameEvent>,
}

impl LevelSession {
    /// Load a level from maze data. Nothing is built if the data is unusable.
    pub fn new(level_id: u32, maze: &MazeData, config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = load_regions(maze, config.scale)?;
        Self::from_catalog(level_id, catalog, config)
    }

    /// Build a level from an already-loaded catalog
    pub fn from_catalog(
        level_id: u32,
        catalog: RegionCatalog,
        config: SessionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut physics = PhysicsWorld::new();
        let spawn = catalog.spawn_position();
        let settings = config.actor;
        let actor_body = physics.create_actor_body(
            spawn,
            settings.radius,
            settings.density,
            settings.friction,
            settings.restitution,
        );
        let wall_bodies: Vec<BodyHandle> = catalog
            .walls
            .iter()
            .map(|wall| physics.create_static_body(wall.rect))
            .collect();

        let objectives = ObjectiveSet {
            good: catalog.good_objects.clone(),
            bad: catalog.bad_objects.clone(),
        };

        let goal_blocker_body = match catalog.goal_blocker {
            Some(blocker) if objectives.remaining_good() > 0 => {
                Some(physics.create_static_body(blocker.rect))
            }
            _ => None,
        };

        let mut pending_events = vec![GameEvent::ObjectivesRemainingChanged {
            count: objectives.remaining_good(),
        }];
        let goal_unlocked = objectives.remaining_good() == 0;
        if goal_unlocked {
            pending_events.push(GameEvent::GoalUnlocked);
            pending_events.extend(reveal_events());
        }

        log::info!(
            "Level {} started: {} good, {} bad, spawn at {}",
            level_id,
            objectives.remaining_good(),
            objectives.remaining_bad(),
            spawn
        );

        Ok(Self {
            level_id,
            actor: Actor::new(spawn, settings.radius, config.input_mode),
            config,
            catalog,
            physics,
            actor_body,
            wall_bodies,
            goal_blocker_body,
            goal_unlocked,
            objectives,
            elapsed_secs: 0.0,
            phase: LevelPhase::Playing,
            paused: false,
            goal_reached_at_ms: None,
            pending_events,
        })
    }

    pub fn level_id(&self) -> u32 {
        self.level_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Static bodies created for the maze walls
    pub fn wall_bodies(&self) -> &[BodyHandle] {
        &self.wall_bodies
    }

    pub fn objectives(&self) -> &ObjectiveSet {
        &self.objectives
    }

    pub fn goal(&self) -> &Region {
        &self.catalog.goal
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn state(&self) -> LevelState {
        match self.phase {
            LevelPhase::Finished => LevelState::Finished,
            _ if self.paused => LevelState::Paused,
            LevelPhase::Playing => LevelState::Playing,
            LevelPhase::GoalReached => LevelState::GoalReached,
            LevelPhase::Completing => LevelState::Completing,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.phase == LevelPhase::Finished
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached_at_ms.is_some()
    }

    /// Wall-clock timestamp (ms) at which the goal was reached
    pub fn goal_reached_at_ms(&self) -> Option<f64> {
        self.goal_reached_at_ms
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn remaining_good_objects(&self) -> u32 {
        self.objectives.remaining_good()
    }

    pub fn goal_unlocked(&self) -> bool {
        self.goal_unlocked
    }

    pub fn goal_blocker_present(&self) -> bool {
        self.goal_blocker_body
            .is_some_and(|handle| self.physics.contains(handle))
    }

    pub fn pause(&mut self) {
        if self.phase == LevelPhase::Finished {
            log::warn!("Ignoring pause on finished level {}", self.level_id);
            return;
        }
        if !self.paused {
            log::debug!("Level {} paused", self.level_id);
        }
        self.paused = true;
        self.actor.set_paused(true);
        self.physics.set_velocity(self.actor_body, glam::Vec2::ZERO);
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::debug!("Level {} resumed", self.level_id);
        }
        self.paused = false;
        self.actor.set_paused(false);
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Open the goal and remove its blocker, if the maze has one.
    /// Only the first call has any effect.
    pub(crate) fn unlock_goal(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.goal_unlocked {
            return false;
        }
        self.goal_unlocked = true;
        if let Some(handle) = self.goal_blocker_body.take() {
            self.physics.destroy_body(handle);
        }
        log::info!("Level {}: goal unlocked", self.level_id);
        events.push(GameEvent::GoalUnlocked);
        events.extend(reveal_events());
        true
    }

    /// Enter the terminal state and release every body, once
    pub(crate) fn finish(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase == LevelPhase::Finished {
            return;
        }
        self.phase = LevelPhase::Finished;
        self.paused = false;
        self.physics.clear();
        self.wall_bodies.clear();
        self.goal_blocker_body = None;
        log::info!(
            "Level {} finished in {:.2}s",
            self.level_id,
            self.elapsed_secs
        );
        events.push(GameEvent::LevelFinished {
            level_id: self.level_id,
            elapsed_seconds: self.elapsed_secs,
        });
    }
}

fn reveal_events() -> impl Iterator<Item = GameEvent> {
    layers::REVEALED_ON_UNLOCK
        .iter()
        .map(|layer| GameEvent::LayerRevealed {
            layer: layer.to_string(),
        })
}
