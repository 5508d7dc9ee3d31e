//! Screen routing
//!
//! The simulation never switches screens itself; it reports `LevelFinished`
//! and the front end feeds that into `Scene::transition`.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Scene {
    #[default]
    MainMenu,
    /// Level selection map
    LevelMap,
    Options,
    Maze {
        level_id: u32,
    },
    /// Results screen shown after a level
    Completion {
        level_id: u32,
        elapsed_seconds: f32,
    },
}

/// Requests that move between screens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    StartLevel(u32),
    OpenMap,
    OpenOptions,
    /// Back / escape
    Back,
    LevelFinished { level_id: u32, elapsed_seconds: f32 },
    /// Dismiss the results screen
    Continue,
}

impl SceneEvent {
    /// Routing request carried by a simulation event, if any
    pub fn from_game_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LevelFinished {
                level_id,
                elapsed_seconds,
            } => Some(SceneEvent::LevelFinished {
                level_id: *level_id,
                elapsed_seconds: *elapsed_seconds,
            }),
            _ => None,
        }
    }
}

impl Scene {
    /// Next scene for an event. Events that make no sense here leave the scene as is.
    pub fn transition(self, event: SceneEvent) -> Scene {
        use Scene::*;
        use SceneEvent as E;

        let next = match (self, event) {
            (MainMenu, E::OpenMap) => LevelMap,
            (MainMenu, E::OpenOptions) => Options,
            (Options, E::Back) => MainMenu,
            (LevelMap, E::Back) => MainMenu,
            (LevelMap, E::StartLevel(level_id)) => Maze { level_id },
            (Maze { .. }, E::Back) => LevelMap,
            (
                Maze { level_id },
                E::LevelFinished {
                    level_id: finished,
                    elapsed_seconds,
                },
            ) if level_id == finished => Completion {
                level_id,
                elapsed_seconds,
            },
            (Completion { .. }, E::Continue) => LevelMap,
            (Completion { .. }, E::Back) => MainMenu,
            (scene, event) => {
                log::warn!("Ignoring {:?} in scene {:?}", event, scene);
                scene
            }
        };

        if next != self {
            log::info!("Scene {:?} -> {:?}", self, next);
        }
        next
    }

    pub fn level_id(&self) -> Option<u32> {
        match self {
            Scene::Maze { level_id } | Scene::Completion { level_id, .. } => Some(*level_id),
            _ => None,
        }
    }
}
