//! Tilt Maze headless runner
//!
//! Loads a maze (the bundled demo unless a path is given), drives the
//! simulation with scripted keyboard input at 60 fps and routes the finish
//! event through the scene machine.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;

    use tilt_maze::sim::{DirectionKeys, GameEvent, LevelSession, MazeData, TickInput, tick};
    use tilt_maze::{ConfigError, Scene, SceneEvent, SessionConfig};

    const DEMO_MAZE: &str = include_str!("../assets/mazes/demo.json");
    const DEMO_LEVEL: u32 = 1;
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after two simulated minutes
    const MAX_FRAMES: u32 = 60 * 120;
    /// Frames at which the script toggles pause
    const PAUSE_AT: u32 = 30;
    const RESUME_AT: u32 = 45;

    fn load_maze(path: Option<&str>) -> Result<MazeData, String> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("failed to read {path}: {e}"))?;
                MazeData::from_json(&json).map_err(|e: ConfigError| format!("{path}: {e}"))
            }
            None => MazeData::from_json(DEMO_MAZE).map_err(|e| format!("demo maze: {e}")),
        }
    }

    fn scripted_input(frame: u32) -> TickInput {
        if frame == PAUSE_AT || frame == RESUME_AT {
            TickInput::pause_toggle()
        } else {
            TickInput::keys(DirectionKeys::right())
        }
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let path = std::env::args().nth(1);
        let maze = match load_maze(path.as_deref()) {
            Ok(maze) => maze,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        };

        let mut session = match LevelSession::new(DEMO_LEVEL, &maze, SessionConfig::default()) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Level {DEMO_LEVEL} failed to load: {e}");
                return ExitCode::FAILURE;
            }
        };

        let mut scene = Scene::default()
            .transition(SceneEvent::OpenMap)
            .transition(SceneEvent::StartLevel(DEMO_LEVEL));

        let mut now_ms = 0.0_f64;
        for frame in 0..MAX_FRAMES {
            now_ms += f64::from(FRAME_DT) * 1000.0;
            let events = tick(&mut session, &scripted_input(frame), FRAME_DT, now_ms);
            for event in &events {
                match event {
                    GameEvent::ElapsedTimeChanged { .. } => log::trace!("{:?}", event),
                    GameEvent::SoundRequested { .. } | GameEvent::TileClearRequested { .. } => {
                        log::debug!("{:?}", event)
                    }
                    _ => log::info!("{:?}", event),
                }
                if let Some(request) = SceneEvent::from_game_event(event) {
                    scene = scene.transition(request);
                }
            }
            if session.is_finished() {
                break;
            }
        }

        match scene {
            Scene::Completion {
                level_id,
                elapsed_seconds,
            } => {
                println!("Level {level_id} complete in {elapsed_seconds:.2}s");
                ExitCode::SUCCESS
            }
            other => {
                log::warn!(
                    "Stopped after {MAX_FRAMES} frames in {:?} with {} object(s) left",
                    other,
                    session.remaining_good_objects()
                );
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web front end drives the library directly
}
