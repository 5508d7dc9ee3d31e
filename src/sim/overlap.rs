//! Per-frame overlap resolution
//!
//! Tests the actor's circle against the remaining objectives and the goal.
//! Each kind is scanned in full before anything is removed, so several
//! regions touched in the same frame are all consumed in that frame and none
//! is seen twice.

use glam::Vec2;

use super::collision::circle_rect_overlap;
use super::geometry::{Region, RegionCatalog, TileIndex};
use super::state::{GameEvent, LevelPhase, LevelSession, SoundKind, TileLayer};
use crate::consts::BAD_OBJECT_PENALTY_SECS;

/// What one overlap pass consumed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapReport {
    pub good_consumed: u32,
    pub bad_consumed: u32,
    pub goal_unlocked: bool,
    pub goal_reached: bool,
}

/// Remove every region the circle overlaps, returning the tile each one covered
fn consume_overlapping(
    regions: &mut Vec<Region>,
    center: Vec2,
    radius: f32,
    catalog: &RegionCatalog,
) -> Vec<TileIndex> {
    let hit_ids: Vec<u32> = regions
        .iter()
        .filter(|r| circle_rect_overlap(center, radius, &r.rect))
        .map(|r| r.id)
        .collect();
    if hit_ids.is_empty() {
        return Vec::new();
    }

    let tiles = regions
        .iter()
        .filter(|r| hit_ids.contains(&r.id))
        .map(|r| catalog.tile_index(r))
        .collect();
    regions.retain(|r| !hit_ids.contains(&r.id));
    tiles
}

/// Run the good, bad and goal checks for this frame and apply their effects
pub fn resolve_overlaps(
    session: &mut LevelSession,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) -> OverlapReport {
    let mut report = OverlapReport::default();
    let center = session.actor.pos;
    let radius = session.actor.radius;

    // Good objects
    let tiles = consume_overlapping(
        &mut session.objectives.good,
        center,
        radius,
        &session.catalog,
    );
    for tile in &tiles {
        events.push(GameEvent::TileClearRequested {
            layer: TileLayer::GoodTiles,
            tile: *tile,
        });
        events.push(GameEvent::SoundRequested {
            kind: SoundKind::Good,
        });
    }
    if !tiles.is_empty() {
        report.good_consumed = tiles.len() as u32;
        let remaining = session.objectives.remaining_good();
        log::debug!(
            "Collected {} good object(s), {} left",
            tiles.len(),
            remaining
        );
        events.push(GameEvent::ObjectivesRemainingChanged { count: remaining });
        if remaining == 0 {
            report.goal_unlocked = session.unlock_goal(events);
        }
    }

    // Bad objects
    let tiles = consume_overlapping(
        &mut session.objectives.bad,
        center,
        radius,
        &session.catalog,
    );
    for tile in &tiles {
        events.push(GameEvent::TileClearRequested {
            layer: TileLayer::BadTiles,
            tile: *tile,
        });
        session.actor.apply_debuff();
        events.push(GameEvent::DebuffApplied);
        events.push(GameEvent::SoundRequested {
            kind: SoundKind::Bad,
        });
        session.elapsed_secs += BAD_OBJECT_PENALTY_SECS;
    }
    if !tiles.is_empty() {
        report.bad_consumed = tiles.len() as u32;
        log::debug!(
            "Touched {} bad object(s), clock now {:.2}s",
            tiles.len(),
            session.elapsed_secs
        );
    }

    // Goal, only once every good object is gone
    if session.objectives.remaining_good() == 0
        && session.goal_reached_at_ms.is_none()
        && circle_rect_overlap(center, radius, &session.catalog.goal.rect)
    {
        session.goal_reached_at_ms = Some(now_ms);
        session.phase = LevelPhase::GoalReached;
        report.goal_reached = true;
        log::info!(
            "Level {}: goal reached at {:.2}s",
            session.level_id,
            session.elapsed_secs
        );
        events.push(GameEvent::SoundRequested {
            kind: SoundKind::Victory,
        });
        events.push(GameEvent::GoalReached {
            elapsed_seconds: session.elapsed_secs,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SessionConfig;
    use crate::sim::geometry::{Rect, RegionKind};

    fn region(id: u32, kind: RegionKind, rect: Rect) -> Region {
        Region { id, kind, rect }
    }

    /// Scale 1, one-unit tiles, actor spawning at (2, 2)
    fn catalog(good: Vec<Rect>, bad: Vec<Rect>, goal: Rect) -> RegionCatalog {
        let mut id = 10;
        let mut tag = |kind, rects: Vec<Rect>| -> Vec<Region> {
            rects
                .into_iter()
                .map(|r| {
                    id += 1;
                    region(id, kind, r)
                })
                .collect()
        };
        RegionCatalog {
            walls: Vec::new(),
            good_objects: tag(RegionKind::GoodObject, good),
            bad_objects: tag(RegionKind::BadObject, bad),
            goal: region(1, RegionKind::Goal, goal),
            goal_blocker: Some(region(2, RegionKind::GoalBlocker, Rect::new(8.0, 8.0, 1.0, 1.0))),
            spawn_point: region(3, RegionKind::SpawnPoint, Rect::new(2.0, 2.0, 0.0, 0.0)),
            tile_size: Vec2::ONE,
            scale: 1.0,
        }
    }

    fn session(catalog: RegionCatalog) -> LevelSession {
        let mut config = SessionConfig::default();
        config.scale = 1.0;
        config.actor.radius = 0.3;
        LevelSession::from_catalog(1, catalog, config).unwrap()
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_good_object_consumed_once() {
        let mut s = session(catalog(
            vec![Rect::new(2.0, 2.0, 0.5, 0.5), Rect::new(6.0, 6.0, 1.0, 1.0)],
            vec![],
            Rect::new(9.0, 9.0, 1.0, 1.0),
        ));
        let mut events = Vec::new();
        let report = resolve_overlaps(&mut s, 0.0, &mut events);
        assert_eq!(report.good_consumed, 1);
        assert!(!report.goal_unlocked);
        assert_eq!(s.remaining_good_objects(), 1);
        assert!(events.contains(&GameEvent::TileClearRequested {
            layer: TileLayer::GoodTiles,
            tile: TileIndex { x: 2, y: 2 },
        }));
        assert!(events.contains(&GameEvent::ObjectivesRemainingChanged { count: 1 }));

        // Still overlapping, but the region is gone
        let mut events = Vec::new();
        let report = resolve_overlaps(&mut s, 16.0, &mut events);
        assert_eq!(report, OverlapReport::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_last_good_unlocks_and_goal_checked_same_frame() {
        let mut s = session(catalog(
            vec![Rect::new(2.0, 2.0, 0.5, 0.5)],
            vec![],
            Rect::new(2.0, 2.0, 1.0, 1.0),
        ));
        let mut events = Vec::new();
        let report = resolve_overlaps(&mut s, 500.0, &mut events);
        assert!(report.goal_unlocked);
        assert!(report.goal_reached);
        assert!(!s.goal_blocker_present());
        assert_eq!(s.goal_reached_at_ms(), Some(500.0));
        assert_eq!(s.phase(), LevelPhase::GoalReached);
        assert_eq!(count(&events, |e| *e == GameEvent::GoalUnlocked), 1);
        assert_eq!(
            count(&events, |e| matches!(
                e,
                GameEvent::SoundRequested {
                    kind: SoundKind::Victory
                }
            )),
            1
        );

        // Goal can only be reached once
        let mut events = Vec::new();
        assert!(!resolve_overlaps(&mut s, 600.0, &mut events).goal_reached);
        assert_eq!(s.goal_reached_at_ms(), Some(500.0));
    }

    #[test]
    fn test_goal_gated_on_remaining_objects() {
        let mut s = session(catalog(
            vec![Rect::new(6.0, 6.0, 1.0, 1.0), Rect::new(7.0, 7.0, 1.0, 1.0)],
            vec![],
            Rect::new(1.5, 1.5, 1.0, 1.0),
        ));
        let mut events = Vec::new();
        let report = resolve_overlaps(&mut s, 0.0, &mut events);
        assert!(!report.goal_reached);
        assert!(s.goal_blocker_present());
        assert!(events.is_empty());
    }

    #[test]
    fn test_simultaneous_bad_objects_penalise_each_once() {
        let mut s = session(catalog(
            vec![Rect::new(6.0, 6.0, 1.0, 1.0)],
            vec![
                Rect::new(1.0, 1.9, 1.0, 0.2),
                Rect::new(2.1, 1.9, 1.0, 0.2),
                Rect::new(7.0, 7.0, 1.0, 1.0),
            ],
            Rect::new(9.0, 9.0, 1.0, 1.0),
        ));
        let mut events = Vec::new();
        let report = resolve_overlaps(&mut s, 0.0, &mut events);
        assert_eq!(report.bad_consumed, 2);
        assert_eq!(s.elapsed_secs(), 2.0 * BAD_OBJECT_PENALTY_SECS);
        assert_eq!(s.actor().debuff_count, 2);
        assert_eq!(count(&events, |e| *e == GameEvent::DebuffApplied), 2);
        assert_eq!(
            count(&events, |e| matches!(
                e,
                GameEvent::TileClearRequested {
                    layer: TileLayer::BadTiles,
                    ..
                }
            )),
            2
        );
        assert_eq!(s.objectives().remaining_bad(), 1);

        // No double-triggering on the next frame
        let mut events = Vec::new();
        resolve_overlaps(&mut s, 16.0, &mut events);
        assert_eq!(s.elapsed_secs(), 2.0 * BAD_OBJECT_PENALTY_SECS);
        assert_eq!(s.actor().debuff_count, 2);
    }

    #[test]
    fn test_bad_objects_do_not_count_toward_goal() {
        let mut s = session(catalog(
            vec![],
            vec![Rect::new(2.0, 2.0, 0.5, 0.5)],
            Rect::new(9.0, 9.0, 1.0, 1.0),
        ));
        let mut events = Vec::new();
        let report = resolve_overlaps(&mut s, 0.0, &mut events);
        assert_eq!(report.good_consumed, 0);
        assert!(!report.goal_unlocked);
        assert!(!events.contains(&GameEvent::GoalUnlocked));
    }
}
