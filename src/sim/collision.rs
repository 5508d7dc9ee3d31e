//! Collision detection between the circular actor and rectangular regions
//!
//! Two flavours: a cheap boolean overlap test used for trigger regions, and a
//! contact query with normal and penetration used by the physics solver.

use glam::Vec2;

use super::geometry::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle (if hit)
    pub point: Vec2,
    /// Surface normal pointing from the rectangle toward the circle centre
    pub normal: Vec2,
    /// Penetration depth (negative when separated but within the query margin)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Closest-point overlap test between a circle and a rectangle
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.clamp_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Contact query between a circle and a rectangle
///
/// Reports a hit when the circle is within `margin` of touching. Handles the
/// deep case where the centre is inside the rectangle by pushing out along
/// the axis of least penetration.
pub fn circle_rect_contact(center: Vec2, radius: f32, rect: &Rect, margin: f32) -> CollisionResult {
    let closest = rect.clamp_point(center);
    let delta = center - closest;
    let dist_sq = delta.length_squared();
    let reach = radius + margin;

    if dist_sq > reach * reach {
        return CollisionResult::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Centre inside the rectangle
    let min = rect.min();
    let max = rect.max();
    let faces = [
        (center.x - min.x, Vec2::NEG_X),
        (max.x - center.x, Vec2::X),
        (center.y - min.y, Vec2::NEG_Y),
        (max.y - center.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .fold(faces[0], |best, face| if face.0 < best.0 { face } else { best });

    CollisionResult {
        hit: true,
        point: center + normal * depth,
        normal,
        penetration: radius + depth,
    }
}
