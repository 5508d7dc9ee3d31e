//! Physics world: one dynamic circle against static rectangles
//!
//! Zero gravity, top-down. Movement is driven by assigning velocities directly;
//! walls push back only through contact resolution. Frame deltas feed a fixed
//! sub-step accumulator, and each sub-step runs a small sequential-impulse
//! solver (friction + non-penetration with restitution), integrates positions,
//! then applies Baumgarte position correction.
//!
//! Contact begin/end events are collected into the step report instead of
//! being delivered through callbacks.
//!
//! Only circle-vs-static-box contacts are handled: no dynamic-dynamic pairs,
//! no rotation and no shapes other than the actor's circle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circle_rect_contact;
use super::geometry::Rect;
use crate::consts::*;

/// Surface friction of walls (the usual Box2D fixture default)
pub const WALL_FRICTION: f32 = 0.2;

/// Handle to a body. Stale after the body is destroyed, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

/// Circle body moved by the solver
#[derive(Debug, Clone)]
pub struct DynamicBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
}

/// Immovable rectangle (walls, goal blocker)
#[derive(Debug, Clone)]
pub struct StaticBody {
    pub rect: Rect,
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Debug, Clone)]
pub enum Body {
    Dynamic(DynamicBody),
    Static(StaticBody),
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Contact state change between a dynamic body and a static body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    Began {
        dynamic: BodyHandle,
        other: BodyHandle,
    },
    Ended {
        dynamic: BodyHandle,
        other: BodyHandle,
    },
}

/// What one call to [`PhysicsWorld::step`] did
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Sub-steps advanced
    pub substeps: u32,
    /// Contact events in the order they occurred
    pub contacts: Vec<ContactEvent>,
}

/// Solver scratch for one dynamic/static pair
#[derive(Debug, Clone)]
struct Contact {
    dynamic: usize,
    other: usize,
    normal: Vec2,
    friction: f32,
    velocity_bias: f32,
    normal_impulse: f32,
    tangent_impulse: f32,
}

/// Owns every body of a level
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    slots: Vec<Slot>,
    free: Vec<u32>,
    accumulator: f32,
    /// Pairs touching at the end of the last sub-step, in discovery order
    touching: Vec<(BodyHandle, BodyHandle)>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, body: Body) -> BodyHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return BodyHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            body: Some(body),
        });
        BodyHandle {
            index,
            generation: 0,
        }
    }

    fn slot(&self, handle: BodyHandle) -> Option<&Body> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.body.as_ref())
    }

    fn dynamic_mut(&mut self, handle: BodyHandle) -> Option<&mut DynamicBody> {
        match self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.body.as_mut())
        {
            Some(Body::Dynamic(body)) => Some(body),
            _ => None,
        }
    }

    fn handle_at(&self, index: usize) -> BodyHandle {
        BodyHandle {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    /// Create the moving circle
    pub fn create_actor_body(
        &mut self,
        spawn: Vec2,
        radius: f32,
        density: f32,
        friction: f32,
        restitution: f32,
    ) -> BodyHandle {
        let area = std::f32::consts::PI * radius * radius;
        // A massless dynamic body still needs a mass to be solvable
        let mass = if density > 0.0 { density * area } else { 1.0 };
        self.insert(Body::Dynamic(DynamicBody {
            pos: spawn,
            vel: Vec2::ZERO,
            radius,
            mass,
            friction,
            restitution,
        }))
    }

    /// Create an immovable rectangle. Has no mass and takes part in collision only.
    pub fn create_static_body(&mut self, rect: Rect) -> BodyHandle {
        self.insert(Body::Static(StaticBody {
            rect,
            friction: WALL_FRICTION,
            restitution: 0.0,
        }))
    }

    /// Remove a body. Returns false (and does nothing) if the handle is stale.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        let Some(slot) = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation && s.body.is_some())
        else {
            log::trace!("destroy_body on stale handle {:?}", handle);
            return false;
        };
        slot.body = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.touching.retain(|&(d, o)| d != handle && o != handle);
        true
    }

    /// Remove every body
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            let handle = self.handle_at(index);
            self.destroy_body(handle);
        }
        self.accumulator = 0.0;
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.slot(handle).is_some()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.slot(handle)
    }

    pub fn body_count(&self) -> usize {
        self.slots.iter().filter(|s| s.body.is_some()).count()
    }

    /// Assign a dynamic body's velocity. No-op for static or stale handles.
    pub fn set_velocity(&mut self, handle: BodyHandle, vel: Vec2) -> bool {
        match self.dynamic_mut(handle) {
            Some(body) => {
                body.vel = vel;
                true
            }
            None => false,
        }
    }

    pub fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        match self.slot(handle)? {
            Body::Dynamic(b) => Some(b.pos),
            Body::Static(s) => Some(s.rect.center()),
        }
    }

    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        match self.slot(handle)? {
            Body::Dynamic(b) => Some(b.vel),
            Body::Static(_) => Some(Vec2::ZERO),
        }
    }

    pub fn mass(&self, handle: BodyHandle) -> Option<f32> {
        match self.slot(handle)? {
            Body::Dynamic(b) => Some(b.mass),
            Body::Static(_) => Some(0.0),
        }
    }

    /// Time banked toward the next sub-step
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Advance by a frame delta using fixed sub-steps
    pub fn step(&mut self, delta: f32) -> StepReport {
        let mut report = StepReport::default();
        self.accumulator += delta.clamp(MIN_FRAME_DELTA, MAX_FRAME_DELTA);

        while self.accumulator >= SUB_STEP {
            self.sub_step(SUB_STEP, &mut report.contacts);
            self.accumulator -= SUB_STEP;
            report.substeps += 1;
        }

        log::trace!(
            "physics: {} substeps, {:.4}s banked",
            report.substeps,
            self.accumulator
        );
        report
    }

    fn sub_step(&mut self, dt: f32, events: &mut Vec<ContactEvent>) {
        let mut contacts = self.find_contacts();
        self.update_touching(&contacts, events);

        for _ in 0..VELOCITY_ITERATIONS {
            for contact in &mut contacts {
                if let Some(Body::Dynamic(body)) = self.slots[contact.dynamic].body.as_mut() {
                    solve_velocity(body, contact);
                }
            }
        }

        for slot in &mut self.slots {
            if let Some(Body::Dynamic(body)) = slot.body.as_mut() {
                body.pos += body.vel * dt;
            }
        }

        for _ in 0..POSITION_ITERATIONS {
            for contact in &contacts {
                let rect = match self.slots[contact.other].body.as_ref() {
                    Some(Body::Static(s)) => s.rect,
                    _ => continue,
                };
                if let Some(Body::Dynamic(body)) = self.slots[contact.dynamic].body.as_mut() {
                    solve_position(body, &rect);
                }
            }
        }
    }

    fn find_contacts(&self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for (di, dslot) in self.slots.iter().enumerate() {
            let Some(Body::Dynamic(body)) = dslot.body.as_ref() else {
                continue;
            };
            for (si, sslot) in self.slots.iter().enumerate() {
                let Some(Body::Static(wall)) = sslot.body.as_ref() else {
                    continue;
                };
                let result = circle_rect_contact(body.pos, body.radius, &wall.rect, LINEAR_SLOP);
                if !result.hit {
                    continue;
                }

                let restitution = body.restitution.max(wall.restitution);
                let approach = body.vel.dot(result.normal);
                let velocity_bias = if -approach > RESTITUTION_THRESHOLD {
                    -restitution * approach
                } else {
                    0.0
                };

                contacts.push(Contact {
                    dynamic: di,
                    other: si,
                    normal: result.normal,
                    friction: (body.friction * wall.friction).sqrt(),
                    velocity_bias,
                    normal_impulse: 0.0,
                    tangent_impulse: 0.0,
                });
            }
        }
        contacts
    }

    fn update_touching(&mut self, contacts: &[Contact], events: &mut Vec<ContactEvent>) {
        let now: Vec<(BodyHandle, BodyHandle)> = contacts
            .iter()
            .map(|c| (self.handle_at(c.dynamic), self.handle_at(c.other)))
            .collect();

        for &(dynamic, other) in &self.touching {
            if !now.contains(&(dynamic, other)) {
                events.push(ContactEvent::Ended { dynamic, other });
            }
        }
        for &(dynamic, other) in &now {
            if !self.touching.contains(&(dynamic, other)) {
                events.push(ContactEvent::Began { dynamic, other });
            }
        }
        self.touching = now;
    }
}

/// One sequential-impulse pass for a contact against an immovable body.
/// Impulses are kept in velocity units; the static side has infinite mass.
fn solve_velocity(body: &mut DynamicBody, c: &mut Contact) {
    let tangent = c.normal.perp();

    let vt = body.vel.dot(tangent);
    let max_friction = c.friction * c.normal_impulse;
    let new_tangent = (c.tangent_impulse - vt).clamp(-max_friction, max_friction);
    body.vel += tangent * (new_tangent - c.tangent_impulse);
    c.tangent_impulse = new_tangent;

    let vn = body.vel.dot(c.normal);
    let new_normal = (c.normal_impulse - (vn - c.velocity_bias)).max(0.0);
    body.vel += c.normal * (new_normal - c.normal_impulse);
    c.normal_impulse = new_normal;
}

fn solve_position(body: &mut DynamicBody, rect: &Rect) {
    let result = circle_rect_contact(body.pos, body.radius, rect, LINEAR_SLOP);
    if !result.hit {
        return;
    }
    let separation = -result.penetration;
    let correction =
        (BAUMGARTE * (separation + LINEAR_SLOP)).clamp(-MAX_LINEAR_CORRECTION, 0.0);
    body.pos -= result.normal * correction;
}
