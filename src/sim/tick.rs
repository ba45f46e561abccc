//! Fixed timestep motion step
//!
//! Advances items by one step: integrate and bounce off the arena edges,
//! then resolve item-item collisions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::item::Item;
use crate::consts::*;
use crate::tuning::Tuning;

/// The rectangle items move within
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Reserved at the far edge of each axis so an item stays fully visible
    pub footprint: f32,
    /// Collision radius of an item at scale 1.0
    pub base_radius: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            footprint: ITEM_FOOTPRINT,
            base_radius: ITEM_BASE_SIZE / 2.0,
        }
    }
}

impl Arena {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            width: tuning.arena_width,
            height: tuning.arena_height,
            footprint: tuning.item_footprint,
            base_radius: tuning.item_size / 2.0,
        }
    }

    /// Largest allowed (x, y) for an item position
    #[inline]
    pub fn max_pos(&self) -> (f32, f32) {
        (
            (self.width - self.footprint).max(0.0),
            (self.height - self.footprint).max(0.0),
        )
    }
}

/// Advance all items by `dt` seconds
///
/// Returns the number of item pairs that collided.
pub fn tick(items: &mut [Item], dt: f32, arena: &Arena) -> usize {
    integrate(items, dt, arena);
    let collisions = resolve_collisions(items, arena.base_radius);
    // Separation can push an item past an edge; pull it back without
    // touching velocity so the next integrate reflects it.
    confine(items, arena);
    collisions
}

/// Move every item and reflect it off the arena edges
pub fn integrate(items: &mut [Item], dt: f32, arena: &Arena) {
    let (max_x, max_y) = arena.max_pos();

    for item in items.iter_mut() {
        let next = item.pos + item.vel * dt;
        let (x, vx) = bounce(next.x, item.vel.x, max_x);
        let (y, vy) = bounce(next.y, item.vel.y, max_y);
        item.pos = Vec2::new(x, y);
        item.vel = Vec2::new(vx, vy);
    }
}

/// Clamp every item position into the arena
pub fn confine(items: &mut [Item], arena: &Arena) {
    let (max_x, max_y) = arena.max_pos();
    for item in items.iter_mut() {
        item.pos = item.pos.clamp(Vec2::ZERO, Vec2::new(max_x, max_y));
    }
}

/// One axis of boundary reflection
#[inline]
fn bounce(pos: f32, vel: f32, max: f32) -> (f32, f32) {
    if pos < 0.0 || pos > max {
        (pos.clamp(0.0, max), -vel)
    } else {
        (pos, vel)
    }
}
