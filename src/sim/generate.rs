//! Stage layout generation
//!
//! All randomness comes from the caller's RNG so a seed reproduces a layout.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::difficulty::{CountMode, Difficulty, ROTATION_RANGE};
use super::item::{Item, ItemKind, count_kind};
use super::tick::Arena;
use crate::consts::SPEED_SCALE;

/// A freshly generated stage: items plus the question asked about them
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub items: Vec<Item>,
    /// `None` means count every item
    pub target: Option<ItemKind>,
    pub correct_answer: u32,
}

/// Generate the items for a stage and pick its question
pub fn generate<R: Rng>(difficulty: &Difficulty, arena: &Arena, rng: &mut R) -> Layout {
    let items = generate_items(difficulty, arena, rng);

    match difficulty.count_mode {
        CountMode::All => Layout {
            correct_answer: items.len() as u32,
            target: None,
            items,
        },
        CountMode::Specific => {
            let target = pick_target(&items, rng);
            let correct_answer = target.map(|k| count_kind(&items, k)).unwrap_or(0);
            Layout {
                items,
                target,
                correct_answer,
            }
        }
    }
}

/// Generate `difficulty.item_count` items at random positions and velocities
pub fn generate_items<R: Rng>(
    difficulty: &Difficulty,
    arena: &Arena,
    rng: &mut R,
) -> Vec<Item> {
    let pool: &[ItemKind] = if difficulty.near_duplicates {
        &ItemKind::LOOKALIKES
    } else {
        &ItemKind::ALL
    };
    let (max_x, max_y) = arena.max_pos();
    let speed = difficulty.speed * SPEED_SCALE;

    (0..difficulty.item_count)
        .map(|id| {
            let kind = *pool.choose(rng).unwrap_or(&ItemKind::Apple);
            let pos = Vec2::new(rng.random::<f32>() * max_x, rng.random::<f32>() * max_y);
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * speed,
                (rng.random::<f32>() - 0.5) * speed,
            );

            let mut item = Item::new(id, kind, pos, vel);
            if difficulty.rotation {
                item.rotation = lerp(ROTATION_RANGE, rng.random());
            }
            if difficulty.scale_variation {
                item.scale = lerp(difficulty.scale_range(), rng.random());
            }
            if difficulty.opacity_variation {
                item.opacity = lerp(difficulty.opacity_range(), rng.random());
            }
            item
        })
        .collect()
}

/// Pick a target kind uniformly from the kinds present in `items`
pub fn pick_target<R: Rng>(items: &[Item], rng: &mut R) -> Option<ItemKind> {
    let mut present: Vec<ItemKind> = items.iter().map(|i| i.kind).collect();
    present.sort();
    present.dedup();
    present.choose(rng).copied()
}

#[inline]
fn lerp((min, max): (f32, f32), t: f32) -> f32 {
    min + (max - min) * t
}
