//! Floating item entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Apple,
    Banana,
    Carrot,
    Grapes,
    Tomato,
    Peach,
}

impl ItemKind {
    /// Every category, in declaration order
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Apple,
        ItemKind::Banana,
        ItemKind::Carrot,
        ItemKind::Grapes,
        ItemKind::Tomato,
        ItemKind::Peach,
    ];

    /// Red-ish categories that are hard to tell apart at a glance
    pub const LOOKALIKES: [ItemKind; 3] = [ItemKind::Apple, ItemKind::Tomato, ItemKind::Peach];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Apple => "Apple",
            ItemKind::Banana => "Banana",
            ItemKind::Carrot => "Carrot",
            ItemKind::Grapes => "Grapes",
            ItemKind::Tomato => "Tomato",
            ItemKind::Peach => "Peach",
        }
    }

    /// Display color (0xAARRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            ItemKind::Apple => 0xFFE7_4C3C,
            ItemKind::Banana => 0xFFF1_C40F,
            ItemKind::Carrot => 0xFFE6_7E22,
            ItemKind::Grapes => 0xFF9B_59B6,
            ItemKind::Tomato => 0xFFD6_3031,
            ItemKind::Peach => 0xFFFE_7096,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ItemKind::Apple => "🍎",
            ItemKind::Banana => "🍌",
            ItemKind::Carrot => "🥕",
            ItemKind::Grapes => "🍇",
            ItemKind::Tomato => "🍅",
            ItemKind::Peach => "🍑",
        }
    }
}

/// A moving item in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    /// Top-left corner, in `[0, dimension - footprint]` on each axis
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Item {
    /// A neutral item at rest: no rotation, unit scale, fully opaque
    pub fn new(id: u32, kind: ItemKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }

    /// Collision radius for this item given the base radius
    #[inline]
    pub fn effective_radius(&self, base_radius: f32) -> f32 {
        base_radius * self.scale
    }
}

/// Count items of a given kind
pub fn count_kind(items: &[Item], kind: ItemKind) -> u32 {
    items.iter().filter(|i| i.kind == kind).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookalikes_are_subset() {
        for kind in ItemKind::LOOKALIKES {
            assert!(ItemKind::ALL.contains(&kind));
        }
    }

    #[test]
    fn test_effective_radius_scales() {
        let mut item = Item::new(0, ItemKind::Apple, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(item.effective_radius(24.0), 24.0);
        item.scale = 1.25;
        assert_eq!(item.effective_radius(24.0), 30.0);
    }

    #[test]
    fn test_count_kind() {
        let items = vec![
            Item::new(0, ItemKind::Apple, Vec2::ZERO, Vec2::ZERO),
            Item::new(1, ItemKind::Peach, Vec2::ZERO, Vec2::ZERO),
            Item::new(2, ItemKind::Apple, Vec2::ZERO, Vec2::ZERO),
        ];
        assert_eq!(count_kind(&items, ItemKind::Apple), 2);
        assert_eq!(count_kind(&items, ItemKind::Grapes), 0);
    }
}
