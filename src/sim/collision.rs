//! Pairwise item collision response
//!
//! Items are treated as equal-mass discs. Overlapping pairs swap velocities
//! and are pushed apart along the line between their centers until they
//! just touch. Pairs are visited in (i < j) index order and resolved one at a
//! time, so a later pair sees positions already moved by an earlier one.

use glam::Vec2;

use super::item::Item;

/// Below this squared distance two centers are treated as coincident
const COINCIDENT_EPSILON_SQ: f32 = 1e-12;

/// Outcome of a single pair check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first item's center toward the second's
    pub normal: Vec2,
    /// How far the discs overlap (positive when colliding)
    pub overlap: f32,
}

/// Check two discs for overlap
///
/// Coincident centers report a contact along +X so callers never divide by zero.
pub fn disc_contact(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> Option<Contact> {
    let min_dist = a_radius + b_radius;
    let delta = b_center - a_center;
    let dist_sq = delta.length_squared();

    if dist_sq >= min_dist * min_dist {
        return None;
    }

    if dist_sq <= COINCIDENT_EPSILON_SQ {
        return Some(Contact {
            normal: Vec2::X,
            overlap: min_dist,
        });
    }

    let dist = dist_sq.sqrt();
    Some(Contact {
        normal: delta / dist,
        overlap: min_dist - dist,
    })
}

/// Resolve every overlapping pair in place
///
/// Returns the number of pairs that were resolved this pass.
pub fn resolve_collisions(items: &mut [Item], base_radius: f32) -> usize {
    let mut resolved = 0;

    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            let (head, tail) = items.split_at_mut(j);
            if resolve_pair(&mut head[i], &mut tail[0], base_radius) {
                resolved += 1;
            }
        }
    }

    resolved
}

/// Resolve one pair: swap velocities and separate by half the overlap each
pub fn resolve_pair(a: &mut Item, b: &mut Item, base_radius: f32) -> bool {
    let ra = a.effective_radius(base_radius);
    let rb = b.effective_radius(base_radius);

    let Some(contact) = disc_contact(a.pos, ra, b.pos, rb) else {
        return false;
    };

    std::mem::swap(&mut a.vel, &mut b.vel);

    let push = contact.normal * (contact.overlap / 2.0);
    a.pos -= push;
    b.pos += push;

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::item::ItemKind;
    use proptest::prelude::*;

    const R: f32 = 24.0;

    fn item(id: u32, pos: Vec2, vel: Vec2) -> Item {
        Item::new(id, ItemKind::Apple, pos, vel)
    }

    #[test]
    fn test_no_contact_when_apart() {
        assert!(disc_contact(Vec2::ZERO, R, Vec2::new(60.0, 0.0), R).is_none());
        // Exactly touching is not a collision
        assert!(disc_contact(Vec2::ZERO, R, Vec2::new(48.0, 0.0), R).is_none());
    }

    #[test]
    fn test_contact_normal_and_overlap() {
        let c = disc_contact(Vec2::ZERO, R, Vec2::new(0.0, 40.0), R).unwrap();
        assert!((c.normal - Vec2::Y).length() < 1e-6);
        assert!((c.overlap - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_coincident_items_separate_along_x() {
        let mut items = vec![
            item(0, Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0)),
            item(1, Vec2::new(100.0, 100.0), Vec2::new(0.0, -5.0)),
        ];

        assert_eq!(resolve_collisions(&mut items, R), 1);

        let dist = items[0].pos.distance(items[1].pos);
        assert!((dist - 48.0).abs() < 1e-4);
        assert_eq!(items[0].pos.y, items[1].pos.y);
        assert!(items[0].pos.x < items[1].pos.x);
    }

    #[test]
    fn test_velocities_swap() {
        let va = Vec2::new(30.0, -12.0);
        let vb = Vec2::new(-7.0, 44.0);
        let mut a = item(0, Vec2::new(0.0, 0.0), va);
        let mut b = item(1, Vec2::new(20.0, 10.0), vb);

        assert!(resolve_pair(&mut a, &mut b, R));
        assert_eq!(a.vel, vb);
        assert_eq!(b.vel, va);
    }

    #[test]
    fn test_scale_affects_radius() {
        let mut a = item(0, Vec2::ZERO, Vec2::ZERO);
        let mut b = item(1, Vec2::new(55.0, 0.0), Vec2::ZERO);
        assert!(!resolve_pair(&mut a, &mut b, R));

        a.scale = 1.4;
        assert!(resolve_pair(&mut a, &mut b, R));
        let dist = a.pos.distance(b.pos);
        assert!((dist - (24.0 * 1.4 + 24.0)).abs() < 1e-4);
    }

    #[test]
    fn test_sequential_resolution_is_order_stable() {
        let layout = || {
            vec![
                item(0, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0)),
                item(1, Vec2::new(110.0, 100.0), Vec2::new(2.0, 0.0)),
                item(2, Vec2::new(120.0, 105.0), Vec2::new(3.0, 0.0)),
            ]
        };
        let mut first = layout();
        let mut second = layout();
        resolve_collisions(&mut first, R);
        resolve_collisions(&mut second, R);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_overlapping_pair_ends_touching(
            ax in 0.0f32..400.0, ay in 0.0f32..600.0,
            dx in -40.0f32..40.0, dy in -40.0f32..40.0,
            sa in 1.0f32..1.4, sb in 1.0f32..1.4,
            avx in -200.0f32..200.0, avy in -200.0f32..200.0,
            bvx in -200.0f32..200.0, bvy in -200.0f32..200.0,
        ) {
            let mut a = item(0, Vec2::new(ax, ay), Vec2::new(avx, avy));
            let mut b = item(1, Vec2::new(ax + dx, ay + dy), Vec2::new(bvx, bvy));
            a.scale = sa;
            b.scale = sb;
            let (va, vb) = (a.vel, b.vel);

            let hit = resolve_pair(&mut a, &mut b, R);
            let radii = R * sa + R * sb;

            if hit {
                prop_assert!(a.pos.distance(b.pos) >= radii - 1e-2);
                prop_assert_eq!(a.vel, vb);
                prop_assert_eq!(b.vel, va);
            } else {
                prop_assert_eq!(a.vel, va);
                prop_assert_eq!(b.vel, vb);
            }
        }
    }
}
