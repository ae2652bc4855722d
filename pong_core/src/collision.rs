//! Axis-aligned rectangle overlap.

use crate::types::Entity;

/// Whether two rectangles overlap. Edges are exclusive: rectangles that only
/// touch along an edge or a corner do not collide.
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());

    if a_max.x <= b_min.x || a_min.x >= b_max.x {
        return false;
    }
    if a_max.y <= b_min.y || a_min.y >= b_max.y {
        return false;
    }

    true
}
