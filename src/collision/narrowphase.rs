//! Axis-dominance resolution of two interpenetrating rectangles.

use crate::core::{entity::Entity, types::Side};
use crate::utils::allocator::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Outcome of pushing one entity out of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Entity whose position was corrected.
    pub moved: EntityId,
    /// Entity it was pushed against.
    pub against: EntityId,
    pub axis: Axis,
    /// Side of `moved` that is now in flush contact with `against`.
    pub side: Side,
}

/// Offsets of `b`'s center from `a`'s, normalised by `b`'s half extents.
pub fn relative_offset(a: &Entity, b: &Entity) -> (f32, f32) {
    let relative_x = (b.center_x() - a.center_x()) / (b.width() / 2.0);
    let relative_y = (b.center_y() - a.center_y()) / (b.height() / 2.0);
    (relative_x, relative_y)
}

/// Horizontal wins when `b` is further off to the side than above/below, by
/// more than a margin that grows with `a`'s downward speed.
pub fn resolution_axis(a: &Entity, b: &Entity, bias_divisor: f32) -> Axis {
    let (relative_x, relative_y) = relative_offset(a, b);
    let distance_x = relative_x.abs();
    let distance_y = relative_y.abs();
    if distance_y < distance_x && (distance_x - distance_y).abs() > a.velocity.y / bias_divisor {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Moves `a` flush against `b` on the dominant axis, zeroes `a`'s velocity on
/// that axis and records the contact on both entities.
pub fn resolve(a: &mut Entity, b: &mut Entity, bias_divisor: f32) -> Resolution {
    let (relative_x, relative_y) = relative_offset(a, b);
    let axis = resolution_axis(a, b, bias_divisor);

    let side = match axis {
        Axis::Horizontal => {
            let side = if relative_x > 0.0 {
                a.position.x = b.position.x - a.width();
                Side::Right
            } else {
                a.position.x = b.position.x + b.width();
                Side::Left
            };
            a.velocity.x = 0.0;
            side
        }
        Axis::Vertical => {
            let side = if relative_y > 0.0 {
                a.position.y = b.position.y - a.height();
                Side::Down
            } else {
                a.position.y = b.position.y + b.height();
                Side::Up
            };
            a.velocity.y = 0.0;
            side
        }
    };

    a.touching_mut().set(side, b.id);
    b.touching_mut().set(side.opposite(), a.id);

    Resolution {
        moved: a.id,
        against: b.id,
        axis,
        side,
    }
}
