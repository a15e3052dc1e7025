//! Fixed-side classification

use crate::location::{Axis, LocationSpec, Side};

/// Which edges of a child are pinned flush to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedSides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl FixedSides {
    pub fn is_fixed(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Any side on this axis is fixed, so the axis cannot be dragged
    pub fn locks(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.left || self.right,
            Axis::Vertical => self.top || self.bottom,
        }
    }

    /// Both opposite sides on this axis are fixed
    pub fn stretches(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.left && self.right,
            Axis::Vertical => self.top && self.bottom,
        }
    }

    pub fn count(&self) -> usize {
        Side::ALL.iter().filter(|s| self.is_fixed(**s)).count()
    }

    /// The fixed side when exactly one is fixed
    pub fn single(&self) -> Option<Side> {
        if self.count() != 1 {
            return None;
        }
        Side::ALL.into_iter().find(|s| self.is_fixed(*s))
    }
}

/// A side is fixed when present with a lower bound of zero.
pub fn fixed_sides(location: &LocationSpec) -> FixedSides {
    FixedSides {
        left: location.is_pinned(Side::Left),
        right: location.is_pinned(Side::Right),
        top: location.is_pinned(Side::Top),
        bottom: location.is_pinned(Side::Bottom),
    }
}
