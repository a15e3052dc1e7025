//! Core geometry types for the layout engine

use serde::Deserialize;

use crate::location::Axis;
use crate::pattern::Placement;

/// How a child sits relative to its parent: inside, or beside an edge.
pub type PlacementMode = Placement;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// A bounding box representing the spatial extent of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Start coordinate on an axis (x or y)
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent on an axis (width or height)
    pub fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Same size, moved so its top-left corner is at `origin`
    pub fn moved_to(&self, origin: Point) -> BoundingBox {
        BoundingBox::new(origin.x, origin.y, self.width, self.height)
    }

    /// Set the start coordinate on one axis
    pub fn with_start(&self, axis: Axis, start: f64) -> BoundingBox {
        match axis {
            Axis::Horizontal => BoundingBox::new(start, self.y, self.width, self.height),
            Axis::Vertical => BoundingBox::new(self.x, start, self.width, self.height),
        }
    }

    /// Check if this bounding box contains a point
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if this bounding box intersects another.
    ///
    /// Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Move (never resize) this box so it lies within `outer`.
    ///
    /// A box larger than `outer` on an axis is aligned to its start edge.
    pub fn clamped_within(&self, outer: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            clamp_start(self.x, self.width, outer.x, outer.width),
            clamp_start(self.y, self.height, outer.y, outer.height),
            self.width,
            self.height,
        )
    }
}

/// Clamp `pos` so `[pos, pos + len]` stays inside `[start, start + span]`
pub(crate) fn clamp_start(pos: f64, len: f64, start: f64, span: f64) -> f64 {
    let max = start + span - len;
    if max < start {
        start
    } else {
        pos.clamp(start, max)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let a = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
        let b = BoundingBox::new(50.0, 0.0, 50.0, 50.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));

        let c = BoundingBox::new(49.0, 49.0, 10.0, 10.0);
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_clamped_within() {
        let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(80.0, -10.0, 40.0, 20.0);
        assert_eq!(b.clamped_within(&outer), BoundingBox::new(60.0, 0.0, 40.0, 20.0));

        let wide = BoundingBox::new(30.0, 30.0, 150.0, 10.0);
        assert_eq!(wide.clamped_within(&outer).x, 0.0);
    }

    #[test]
    fn test_axis_accessors() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.start(Axis::Vertical), 20.0);
        assert_eq!(b.span(Axis::Horizontal), 30.0);
        assert_eq!(b.with_start(Axis::Horizontal, 0.0).x, 0.0);
        assert_eq!(b.center(), Point::new(25.0, 40.0));
    }
}
