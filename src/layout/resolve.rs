//! Layout resolution: location constraints to pixel bounds

use crate::location::{Axis, LocationSpec, OffsetRange, Side};

use super::types::{clamp_start, BoundingBox, PlacementMode, Size};

/// Everything a child is resolved against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutFrame {
    /// Bounds of the parent pattern
    pub parent: BoundingBox,
    /// Drawing surface outer children are clamped into
    pub surface: BoundingBox,
    /// Pixels per location cell
    pub cell: f64,
}

impl LayoutFrame {
    pub fn new(parent: BoundingBox, surface: BoundingBox, cell: f64) -> Self {
        Self {
            parent,
            surface,
            cell,
        }
    }
}

/// Side an outer child sits beside; `left > right > top > bottom`
pub fn primary_side(location: &LocationSpec) -> Option<Side> {
    [Side::Left, Side::Right, Side::Top, Side::Bottom]
        .into_iter()
        .find(|s| location.get(*s).is_some())
}

/// Compute a child's pixel bounds from its location.
///
/// Never fails: a location that cannot be honoured still yields a box inside
/// the legal region.
pub fn resolve(
    location: &LocationSpec,
    frame: &LayoutFrame,
    child: Size,
    mode: PlacementMode,
) -> BoundingBox {
    if location.is_empty() {
        let center = frame.parent.center();
        return BoundingBox::new(
            center.x - child.width / 2.0,
            center.y - child.height / 2.0,
            child.width,
            child.height,
        );
    }

    match mode {
        PlacementMode::Inner => resolve_inner(location, frame, child),
        PlacementMode::Outer => resolve_outer(location, frame, child),
    }
}

fn resolve_inner(location: &LocationSpec, frame: &LayoutFrame, child: Size) -> BoundingBox {
    let (x, width) = place_axis(location, Axis::Horizontal, &frame.parent, child, frame.cell);
    let (y, height) = place_axis(location, Axis::Vertical, &frame.parent, child, frame.cell);
    BoundingBox::new(x, y, width, height).clamped_within(&frame.parent)
}

fn resolve_outer(location: &LocationSpec, frame: &LayoutFrame, child: Size) -> BoundingBox {
    let Some(primary) = primary_side(location) else {
        return resolve_inner(location, frame, child);
    };
    let parent = &frame.parent;
    let gap = location.get(primary).map_or(0.0, |r| cells(r, frame.cell));

    let along = primary.axis();
    let across = other_axis(along);

    let len = child.along(along);
    let start = match primary {
        Side::Left => parent.x - len - gap,
        Side::Top => parent.y - len - gap,
        Side::Right => parent.right() + gap,
        Side::Bottom => parent.bottom() + gap,
    };
    let (cross_start, cross_len) = place_axis(location, across, parent, child, frame.cell);

    let bounds = match along {
        Axis::Horizontal => BoundingBox::new(start, cross_start, len, cross_len),
        Axis::Vertical => BoundingBox::new(cross_start, start, cross_len, len),
    };
    bounds.clamped_within(&frame.surface)
}

/// Position and length on one axis, measured against the parent's span.
fn place_axis(
    location: &LocationSpec,
    axis: Axis,
    parent: &BoundingBox,
    child: Size,
    cell: f64,
) -> (f64, f64) {
    let (near_side, far_side) = match axis {
        Axis::Horizontal => (Side::Left, Side::Right),
        Axis::Vertical => (Side::Top, Side::Bottom),
    };
    let near = location.get(near_side);
    let far = location.get(far_side);

    let start = parent.start(axis);
    let span = parent.span(axis);
    let len = child.along(axis);
    let centered = start + (span - len) / 2.0;

    match (near, far) {
        // Stretch between two flush edges
        (Some(n), Some(f)) if n.is_flush() && f.is_flush() => {
            let inset = cells(n, cell);
            let stretched = span - inset - cells(f, cell);
            (start + inset, stretched.max(0.0))
        }
        (Some(n), _) if n.is_flush() => (start, len),
        (_, Some(f)) if f.is_flush() => (start + span - len, len),
        (Some(n), None) => (start + cells(n, cell), len),
        (None, Some(f)) => (start + span - len - cells(f, cell), len),
        (Some(n), Some(f)) => {
            // Center inside the inset region, falling back to the near edge
            let lo = start + cells(n, cell);
            let hi = start + span - cells(f, cell);
            if hi - lo >= len {
                (lo + (hi - lo - len) / 2.0, len)
            } else {
                (clamp_start(lo, len, start, span), len)
            }
        }
        (None, None) => (centered, len),
    }
}

fn cells(range: OffsetRange, cell: f64) -> f64 {
    f64::from(range.min) * cell
}

fn other_axis(axis: Axis) -> Axis {
    match axis {
        Axis::Horizontal => Axis::Vertical,
        Axis::Vertical => Axis::Horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> LayoutFrame {
        LayoutFrame::new(
            BoundingBox::new(0.0, 0.0, 300.0, 300.0),
            BoundingBox::new(-200.0, -200.0, 700.0, 700.0),
            10.0,
        )
    }

    fn loc(sides: &[(Side, OffsetRange)]) -> LocationSpec {
        sides
            .iter()
            .fold(LocationSpec::new(), |l, (s, r)| l.with(*s, *r))
    }

    const CHILD: Size = Size {
        width: 50.0,
        height: 50.0,
    };

    #[test]
    fn test_anchored_top_left() {
        let l = loc(&[
            (Side::Left, OffsetRange::exact(0)),
            (Side::Top, OffsetRange::exact(0)),
        ]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Inner);
        assert_eq!(b, BoundingBox::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_horizontal_stretch_centers_vertically() {
        let l = loc(&[
            (Side::Left, OffsetRange::exact(0)),
            (Side::Right, OffsetRange::exact(0)),
        ]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Inner);
        assert_eq!(b, BoundingBox::new(0.0, 125.0, 300.0, 50.0));
    }

    #[test]
    fn test_flush_far_edge() {
        let l = loc(&[(Side::Bottom, OffsetRange::at_least(0))]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Inner);
        assert_eq!((b.x, b.y), (125.0, 250.0));
    }

    #[test]
    fn test_single_offset_measured_from_edge() {
        let l = loc(&[
            (Side::Left, OffsetRange::exact(3)),
            (Side::Bottom, OffsetRange::exact(2)),
        ]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Inner);
        assert_eq!((b.x, b.y), (30.0, 230.0));
    }

    #[test]
    fn test_both_nonzero_centers_in_inset() {
        let l = loc(&[
            (Side::Left, OffsetRange::exact(2)),
            (Side::Right, OffsetRange::exact(8)),
        ]);
        // Inset region [20, 220], child 50 wide
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Inner);
        assert_eq!(b.x, 95.0);
    }

    #[test]
    fn test_both_nonzero_too_tight_prefers_left() {
        let l = loc(&[
            (Side::Left, OffsetRange::exact(14)),
            (Side::Right, OffsetRange::exact(14)),
        ]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Inner);
        assert_eq!(b.x, 140.0);
    }

    #[test]
    fn test_inner_clamped_into_parent() {
        let l = loc(&[(Side::Left, OffsetRange::exact(40))]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Inner);
        assert_eq!(b.x, 250.0);
    }

    #[test]
    fn test_no_location_centers_in_any_mode() {
        let inner = resolve(&LocationSpec::new(), &frame(), CHILD, PlacementMode::Inner);
        let outer = resolve(&LocationSpec::new(), &frame(), CHILD, PlacementMode::Outer);
        assert_eq!(inner, BoundingBox::new(125.0, 125.0, 50.0, 50.0));
        assert_eq!(inner, outer);
    }

    #[test]
    fn test_outer_beside_each_side() {
        let f = frame();
        let left = resolve(
            &loc(&[(Side::Left, OffsetRange::exact(1))]),
            &f,
            CHILD,
            PlacementMode::Outer,
        );
        assert_eq!((left.x, left.y), (-60.0, 125.0));

        let bottom = resolve(
            &loc(&[(Side::Bottom, OffsetRange::exact(0))]),
            &f,
            CHILD,
            PlacementMode::Outer,
        );
        assert_eq!((bottom.x, bottom.y), (125.0, 300.0));
    }

    #[test]
    fn test_outer_priority_and_cross_axis() {
        let l = loc(&[
            (Side::Right, OffsetRange::exact(0)),
            (Side::Top, OffsetRange::exact(0)),
            (Side::Bottom, OffsetRange::exact(0)),
        ]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Outer);
        assert_eq!(b, BoundingBox::new(300.0, 0.0, 50.0, 300.0));
        assert_eq!(primary_side(&l), Some(Side::Right));
    }

    #[test]
    fn test_outer_clamped_to_surface() {
        let l = loc(&[(Side::Top, OffsetRange::exact(30))]);
        let b = resolve(&l, &frame(), CHILD, PlacementMode::Outer);
        assert_eq!(b.y, -200.0);
    }
}
