//! Interactive drag resolution
//!
//! A [`DragGesture`] exists only while a pointer is down: [`DragGesture::begin`]
//! starts it, [`DragGesture::drag_to`] resolves each pointer move, and
//! [`DragGesture::finish`] consumes it and yields the committed bounds. Each
//! gesture owns its own state, so concurrent pointers need one gesture each.

use std::collections::BTreeMap;

use crate::location::{Axis, LocationSpec, Side};

use super::fixed::{fixed_sides, FixedSides};
use super::resolve::primary_side;
use super::types::{BoundingBox, PlacementMode, Point};

/// Strict overlap test; boxes that only touch do not collide.
pub fn check_collision(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.intersects(b)
}

/// What a drag is allowed to do, derived once per gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConstraints {
    pub fixed: FixedSides,
    pub mode: PlacementMode,
    /// Parent edge an outer child is attached to
    pub attachment: Option<Side>,
}

impl DragConstraints {
    pub fn from_location(location: &LocationSpec, mode: PlacementMode) -> Self {
        let attachment = match mode {
            PlacementMode::Inner => None,
            PlacementMode::Outer => primary_side(location),
        };
        Self {
            fixed: fixed_sides(location),
            mode,
            attachment,
        }
    }
}

/// Geometry a drag frame is resolved against, supplied fresh by the host
#[derive(Debug, Clone, Copy)]
pub struct DragEnv<'a> {
    pub parent: BoundingBox,
    pub surface: BoundingBox,
    /// Current bounds of the siblings in the dragged component's own
    /// placement map, keyed by component name.
    ///
    /// Inner and outer maps may reuse a name, so the two must not be merged;
    /// [`PatternLayout::siblings`](super::PatternLayout::siblings) yields one map.
    pub siblings: &'a BTreeMap<String, BoundingBox>,
}

/// Which move a frame committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMove {
    Full,
    XOnly,
    YOnly,
    Frozen,
}

/// State of one in-progress drag
#[derive(Debug, Clone)]
pub struct DragGesture {
    component: String,
    constraints: DragConstraints,
    initial: BoundingBox,
    current: BoundingBox,
}

impl DragGesture {
    pub fn begin(
        component: impl Into<String>,
        initial: BoundingBox,
        constraints: DragConstraints,
    ) -> Self {
        let component = component.into();
        log::trace!("drag start '{}' at {:?}", component, initial);
        Self {
            component,
            constraints,
            initial,
            current: initial,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// Bounds committed by the last frame
    pub fn current(&self) -> BoundingBox {
        self.current
    }

    /// Resolve one pointer move to the nearest legal position and commit it
    pub fn drag_to(&mut self, proposed: Point, env: &DragEnv<'_>) -> DragMove {
        let target = self.constrain(proposed, env);

        let obstacles: Vec<BoundingBox> = env
            .siblings
            .iter()
            .filter(|(name, _)| name.as_str() != self.component)
            .map(|(_, b)| *b)
            .chain(match self.constraints.mode {
                PlacementMode::Outer => Some(env.parent),
                PlacementMode::Inner => None,
            })
            .collect();
        let is_free = |b: &BoundingBox| !obstacles.iter().any(|o| check_collision(b, o));

        let candidates = [
            (DragMove::Full, target),
            (
                DragMove::XOnly,
                self.current.with_start(Axis::Horizontal, target.x),
            ),
            (
                DragMove::YOnly,
                self.current.with_start(Axis::Vertical, target.y),
            ),
        ];
        let (chosen, bounds) = candidates
            .into_iter()
            .find(|(_, b)| is_free(b))
            .unwrap_or((DragMove::Frozen, self.current));

        log::trace!("drag '{}': {:?} -> {:?}", self.component, chosen, bounds);
        self.current = bounds;
        chosen
    }

    /// End the gesture, returning the committed bounds
    pub fn finish(self) -> BoundingBox {
        log::trace!("drag end '{}' at {:?}", self.component, self.current);
        self.current
    }

    /// Apply fixed-axis freezing and region clamping to a proposal
    fn constrain(&self, proposed: Point, env: &DragEnv<'_>) -> BoundingBox {
        let fixed = &self.constraints.fixed;
        let x = if fixed.locks(Axis::Horizontal) {
            self.initial.x
        } else {
            proposed.x
        };
        let y = if fixed.locks(Axis::Vertical) {
            self.initial.y
        } else {
            proposed.y
        };
        let moved = self.initial.moved_to(Point::new(x, y));

        match self.constraints.mode {
            PlacementMode::Inner => moved.clamped_within(&env.parent),
            PlacementMode::Outer => {
                let clamped = moved.clamped_within(&env.surface);
                if !clamped.intersects(&env.parent) {
                    return clamped;
                }
                let side = self
                    .constraints
                    .attachment
                    .unwrap_or_else(|| nearest_side(&clamped, &env.parent));
                push_out(&clamped, &env.parent, side).clamped_within(&env.surface)
            }
        }
    }
}

/// Parent edge needing the shortest move to clear `child` from it
fn nearest_side(child: &BoundingBox, parent: &BoundingBox) -> Side {
    let distances = [
        (Side::Left, child.right() - parent.x),
        (Side::Right, parent.right() - child.x),
        (Side::Top, child.bottom() - parent.y),
        (Side::Bottom, parent.bottom() - child.y),
    ];
    distances
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(Side::Left, |(side, _)| side)
}

/// Move `child` just outside `parent` beyond `side`
fn push_out(child: &BoundingBox, parent: &BoundingBox, side: Side) -> BoundingBox {
    match side {
        Side::Left => child.with_start(Axis::Horizontal, parent.x - child.width),
        Side::Right => child.with_start(Axis::Horizontal, parent.right()),
        Side::Top => child.with_start(Axis::Vertical, parent.y - child.height),
        Side::Bottom => child.with_start(Axis::Vertical, parent.bottom()),
    }
}
