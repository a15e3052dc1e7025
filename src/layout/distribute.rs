//! Even spacing of siblings anchored to the same parent edge

use std::collections::BTreeMap;

use crate::location::{Axis, LocationSpec, Side};

use super::fixed::fixed_sides;
use super::resolve::primary_side;
use super::types::{BoundingBox, PlacementMode};

/// One resolved sibling to be considered for distribution
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub location: &'a LocationSpec,
    pub mode: PlacementMode,
    pub bounds: BoundingBox,
}

/// Edge a sibling is grouped by, if it has a free axis to spread along.
///
/// Outer children group by their primary side, inner children by their one
/// fixed side. A child pinned on the free axis (cornered or stretched) stays
/// put; plain offsets on the free axis do not exclude it.
pub fn anchor_side(location: &LocationSpec, mode: PlacementMode) -> Option<Side> {
    let side = match mode {
        PlacementMode::Outer => primary_side(location)?,
        PlacementMode::Inner => fixed_sides(location).single()?,
    };
    let free = free_axis(side);
    let pinned = Side::ALL
        .iter()
        .any(|s| s.axis() == free && location.is_pinned(*s));
    if pinned {
        None
    } else {
        Some(side)
    }
}

/// Axis a group anchored on `side` is spread along
fn free_axis(side: Side) -> Axis {
    match side.axis() {
        Axis::Horizontal => Axis::Vertical,
        Axis::Vertical => Axis::Horizontal,
    }
}

/// Space each anchored group evenly along the parent edge.
///
/// `spacing = max(min_spacing, (span - total) / (count + 1))`; siblings are
/// laid out in input order starting `spacing` from the parent's start edge.
/// Returns bounds in input order; unclassified siblings are unchanged.
pub fn distribute(
    items: &[Placed<'_>],
    parent: &BoundingBox,
    min_spacing: f64,
) -> Vec<BoundingBox> {
    let mut result: Vec<BoundingBox> = items.iter().map(|p| p.bounds).collect();

    let mut groups: BTreeMap<(u8, Side), Vec<usize>> = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        if let Some(side) = anchor_side(item.location, item.mode) {
            let mode_key = match item.mode {
                PlacementMode::Inner => 0,
                PlacementMode::Outer => 1,
            };
            groups.entry((mode_key, side)).or_default().push(index);
        }
    }

    for ((_, side), members) in groups {
        let axis = free_axis(side);
        let span = parent.span(axis);
        let total: f64 = members.iter().map(|i| result[*i].span(axis)).sum();
        let spacing = ((span - total) / (members.len() as f64 + 1.0)).max(min_spacing);
        log::trace!(
            "distributing {} siblings on {} with spacing {}",
            members.len(),
            side,
            spacing
        );

        let mut cursor = parent.start(axis) + spacing;
        for index in members {
            let placed = result[index].with_start(axis, cursor);
            cursor += placed.span(axis) + spacing;
            result[index] = placed;
        }
    }
    result
}
