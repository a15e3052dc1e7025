//! Full layout of one pattern's components on a stage

use std::collections::BTreeMap;

use crate::error::GrammarError;
use crate::pattern::{DanglingReference, PatternDictionary, Placement};

use super::config::LayoutConfig;
use super::distribute::{distribute, Placed};
use super::fixed::{fixed_sides, FixedSides};
use super::resolve::{resolve, LayoutFrame};
use super::scale::{cell_size, GridCapacity};
use super::stage::{constrain_to_stage, inner_rect, stage_bounds};
use super::types::{BoundingBox, Size};

/// A positioned component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentLayout {
    pub name: String,
    pub placement: Placement,
    /// Id of the referenced pattern
    pub pattern: String,
    pub bounds: BoundingBox,
    pub fixed: FixedSides,
}

/// The computed layout of a pattern and its direct components
#[derive(Debug, Clone, PartialEq)]
pub struct PatternLayout {
    pub pattern: String,
    pub stage: BoundingBox,
    /// Bounds of the pattern itself
    pub parent: BoundingBox,
    /// Pixels per location cell
    pub cell: f64,
    /// Components in inner-then-outer, name order
    pub components: Vec<ComponentLayout>,
    /// Components whose pattern is not in the dictionary; not laid out
    pub missing: Vec<DanglingReference>,
}

impl PatternLayout {
    pub fn get(&self, placement: Placement, name: &str) -> Option<&ComponentLayout> {
        self.components
            .iter()
            .find(|c| c.placement == placement && c.name == name)
    }

    /// Bounds of every component in one placement map, keyed by name
    pub fn siblings(&self, placement: Placement) -> BTreeMap<String, BoundingBox> {
        self.components
            .iter()
            .filter(|c| c.placement == placement)
            .map(|c| (c.name.clone(), c.bounds))
            .collect()
    }

    /// Frame the components were resolved against
    pub fn frame(&self) -> LayoutFrame {
        LayoutFrame::new(self.parent, self.stage, self.cell)
    }
}

/// Lay out the components of pattern `id` on a stage of the requested size.
///
/// The pattern occupies the central stage rectangle. Every component offset
/// feeds the grid scaler; components are then resolved, distributed along
/// shared edges, and kept on the stage. Components referencing missing
/// patterns are reported in [`PatternLayout::missing`].
pub fn layout_pattern(
    dict: &PatternDictionary,
    id: &str,
    stage: Size,
    config: &LayoutConfig,
) -> Result<PatternLayout, GrammarError> {
    let pattern = dict.get(id).ok_or_else(|| GrammarError::unknown_pattern(id))?;

    let stage = stage_bounds(stage, config);
    let parent = inner_rect(&stage, config.inner_rect_ratio);
    let capacity = GridCapacity::of(
        pattern.all_components().map(|(_, _, cref)| &cref.location),
        config.open_range_extent,
    );
    let cell = cell_size(capacity, parent.size(), config);
    let frame = LayoutFrame::new(parent, stage, cell);

    let mut missing = Vec::new();
    let mut resolved = Vec::new();
    for (placement, name, cref) in pattern.all_components() {
        if dict.resolve_component(cref).is_none() {
            log::debug!(
                "{}.{} references missing pattern '{}'",
                id,
                name,
                cref.pattern
            );
            missing.push(DanglingReference {
                parent: id.to_string(),
                placement,
                component: name.clone(),
                target: cref.pattern.clone(),
            });
            continue;
        }
        let size = match placement {
            Placement::Inner => config.inner_child_size,
            Placement::Outer => config.outer_child_size,
        };
        let bounds = resolve(&cref.location, &frame, size, placement);
        resolved.push((placement, name, cref, bounds));
    }

    let placed: Vec<Placed<'_>> = resolved
        .iter()
        .map(|(placement, _, cref, bounds)| Placed {
            location: &cref.location,
            mode: *placement,
            bounds: *bounds,
        })
        .collect();
    let distributed = distribute(&placed, &parent, config.min_spacing);

    let components = resolved
        .into_iter()
        .zip(distributed)
        .map(|((placement, name, cref, _), bounds)| ComponentLayout {
            name: name.clone(),
            placement,
            pattern: cref.pattern.clone(),
            bounds: constrain_to_stage(&bounds, &stage),
            fixed: fixed_sides(&cref.location),
        })
        .collect();

    Ok(PatternLayout {
        pattern: id.to_string(),
        stage,
        parent,
        cell,
        components,
        missing,
    })
}
