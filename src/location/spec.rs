//! Location constraints: per-side offset ranges and their normalisation

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::LocationError;

use super::grammar::parse_offset_strict;

/// One edge of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Side {
    /// All sides in canonical (clockwise from top) order
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }

    pub fn from_name(name: &str) -> Option<Side> {
        match name {
            "top" => Some(Side::Top),
            "right" => Some(Side::Right),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            _ => None,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// The axis an offset on this side is measured along
    pub fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Horizontal,
            Side::Top | Side::Bottom => Axis::Vertical,
        }
    }

    /// Whether this is the leading (left/top) side of its axis
    pub fn is_leading(self) -> bool {
        matches!(self, Side::Left | Side::Top)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Offset from an edge in grid cells. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OffsetRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl OffsetRange {
    /// Exactly `n` cells
    pub fn exact(n: u32) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// `n` cells or more
    pub fn at_least(n: u32) -> Self {
        Self { min: n, max: None }
    }

    /// Between `min` and `max` cells inclusive
    pub fn between(min: u32, max: u32) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn is_open(&self) -> bool {
        self.max.is_none()
    }

    /// Touching the edge: the lower bound is zero
    pub fn is_flush(&self) -> bool {
        self.min == 0
    }

    /// Largest offset this range asks for; open ranges reach `min + open_extent`.
    pub fn extent(&self, open_extent: u32) -> u32 {
        match self.max {
            Some(max) => max,
            None => self.min.saturating_add(open_extent),
        }
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

impl FromStr for OffsetRange {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_offset_strict(s)
    }
}

/// Parse an offset token, recovering to `{0, 0}` when it is malformed.
pub fn parse_offset(token: &str) -> OffsetRange {
    match parse_offset_strict(token) {
        Ok(range) => range,
        Err(err) => {
            log::warn!("{}; treating offset as 0", err);
            OffsetRange::default()
        }
    }
}

/// Raw location keys as they arrive from the source (`left`, `margin-left`, ...)
pub type RawLocation = BTreeMap<String, String>;

/// Per-side constraints of a child relative to its parent.
///
/// A missing side is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocationSpec {
    pub top: Option<OffsetRange>,
    pub right: Option<OffsetRange>,
    pub bottom: Option<OffsetRange>,
    pub left: Option<OffsetRange>,
}

impl LocationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, side: Side, range: OffsetRange) -> Self {
        self.set(side, range);
        self
    }

    pub fn get(&self, side: Side) -> Option<OffsetRange> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    fn slot(&mut self, side: Side) -> &mut Option<OffsetRange> {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }

    pub fn set(&mut self, side: Side, range: OffsetRange) {
        *self.slot(side) = Some(range);
    }

    pub fn clear(&mut self, side: Side) {
        *self.slot(side) = None;
    }

    pub fn is_empty(&self) -> bool {
        Side::ALL.iter().all(|s| self.get(*s).is_none())
    }

    /// Present sides in canonical order
    pub fn sides(&self) -> impl Iterator<Item = (Side, OffsetRange)> + '_ {
        Side::ALL
            .iter()
            .filter_map(move |s| self.get(*s).map(|r| (*s, r)))
    }

    /// Present and flush with the parent edge
    pub fn is_pinned(&self, side: Side) -> bool {
        self.get(side).is_some_and(|r| r.is_flush())
    }

    /// Token shown for a side in the editor; unconstrained sides read `0+`.
    pub fn display_token(&self, side: Side) -> String {
        match self.get(side) {
            Some(range) => range.to_string(),
            None => OffsetRange::at_least(0).to_string(),
        }
    }

    /// Resolve raw keys into one value per side.
    ///
    /// Per side the bare key is read first, then `margin-<side>` overrides it,
    /// then `padding-<side>` overrides both.
    pub fn from_raw(raw: &RawLocation) -> Self {
        let mut spec = LocationSpec::new();
        for side in Side::ALL {
            let candidates = [
                side.name().to_string(),
                format!("margin-{}", side.name()),
                format!("padding-{}", side.name()),
            ];
            let winner = candidates.iter().filter_map(|k| raw.get(k)).last();
            if let Some(token) = winner {
                spec.set(side, parse_offset(token));
            }
        }

        for key in raw.keys() {
            if !is_location_key(key) {
                log::debug!("ignoring unknown location key '{}'", key);
            }
        }
        spec
    }

    /// Canonical raw form: bare side keys with rendered tokens
    pub fn to_raw(&self) -> RawLocation {
        self.sides()
            .map(|(side, range)| (side.name().to_string(), range.to_string()))
            .collect()
    }
}

/// Whether `key` is one of the twelve recognised location spellings
pub fn is_location_key(key: &str) -> bool {
    let bare = key
        .strip_prefix("margin-")
        .or_else(|| key.strip_prefix("padding-"))
        .unwrap_or(key);
    Side::from_name(bare).is_some()
}
