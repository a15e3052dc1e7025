//! Location constraint language
//!
//! A location pins a child pattern to one or more edges of its parent. Each
//! side carries an offset token measured in grid cells:
//!
//! ```text
//! left: 0        flush with the left edge
//! top: 2+        two cells or more from the top
//! right: 0..3    between zero and three cells from the right
//! bottom: 1..*   at least one cell from the bottom
//! ```
//!
//! Sides may also be spelled `margin-<side>` or `padding-<side>`; see
//! [`LocationSpec::from_raw`] for the precedence rules.

mod grammar;
pub mod lexer;
mod spec;

pub use grammar::parse_offset_strict;
pub use spec::{is_location_key, parse_offset, Axis, LocationSpec, OffsetRange, RawLocation, Side};
