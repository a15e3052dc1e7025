//! Pattern grammar
//!
//! A pattern is a named rectangular region that may contain `inner`
//! components, have `outer` components attached beside its edges, and
//! `extends` other patterns. Sources nest definitions freely; extraction
//! flattens them into a [`PatternDictionary`] keyed by unique id.

mod extract;
mod inheritance;
mod model;

pub use extract::{extract_patterns, normalize_extends, normalize_location, raw_location};
pub use inheritance::{validate_dictionary, validate_extends, ExtendsGraph};
pub use model::{
    ComponentRef, DanglingReference, Pattern, PatternDictionary, PatternKind, Placement,
};
