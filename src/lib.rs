//! grammar2d - a grammar of nested rectangular patterns
//!
//! Patterns are named rectangular regions that contain other patterns
//! (`inner`), sit beside them (`outer`), and inherit from one another
//! (`extends`). This library flattens nested pattern sources into a
//! dictionary, validates the inheritance graph, and lays components out from
//! their edge constraints.
//!
//! # Example
//!
//! ```rust
//! use grammar2d::{load_str, SourceFormat};
//!
//! let dict = load_str(
//!     "page:\n  inner:\n    header: {location: {top: 0}}\nheader: {}\n",
//!     SourceFormat::Yaml,
//! )
//! .unwrap();
//! assert_eq!(dict.len(), 2);
//! ```

pub mod error;
pub mod layout;
pub mod lint;
pub mod location;
pub mod pattern;
pub mod source;

pub use error::{GrammarError, LocationError};
pub use layout::{layout_pattern, BoundingBox, ConfigError, LayoutConfig, PatternLayout, Size};
pub use location::{LocationSpec, OffsetRange, Side};
pub use pattern::{
    extract_patterns, ComponentRef, Pattern, PatternDictionary, PatternKind, Placement,
};
pub use source::Node;

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading a pattern source
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported source format '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Textual notations a pattern source can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Toml,
}

impl SourceFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(SourceFormat::Yaml),
            "toml" => Ok(SourceFormat::Toml),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Parse source text into a [`Node`] tree without extracting it
pub fn parse_source(text: &str, format: SourceFormat) -> Result<Node, LoadError> {
    let node = match format {
        SourceFormat::Yaml => serde_yaml::from_str(text)?,
        SourceFormat::Toml => toml::from_str(text)?,
    };
    Ok(node)
}

/// Parse and extract a pattern source
pub fn load_str(text: &str, format: SourceFormat) -> Result<PatternDictionary, LoadError> {
    let root = parse_source(text, format)?;
    Ok(extract_patterns(&root)?)
}

/// Read, parse and extract a pattern source file
pub fn load_file(path: impl AsRef<Path>) -> Result<PatternDictionary, LoadError> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    load_str(&text, format)
}
