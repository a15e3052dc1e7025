//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::types::Size;

/// Errors that can occur when loading a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read layout config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse layout config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid layout config: {0}")]
    InvalidValue(String),
}

/// Configuration options for layout computation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Smallest pixel size of one grid cell
    pub min_cell: f64,

    /// Largest pixel size of one grid cell
    pub max_cell: f64,

    /// Space reserved for the pattern icon when scaling the grid
    pub icon_size: f64,

    /// Cells an open range (`N+`) contributes beyond its lower bound
    pub open_range_extent: u32,

    /// Lower bound on the gap between distributed siblings
    pub min_spacing: f64,

    /// Default size of an inner component
    pub inner_child_size: Size,

    /// Default size of an outer component
    pub outer_child_size: Size,

    /// Stage dimension divided by this gives the central parent rectangle
    pub inner_rect_ratio: f64,

    /// Stage size floor
    pub min_stage: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_cell: 4.0,
            max_cell: 50.0,
            icon_size: 100.0,
            open_range_extent: 10,
            min_spacing: 10.0,
            inner_child_size: Size::new(100.0, 70.0),
            outer_child_size: Size::new(100.0, 70.0),
            inner_rect_ratio: 1.5,
            min_stage: Size::new(400.0, 400.0),
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject cell bounds the grid scaler cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_cell.is_finite() || !self.max_cell.is_finite() {
            return Err(ConfigError::InvalidValue(
                "min_cell and max_cell must be finite".to_string(),
            ));
        }
        if self.min_cell > self.max_cell {
            return Err(ConfigError::InvalidValue(format!(
                "min_cell ({}) is larger than max_cell ({})",
                self.min_cell, self.max_cell
            )));
        }
        Ok(())
    }

    /// Set the bounds of the grid cell size
    pub fn with_cell_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_cell = min;
        self.max_cell = max;
        self
    }

    pub fn with_icon_size(mut self, size: f64) -> Self {
        self.icon_size = size;
        self
    }

    /// Set the minimum spacing between distributed siblings
    pub fn with_min_spacing(mut self, spacing: f64) -> Self {
        self.min_spacing = spacing;
        self
    }

    /// Set the default component sizes
    pub fn with_child_sizes(mut self, inner: Size, outer: Size) -> Self {
        self.inner_child_size = inner;
        self.outer_child_size = outer;
        self
    }
}
