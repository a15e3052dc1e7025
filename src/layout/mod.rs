//! Layout engine for positioning pattern components
//!
//! Location offsets are in grid cells; this module turns them into pixel
//! bounds against a parent rectangle, resolves interactive drags against
//! sibling collisions, and spaces siblings that share an edge.

pub mod config;
pub mod distribute;
pub mod drag;
pub mod engine;
pub mod fixed;
pub mod resolve;
pub mod scale;
pub mod stage;
pub mod types;

pub use config::{ConfigError, LayoutConfig};
pub use distribute::{anchor_side, distribute, Placed};
pub use drag::{check_collision, DragConstraints, DragEnv, DragGesture, DragMove};
pub use engine::{layout_pattern, ComponentLayout, PatternLayout};
pub use fixed::{fixed_sides, FixedSides};
pub use resolve::{primary_side, resolve, LayoutFrame};
pub use scale::{cell_size, GridCapacity};
pub use stage::{constrain_to_stage, inner_rect, stage_bounds};
pub use types::*;
