//! Grid scaling: how many pixels one location cell is worth inside a parent

use crate::location::{LocationSpec, Side};

use super::config::LayoutConfig;
use super::types::Size;

/// Cells needed on each axis to honour every offset declared in one parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCapacity {
    pub horizontal: u32,
    pub vertical: u32,
}

impl GridCapacity {
    /// Largest resolved offset per axis across `locations`.
    ///
    /// Bounded ranges count their upper bound, open ranges `min + open_extent`.
    pub fn of<'a>(locations: impl IntoIterator<Item = &'a LocationSpec>, open_extent: u32) -> Self {
        let mut per_side = [0u32; 4];
        for location in locations {
            for (side, range) in location.sides() {
                let slot = &mut per_side[side_index(side)];
                *slot = (*slot).max(range.extent(open_extent));
            }
        }
        Self {
            horizontal: per_side[side_index(Side::Left)].max(per_side[side_index(Side::Right)]),
            vertical: per_side[side_index(Side::Top)].max(per_side[side_index(Side::Bottom)]),
        }
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Top => 0,
        Side::Right => 1,
        Side::Bottom => 2,
        Side::Left => 3,
    }
}

/// Pixel size of one square cell.
///
/// Each axis yields `(available - icon) / capacity`; the smaller wins and is
/// clamped to the configured bounds. An axis with no offsets places no limit.
pub fn cell_size(capacity: GridCapacity, available: Size, config: &LayoutConfig) -> f64 {
    let per_axis = |span: f64, cells: u32| {
        if cells == 0 {
            f64::INFINITY
        } else {
            (span - config.icon_size) / f64::from(cells)
        }
    };
    let x = per_axis(available.width, capacity.horizontal);
    let y = per_axis(available.height, capacity.vertical);

    let raw = x.min(y);
    // Inverted bounds resolve to max_cell
    let cell = if raw.is_finite() {
        raw.max(config.min_cell).min(config.max_cell)
    } else {
        config.max_cell
    };
    log::trace!("grid {:?} in {:?}: cell {}", capacity, available, cell);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::OffsetRange;

    #[test]
    fn test_capacity_takes_max_per_axis() {
        let locations = [
            LocationSpec::new()
                .with(Side::Left, OffsetRange::exact(2))
                .with(Side::Top, OffsetRange::between(0, 3)),
            LocationSpec::new()
                .with(Side::Right, OffsetRange::exact(5))
                .with(Side::Bottom, OffsetRange::at_least(1)),
        ];
        let capacity = GridCapacity::of(&locations, 10);
        assert_eq!(
            capacity,
            GridCapacity {
                horizontal: 5,
                vertical: 11
            }
        );
    }

    #[test]
    fn test_smaller_axis_wins() {
        let config = LayoutConfig::default();
        let capacity = GridCapacity {
            horizontal: 10,
            vertical: 20,
        };
        // x: (400 - 100) / 10 = 30, y: (400 - 100) / 20 = 15
        assert_eq!(cell_size(capacity, Size::new(400.0, 400.0), &config), 15.0);
    }

    #[test]
    fn test_cell_clamped() {
        let config = LayoutConfig::default();
        let tiny = GridCapacity {
            horizontal: 1,
            vertical: 0,
        };
        assert_eq!(cell_size(tiny, Size::new(1000.0, 1000.0), &config), 50.0);

        let crowded = GridCapacity {
            horizontal: 500,
            vertical: 0,
        };
        assert_eq!(cell_size(crowded, Size::new(300.0, 300.0), &config), 4.0);
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let config = LayoutConfig::new().with_cell_bounds(60.0, 50.0);
        let capacity = GridCapacity {
            horizontal: 10,
            vertical: 0,
        };
        assert_eq!(cell_size(capacity, Size::new(400.0, 400.0), &config), 50.0);
    }

    #[test]
    fn test_no_offsets_uses_max_cell() {
        let config = LayoutConfig::default();
        let cell = cell_size(GridCapacity::default(), Size::new(200.0, 200.0), &config);
        assert_eq!(cell, config.max_cell);
    }
}
