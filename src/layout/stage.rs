//! Stage geometry: the drawing surface and the parent rectangle inside it

use super::config::LayoutConfig;
use super::types::{BoundingBox, Size};

/// Stage rectangle at the origin, never smaller than `config.min_stage`
pub fn stage_bounds(requested: Size, config: &LayoutConfig) -> BoundingBox {
    BoundingBox::new(
        0.0,
        0.0,
        requested.width.max(config.min_stage.width),
        requested.height.max(config.min_stage.height),
    )
}

/// Parent rectangle: the stage scaled down by `ratio`, centred in it
pub fn inner_rect(stage: &BoundingBox, ratio: f64) -> BoundingBox {
    let ratio = if ratio > 0.0 { ratio } else { 1.0 };
    let width = stage.width / ratio;
    let height = stage.height / ratio;
    BoundingBox::new(
        stage.x + (stage.width - width) / 2.0,
        stage.y + (stage.height - height) / 2.0,
        width,
        height,
    )
}

/// Keep a box on the stage
pub fn constrain_to_stage(bounds: &BoundingBox, stage: &BoundingBox) -> BoundingBox {
    bounds.clamped_within(stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_floor() {
        let config = LayoutConfig::default();
        let stage = stage_bounds(Size::new(300.0, 900.0), &config);
        assert_eq!(stage, BoundingBox::new(0.0, 0.0, 400.0, 900.0));
    }

    #[test]
    fn test_inner_rect_centered() {
        let stage = BoundingBox::new(0.0, 0.0, 600.0, 450.0);
        assert_eq!(
            inner_rect(&stage, 1.5),
            BoundingBox::new(100.0, 75.0, 400.0, 300.0)
        );
    }

    #[test]
    fn test_constrain_to_stage() {
        let stage = BoundingBox::new(0.0, 0.0, 400.0, 400.0);
        let b = BoundingBox::new(-20.0, 380.0, 50.0, 50.0);
        assert_eq!(
            constrain_to_stage(&b, &stage),
            BoundingBox::new(0.0, 350.0, 50.0, 50.0)
        );
    }
}
