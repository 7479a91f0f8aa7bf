//! Surface geometry derived once per surface-size event.

use crate::config::{
    BATTERY_X_DIVISOR,
    BATTERY_Y_DIVISOR,
    DAY_X_DIVISOR,
    DAY_Y_DIVISOR,
    HOUR_HAND_RATIO,
    MINUTE_HAND_RATIO,
    SECOND_HAND_RATIO,
};
use crate::transform::Point2;

/// Display geometry. Replaced wholesale on every resize, never mutated.
///
/// `center_x = width / 2`, `center_y = height / 2`,
/// `scale_factor = width / background_native_width`. `hand_scale` is the
/// factor that was applied to the hand rasters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayGeometry {
    pub width: u32,
    pub height: u32,
    pub center_x: f32,
    pub center_y: f32,
    pub scale_factor: f32,
    pub hand_scale: f32,
}

impl DisplayGeometry {
    pub fn new(width: u32, height: u32, scale_factor: f32, hand_scale: f32) -> Self {
        Self {
            width,
            height,
            center_x: width as f32 / 2.0,
            center_y: height as f32 / 2.0,
            scale_factor,
            hand_scale,
        }
    }

    /// The fixed point all hands rotate about.
    #[inline]
    pub const fn pivot(&self) -> Point2 { Point2::new(self.center_x, self.center_y) }

    /// Face radius used for vector hand lengths (half the width, as on a round panel).
    #[inline]
    pub fn radius(&self) -> f32 { self.width as f32 / 2.0 }

    /// Baseline-left anchor of the battery percentage text.
    pub fn battery_anchor(&self) -> Point2 {
        Point2::new(
            self.center_x - self.width as f32 / BATTERY_X_DIVISOR,
            self.center_y + self.height as f32 / BATTERY_Y_DIVISOR,
        )
    }

    /// Baseline-left anchor of the day-of-month text.
    pub fn day_anchor(&self) -> Point2 {
        Point2::new(
            self.center_x + self.width as f32 / DAY_X_DIVISOR,
            self.center_y + self.height as f32 / DAY_Y_DIVISOR,
        )
    }

    pub fn hour_hand_length(&self) -> f32 { HOUR_HAND_RATIO * self.radius() }

    pub fn minute_hand_length(&self) -> f32 { MINUTE_HAND_RATIO * self.radius() }

    pub fn second_hand_length(&self) -> f32 { SECOND_HAND_RATIO * self.radius() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_half_size() {
        let g = DisplayGeometry::new(390, 450, 1.0, 1.0);
        assert_eq!(g.center_x, 195.0);
        assert_eq!(g.center_y, 225.0);
        assert_eq!(g.pivot(), Point2::new(195.0, 225.0));
    }

    #[test]
    fn test_odd_sizes_keep_fractional_center() {
        let g = DisplayGeometry::new(241, 241, 1.0, 1.0);
        assert_eq!(g.center_x, 120.5, "Center must not be truncated to an integer");
    }

    #[test]
    fn test_overlay_anchors() {
        let g = DisplayGeometry::new(384, 384, 1.0, 1.0);
        assert_eq!(g.battery_anchor(), Point2::new(192.0 - 32.0, 192.0 + 48.0));
        assert_eq!(g.day_anchor(), Point2::new(192.0 + 120.0, 192.0 + 384.0 / 42.0));
    }

    #[test]
    fn test_vector_hand_lengths_ordered() {
        let g = DisplayGeometry::new(400, 400, 1.0, 1.0);
        assert_eq!(g.hour_hand_length(), 100.0);
        assert_eq!(g.minute_hand_length(), 140.0);
        assert_eq!(g.second_hand_length(), 180.0);
    }
}
