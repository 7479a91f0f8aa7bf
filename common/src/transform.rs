//! 2-D affine transforms for rotating hands about the pivot.
//!
//! A transform maps a point in a hand's local space to screen space:
//!
//! ```text
//! | a  c  tx |   | x |
//! | b  d  ty | * | y |
//! | 0  0  1  |   | 1 |
//! ```
//!
//! Screen space has +y pointing down, so a positive angle rotates clockwise on
//! screen, matching the direction the hands travel.
//!
//! Composition follows canvas semantics: `m.then(&n)` is `m * n`, i.e. `n` is
//! applied in the already-transformed frame of `m`. That is what lets the
//! compositor draw the minute hand by rotating the hour hand's frame by the
//! delta between the two angles.

use micromath::F32Ext;

/// A point in floating-point screen or local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }
}

/// Affine transform (2x2 linear part plus translation).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine2 {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Pure translation.
    #[cfg(test)]
    pub const fn translation(dx: f32, dy: f32) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `deg` (clockwise on screen) about `pivot`.
    pub fn rotation_about(pivot: Point2, deg: f32) -> Self {
        let rad = deg.to_radians();
        let (sin, cos) = (F32Ext::sin(rad), F32Ext::cos(rad));
        // T(pivot) * R * T(-pivot)
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: pivot.x - cos * pivot.x + sin * pivot.y,
            ty: pivot.y - sin * pivot.x - cos * pivot.y,
        }
    }

    /// Compose: apply `next` inside this transform's frame (`self * next`).
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            a: self.a * next.a + self.c * next.b,
            b: self.b * next.a + self.d * next.b,
            c: self.a * next.c + self.c * next.d,
            d: self.b * next.c + self.d * next.d,
            tx: self.a * next.tx + self.c * next.ty + self.tx,
            ty: self.b * next.tx + self.d * next.ty + self.ty,
        }
    }

    /// Rotate by an additional `delta_deg` about `pivot`, on top of this frame.
    #[must_use]
    pub fn then_rotate_about(&self, pivot: Point2, delta_deg: f32) -> Self {
        self.then(&Self::rotation_about(pivot, delta_deg))
    }

    /// Map a local point to screen space.
    #[inline]
    pub fn apply(&self, p: Point2) -> Point2 {
        Point2 {
            x: self.a * p.x + self.c * p.y + self.tx,
            y: self.b * p.x + self.d * p.y + self.ty,
        }
    }

    /// Inverse transform, or `None` if the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if F32Ext::abs(det) < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Some(Self {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }

    /// Screen-space bounding box `(min, max)` of a local rectangle.
    pub fn bounds_of(&self, origin: Point2, width: f32, height: f32) -> (Point2, Point2) {
        let corners = [
            self.apply(origin),
            self.apply(Point2::new(origin.x + width, origin.y)),
            self.apply(Point2::new(origin.x, origin.y + height)),
            self.apply(Point2::new(origin.x + width, origin.y + height)),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for p in &corners[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}

impl Default for Affine2 {
    fn default() -> Self { Self::IDENTITY }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// micromath trig is approximate; half a pixel is what a raster can resolve.
    const EPS: f32 = 0.5;

    fn assert_close(p: Point2, x: f32, y: f32) {
        assert!(
            (p.x - x).abs() < EPS && (p.y - y).abs() < EPS,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    const PIVOT: Point2 = Point2::new(100.0, 100.0);
    const TWELVE: Point2 = Point2::new(100.0, 20.0);

    #[test]
    fn test_quarter_turn_is_clockwise() {
        let r = Affine2::rotation_about(PIVOT, 90.0);
        assert_close(r.apply(TWELVE), 180.0, 100.0);
    }

    #[test]
    fn test_pivot_is_fixed_point() {
        for deg in [0.0, 33.0, 90.0, 187.5, 359.0] {
            let r = Affine2::rotation_about(PIVOT, deg);
            assert_close(r.apply(PIVOT), PIVOT.x, PIVOT.y);
        }
    }

    #[test]
    fn test_delta_composition_matches_absolute() {
        let hour = 195.0;
        let minute = 180.0;
        let second = 42.0;

        let hour_frame = Affine2::rotation_about(PIVOT, hour);
        let minute_frame = hour_frame.then_rotate_about(PIVOT, minute - hour);
        let second_frame = minute_frame.then_rotate_about(PIVOT, second - minute);

        for (frame, deg) in [(minute_frame, minute), (second_frame, second)] {
            let absolute = Affine2::rotation_about(PIVOT, deg);
            let composed = frame.apply(TWELVE);
            let expected = absolute.apply(TWELVE);
            assert_close(composed, expected.x, expected.y);
        }
    }

    #[test]
    fn test_absolute_on_top_of_frame_would_double_rotate() {
        // Guard against regressions that pass the absolute angle instead of the delta
        let hour_frame = Affine2::rotation_about(PIVOT, 90.0);
        let wrong = hour_frame.then_rotate_about(PIVOT, 90.0);
        let p = wrong.apply(TWELVE);
        assert_close(p, 100.0, 180.0);
    }

    #[test]
    fn test_translation_then_rotation() {
        let m = Affine2::rotation_about(PIVOT, 180.0).then(&Affine2::translation(0.0, -10.0));
        assert_close(m.apply(PIVOT), 100.0, 110.0);
    }

    #[test]
    fn test_inverse_round_trips() {
        let m = Affine2::rotation_about(PIVOT, 123.0).then(&Affine2::translation(-7.0, 3.0));
        let inv = m.inverse().unwrap();
        let p = Point2::new(37.0, -12.0);
        let back = inv.apply(m.apply(p));
        assert_close(back, p.x, p.y);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let m = Affine2 {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            tx: 1.0,
            ty: 1.0,
        };
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_bounds_of_rotated_square() {
        let r = Affine2::rotation_about(Point2::new(10.0, 10.0), 45.0);
        let (min, max) = r.bounds_of(Point2::new(0.0, 0.0), 20.0, 20.0);
        let half_diag = 10.0 * core::f32::consts::SQRT_2;
        assert_close(min, 10.0 - half_diag, 10.0 - half_diag);
        assert_close(max, 10.0 + half_diag, 10.0 + half_diag);
    }
}
