//! Rasterizes frames onto an `embedded-graphics` draw target.
//!
//! [`RasterSink`] is the only place where the engine's primitives become
//! pixels. It works on anything implementing `DrawTarget<Color = Rgb565>`: the
//! desktop simulator window, a panel driver, or an in-memory framebuffer in
//! tests.
//!
//! # Transformed Primitives
//!
//! Rotated blits and rounded rectangles use inverse mapping: the transformed
//! bounding box is walked in screen space and every pixel center is mapped
//! back into the primitive's local space, where the texel (or the rounded-rect
//! coverage test) decides whether the pixel is drawn. This leaves no holes,
//! whatever the angle.
//!
//! There is no blending. Texels below [`ALPHA_THRESHOLD`] are skipped and the
//! rest are drawn opaque.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use micromath::F32Ext;

use crate::assets::Raster;
use crate::colors;
use crate::compositor::{DrawCommand, Frame};
use crate::config::ALPHA_THRESHOLD;
use crate::ports::DisplaySink;
use crate::transform::{Affine2, Point2};

/// [`DisplaySink`] that draws onto `D`.
pub struct RasterSink<D> {
    target: D,
}

impl<D> RasterSink<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub const fn new(target: D) -> Self { Self { target } }

    #[inline]
    pub const fn target(&self) -> &D { &self.target }

    #[inline]
    pub fn target_mut(&mut self) -> &mut D { &mut self.target }

    pub fn into_inner(self) -> D { self.target }

    fn blit(&mut self, raster: &Raster, transform: &Affine2, origin: Point2) {
        if *transform == Affine2::IDENTITY {
            self.blit_untransformed(raster, origin);
            return;
        }
        let Some(inverse) = transform.inverse() else {
            return;
        };
        let (min, max) = transform.bounds_of(origin, raster.width() as f32, raster.height() as f32);
        let pixels = screen_span(&self.target, min, max).filter_map(|p| {
            let local = inverse.apply(Point2::new(p.x as f32 + 0.5, p.y as f32 + 0.5));
            let lx = F32Ext::floor(local.x - origin.x);
            let ly = F32Ext::floor(local.y - origin.y);
            if lx < 0.0 || ly < 0.0 {
                return None;
            }
            let texel = raster.texel(lx as u32, ly as u32)?;
            (texel.alpha >= ALPHA_THRESHOLD).then_some(Pixel(p, texel.color))
        });
        self.target.draw_iter(pixels).ok();
    }

    fn blit_untransformed(&mut self, raster: &Raster, origin: Point2) {
        let ox = F32Ext::round(origin.x) as i32;
        let oy = F32Ext::round(origin.y) as i32;
        let (width, height) = raster.size();
        let pixels = (0..height).flat_map(move |y| (0..width).map(move |x| (x, y))).filter_map(|(x, y)| {
            let texel = raster.texel(x, y)?;
            (texel.alpha >= ALPHA_THRESHOLD).then_some(Pixel(Point::new(ox + x as i32, oy + y as i32), texel.color))
        });
        self.target.draw_iter(pixels).ok();
    }

    #[allow(clippy::too_many_arguments)]
    fn round_rect(
        &mut self,
        transform: &Affine2,
        origin: Point2,
        width: f32,
        height: f32,
        radius: f32,
        color: Rgb565,
    ) {
        let Some(inverse) = transform.inverse() else {
            return;
        };
        let (min, max) = transform.bounds_of(origin, width, height);
        let pixels = screen_span(&self.target, min, max).filter_map(|p| {
            let local = inverse.apply(Point2::new(p.x as f32 + 0.5, p.y as f32 + 0.5));
            let inside = in_round_rect(
                Point2::new(local.x - origin.x, local.y - origin.y),
                width,
                height,
                radius,
            );
            inside.then_some(Pixel(p, color))
        });
        self.target.draw_iter(pixels).ok();
    }

    fn text(&mut self, text: &str, position: Point2, color: Rgb565) {
        let style = MonoTextStyle::new(&FONT_10X20, color);
        let anchor = Point::new(F32Ext::round(position.x) as i32, F32Ext::round(position.y) as i32);
        Text::with_baseline(text, anchor, style, Baseline::Alphabetic)
            .draw(&mut self.target)
            .ok();
    }
}

impl<D> DisplaySink for RasterSink<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn submit(&mut self, frame: &Frame) {
        // Letterbox for surfaces taller than the background
        self.target.clear(colors::BLACK).ok();

        for command in frame.commands() {
            match command {
                DrawCommand::Blit {
                    raster,
                    transform,
                    origin,
                    ..
                } => self.blit(raster, transform, *origin),
                DrawCommand::RoundRect {
                    transform,
                    origin,
                    width,
                    height,
                    radius,
                    color,
                    ..
                } => self.round_rect(transform, *origin, *width, *height, *radius, *color),
                DrawCommand::Text {
                    text,
                    position,
                    color,
                    ..
                } => self.text(text.as_str(), *position, *color),
            }
        }
    }
}

/// Every pixel in the screen box `[min, max]`, clipped to the target.
fn screen_span<D: Dimensions>(target: &D, min: Point2, max: Point2) -> impl Iterator<Item = Point> + use<D> {
    let area = target.bounding_box();
    let (left, top) = (area.top_left.x, area.top_left.y);
    let right = left + area.size.width as i32;
    let bottom = top + area.size.height as i32;

    let x0 = (F32Ext::floor(min.x) as i32).max(left);
    let y0 = (F32Ext::floor(min.y) as i32).max(top);
    let x1 = (F32Ext::ceil(max.x) as i32).min(right);
    let y1 = (F32Ext::ceil(max.y) as i32).min(bottom);

    (y0..y1).flat_map(move |y| (x0..x1).map(move |x| Point::new(x, y)))
}

/// Coverage test for a `width` x `height` rectangle at the local origin with
/// corners rounded to `radius`.
fn in_round_rect(p: Point2, width: f32, height: f32, radius: f32) -> bool {
    if p.x < 0.0 || p.y < 0.0 || p.x >= width || p.y >= height {
        return false;
    }
    let r = radius.min(width / 2.0).min(height / 2.0);
    let cx = p.x.clamp(r, width - r);
    let cy = p.y.clamp(r, height - r);
    let dx = p.x - cx;
    let dy = p.y - cy;
    dx * dx + dy * dy <= r * r
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;
    use crate::angles::angles;
    use crate::assets::{HandScaling, RawAssetSet, ScaledAssetSet, Texel};
    use crate::compositor::{FrameCompositor, HandStyle, Layer};
    use crate::geometry::DisplayGeometry;
    use crate::modes::PowerMode;
    use crate::overlay::OverlayData;
    use crate::timezone::Timezone;

    /// In-memory Rgb565 framebuffer.
    struct FrameBuf {
        width: u32,
        height: u32,
        pixels: std::vec::Vec<Rgb565>,
    }

    impl FrameBuf {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: std::vec![Rgb565::MAGENTA; (width * height) as usize],
            }
        }

        fn get(&self, x: u32, y: u32) -> Rgb565 { self.pixels[(y * self.width + x) as usize] }

        fn count(&self, color: Rgb565) -> usize { self.pixels.iter().filter(|&&c| c == color).count() }
    }

    impl OriginDimensions for FrameBuf {
        fn size(&self) -> Size { Size::new(self.width, self.height) }
    }

    impl DrawTarget for FrameBuf {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, color) in pixels {
                if p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height {
                    self.pixels[(p.y as u32 * self.width + p.x as u32) as usize] = color;
                }
            }
            Ok(())
        }
    }

    fn solid(width: u32, height: u32, color: Rgb565) -> Raster { Raster::from_fn(width, height, |_, _| Texel::opaque(color)) }

    fn frame_for(style: HandStyle, mode: PowerMode, now: i64, overlay: &OverlayData) -> (Frame, DisplayGeometry) {
        let raw = RawAssetSet {
            background: solid(64, 64, colors::NAVY),
            hour_hand: solid(4, 30, Rgb565::GREEN),
            minute_hand: solid(4, 44, Rgb565::BLUE),
            second_hand: solid(2, 56, Rgb565::RED),
        };
        let assets = ScaledAssetSet::build(&raw, 64, HandScaling::default()).unwrap();
        let g = DisplayGeometry::new(64, 64, assets.scale_factor, assets.hand_scale);
        let frame = FrameCompositor::new(style)
            .compose(&g, &assets, angles(now, &Timezone::utc()), mode, overlay)
            .unwrap();
        (frame, g)
    }

    // -------------------------------------------------------------------------
    // Blits
    // -------------------------------------------------------------------------

    #[test]
    fn test_background_covers_surface() {
        let (frame, _) = frame_for(HandStyle::Bitmap, PowerMode::Ambient, 0, &OverlayData::default());
        let mut sink = RasterSink::new(FrameBuf::new(64, 64));
        sink.submit(&frame);
        let fb = sink.into_inner();
        assert_eq!(fb.count(Rgb565::MAGENTA), 0, "Every pixel must be drawn");
        assert_eq!(fb.get(0, 0), colors::NAVY);
    }

    #[test]
    fn test_transparent_texels_are_skipped() {
        let mut sink = RasterSink::new(FrameBuf::new(4, 1));
        let raster = Raster::from_fn(4, 1, |x, _| {
            if x % 2 == 0 {
                Texel::opaque(Rgb565::WHITE)
            } else {
                Texel {
                    color: Rgb565::RED,
                    alpha: ALPHA_THRESHOLD - 1,
                }
            }
        });
        sink.blit(&raster, &Affine2::IDENTITY, Point2::new(0.0, 0.0));
        let fb = sink.into_inner();
        assert_eq!(fb.get(0, 0), Rgb565::WHITE);
        assert_eq!(fb.get(1, 0), Rgb565::MAGENTA, "Below-threshold texel must not be drawn");
        assert_eq!(fb.count(Rgb565::RED), 0);
    }

    #[test]
    fn test_midnight_hands_point_up() {
        let (frame, _) = frame_for(HandStyle::Bitmap, PowerMode::Interactive, 0, &OverlayData::default());
        let mut sink = RasterSink::new(FrameBuf::new(64, 64));
        sink.submit(&frame);
        let fb = sink.into_inner();
        // Second hand is drawn last and spans y = 4..60 on x = 31..33
        assert_eq!(fb.get(32, 8), Rgb565::RED);
        assert_eq!(fb.get(32, 56), Rgb565::RED);
        assert_eq!(fb.get(10, 32), colors::NAVY);
    }

    #[test]
    fn test_rotated_blit_has_no_holes() {
        // 3 o'clock in ambient: minute hand at 0, hour hand at 90 degrees
        let three = 3 * 3600 * 1000;
        let (frame, _) = frame_for(HandStyle::Bitmap, PowerMode::Ambient, three, &OverlayData::default());
        let mut sink = RasterSink::new(FrameBuf::new(64, 64));
        sink.submit(&frame);
        let fb = sink.into_inner();
        // Hour hand is 30 long, pivot at 32: horizontal span x = 17..47 on y = 30..34
        for x in 36..46 {
            assert_eq!(fb.get(x, 31), Rgb565::GREEN, "gap at x = {x}");
        }
        assert!(frame.find(Layer::SecondHand).is_none());
    }

    // -------------------------------------------------------------------------
    // Vector Hands and Text
    // -------------------------------------------------------------------------

    #[test]
    fn test_vector_hands_are_filled() {
        let (frame, g) = frame_for(HandStyle::Vector, PowerMode::Interactive, 0, &OverlayData::default());
        let mut sink = RasterSink::new(FrameBuf::new(64, 64));
        sink.submit(&frame);
        let fb = sink.into_inner();
        // Second hand is red and 0.9 * 32 long, straight up at midnight
        let tip_y = (g.center_y - g.second_hand_length()) as u32;
        assert_eq!(fb.get(32, tip_y + 3), colors::RED);
        assert_eq!(fb.get(32, 20), colors::RED);
    }

    #[test]
    fn test_round_rect_corners_are_cut() {
        assert!(in_round_rect(Point2::new(4.0, 0.5), 8.0, 20.0, 4.0));
        assert!(!in_round_rect(Point2::new(0.1, 0.1), 8.0, 20.0, 4.0));
        assert!(in_round_rect(Point2::new(0.5, 10.0), 8.0, 20.0, 4.0));
        assert!(!in_round_rect(Point2::new(8.5, 10.0), 8.0, 20.0, 4.0));
    }

    #[test]
    fn test_overlay_text_is_drawn() {
        let overlay = OverlayData {
            battery_percent: Some(50),
            day_of_month: None,
        };
        let mut sink = RasterSink::new(FrameBuf::new(64, 64));
        let (frame, _) = frame_for(HandStyle::Bitmap, PowerMode::Ambient, 0, &overlay);
        sink.submit(&frame);
        let with_text = sink.target().count(colors::WHITE);

        let (frame, _) = frame_for(HandStyle::Bitmap, PowerMode::Ambient, 0, &OverlayData::default());
        sink.submit(&frame);
        assert!(with_text > sink.target().count(colors::WHITE), "Battery text should add white pixels");
    }
}
