//! Frame compositor.
//!
//! Turns the current geometry, scaled assets, hand angles and power mode into
//! an ordered list of draw primitives. Nothing here touches pixels; the list
//! is handed to a [`DisplaySink`].
//!
//! # Draw Order
//!
//! Later primitives cover earlier ones:
//!
//! 1. Background, unrotated, at the surface origin
//! 2. Battery and day-of-month text (when available)
//! 3. Hour hand
//! 4. Minute hand
//! 5. Second hand (interactive mode only)
//!
//! # Hand Transforms
//!
//! Every hand primitive carries its own complete transform. The hour hand's
//! transform is a rotation about the pivot by the hour angle. The minute hand
//! reuses that frame and rotates it further by `minute - hour`, and the second
//! hand rotates the minute frame by `second - minute`. The composed rotation
//! is therefore the absolute angle for each hand, and no primitive depends on
//! state left behind by another.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::{String, Vec};
use micromath::F32Ext;

use crate::angles::ClockAngles;
use crate::assets::{Raster, ScaledAssetSet};
use crate::colors;
use crate::config::{HAND_END_CAP_RADIUS, OVERLAY_TEXT_LEN};
use crate::error::RenderError;
use crate::geometry::DisplayGeometry;
use crate::modes::PowerMode;
use crate::overlay::OverlayData;
use crate::ports::DisplaySink;
use crate::transform::{Affine2, Point2};

/// Most primitives a frame can hold: background, two overlays, three hands.
pub const MAX_COMMANDS: usize = 6;

/// Relative tolerance when comparing scale factors.
const SCALE_TOLERANCE: f32 = 1e-4;

// =============================================================================
// Primitive Types
// =============================================================================

/// Which part of the face a primitive belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Background,
    Overlay,
    HourHand,
    MinuteHand,
    SecondHand,
}

/// How the hands are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HandStyle {
    /// Rotated hand bitmaps from the asset set.
    #[default]
    Bitmap,
    /// Rounded bars sized from the face radius. Needs no hand assets.
    Vector,
}

/// Which overlay a text primitive shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayKind {
    Battery,
    Day,
}

/// One draw primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Draw `raster` with its top-left corner at `origin` in local space, then
    /// map through `transform`.
    Blit {
        layer: Layer,
        raster: Raster,
        transform: Affine2,
        origin: Point2,
    },
    /// Filled rounded rectangle in local space, mapped through `transform`.
    RoundRect {
        layer: Layer,
        transform: Affine2,
        origin: Point2,
        width: f32,
        height: f32,
        radius: f32,
        color: Rgb565,
    },
    /// Unrotated text with its baseline-left corner at `position`.
    Text {
        kind: OverlayKind,
        text: String<OVERLAY_TEXT_LEN>,
        position: Point2,
        color: Rgb565,
    },
}

impl DrawCommand {
    pub const fn layer(&self) -> Layer {
        match self {
            Self::Blit { layer, .. } | Self::RoundRect { layer, .. } => *layer,
            Self::Text { .. } => Layer::Overlay,
        }
    }

    /// The transform a hand or background primitive is drawn with.
    pub const fn transform(&self) -> Option<&Affine2> {
        match self {
            Self::Blit { transform, .. } | Self::RoundRect { transform, .. } => Some(transform),
            Self::Text { .. } => None,
        }
    }
}

/// The ordered primitive list for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    commands: Vec<DrawCommand, MAX_COMMANDS>,
}

impl Frame {
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    pub fn hand_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c.layer(), Layer::HourHand | Layer::MinuteHand | Layer::SecondHand))
            .count()
    }

    pub fn find(&self, layer: Layer) -> Option<&DrawCommand> { self.commands.iter().find(|c| c.layer() == layer) }

    fn push(&mut self, command: DrawCommand) {
        // Capacity covers every layer exactly once
        self.commands.push(command).ok();
    }
}

// =============================================================================
// Compositor
// =============================================================================

/// Builds frames. Stateless apart from the configured hand style.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCompositor {
    style: HandStyle,
}

impl FrameCompositor {
    pub const fn new(style: HandStyle) -> Self { Self { style } }

    /// Build the primitive list for one frame.
    ///
    /// Fails when `assets` were not built for `geometry`, which happens if a
    /// draw slips in between a resize and the matching rescale.
    pub fn compose(
        &self,
        geometry: &DisplayGeometry,
        assets: &ScaledAssetSet,
        angles: ClockAngles,
        mode: PowerMode,
        overlay: &OverlayData,
    ) -> Result<Frame, RenderError> {
        check_consistency(geometry, assets)?;

        let mut frame = Frame::default();
        frame.push(DrawCommand::Blit {
            layer: Layer::Background,
            raster: assets.background.clone(),
            transform: Affine2::IDENTITY,
            origin: Point2::new(0.0, 0.0),
        });

        if let Some(text) = overlay.battery_text() {
            frame.push(DrawCommand::Text {
                kind: OverlayKind::Battery,
                text,
                position: geometry.battery_anchor(),
                color: colors::WHITE,
            });
        }
        if let Some(text) = overlay.day_text() {
            frame.push(DrawCommand::Text {
                kind: OverlayKind::Day,
                text,
                position: geometry.day_anchor(),
                color: colors::WHITE,
            });
        }

        let pivot = geometry.pivot();
        let hour_frame = Affine2::rotation_about(pivot, angles.hour_deg);
        let minute_frame = hour_frame.then_rotate_about(pivot, angles.minute_deg - angles.hour_deg);

        frame.push(self.hand(geometry, assets, Layer::HourHand, hour_frame));
        frame.push(self.hand(geometry, assets, Layer::MinuteHand, minute_frame));

        if !mode.is_ambient() {
            let second_frame = minute_frame.then_rotate_about(pivot, angles.second_deg - angles.minute_deg);
            frame.push(self.hand(geometry, assets, Layer::SecondHand, second_frame));
        }

        Ok(frame)
    }

    /// Compose and hand the frame to `sink`.
    pub fn render<S: DisplaySink + ?Sized>(
        &self,
        sink: &mut S,
        geometry: &DisplayGeometry,
        assets: &ScaledAssetSet,
        angles: ClockAngles,
        mode: PowerMode,
        overlay: &OverlayData,
    ) -> Result<(), RenderError> {
        let frame = self.compose(geometry, assets, angles, mode, overlay)?;
        sink.submit(&frame);
        Ok(())
    }

    fn hand(&self, geometry: &DisplayGeometry, assets: &ScaledAssetSet, layer: Layer, transform: Affine2) -> DrawCommand {
        match self.style {
            HandStyle::Bitmap => {
                let raster = match layer {
                    Layer::HourHand => &assets.hour_hand,
                    Layer::MinuteHand => &assets.minute_hand,
                    _ => &assets.second_hand,
                };
                // Hand images pivot at their own center
                let origin = Point2::new(
                    geometry.center_x - raster.width() as f32 / 2.0,
                    geometry.center_y - raster.height() as f32 / 2.0,
                );
                DrawCommand::Blit {
                    layer,
                    raster: raster.clone(),
                    transform,
                    origin,
                }
            }
            HandStyle::Vector => {
                let (length, color) = match layer {
                    Layer::HourHand => (geometry.hour_hand_length(), colors::WHITE),
                    Layer::MinuteHand => (geometry.minute_hand_length(), colors::WHITE),
                    _ => (geometry.second_hand_length(), colors::RED),
                };
                let cap = HAND_END_CAP_RADIUS;
                DrawCommand::RoundRect {
                    layer,
                    transform,
                    origin: Point2::new(geometry.center_x - cap, geometry.center_y - length),
                    width: 2.0 * cap,
                    height: length + cap,
                    radius: cap,
                    color,
                }
            }
        }
    }
}

fn scales_match(a: f32, b: f32) -> bool {
    F32Ext::abs(a - b) <= SCALE_TOLERANCE * F32Ext::abs(a).max(F32Ext::abs(b)).max(1.0)
}

fn check_consistency(geometry: &DisplayGeometry, assets: &ScaledAssetSet) -> Result<(), RenderError> {
    if !scales_match(geometry.scale_factor, assets.scale_factor) {
        return Err(RenderError::ScaleMismatch {
            geometry: geometry.scale_factor,
            assets: assets.scale_factor,
        });
    }
    if !scales_match(geometry.hand_scale, assets.hand_scale) {
        return Err(RenderError::ScaleMismatch {
            geometry: geometry.hand_scale,
            assets: assets.hand_scale,
        });
    }
    if assets.background.width() != geometry.width {
        return Err(RenderError::SizeMismatch {
            surface_width: geometry.width,
            background_width: assets.background.width(),
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
