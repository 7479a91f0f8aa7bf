//! Raster assets and the asset scaler.
//!
//! The face is built from four bitmaps: a background dial and three hand
//! images. Each hand image is drawn pointing at twelve, with the pivot at the
//! image's own center, so the compositor can center it on the display pivot and
//! rotate.
//!
//! # Scaling Happens on Resize Only
//!
//! Resampling touches every texel, so it runs once per surface-size event in
//! [`ScaledAssetSet::build`], never in the per-second hot path. The compositor
//! only ever sees already-scaled rasters.
//!
//! # Shared, Immutable Texels
//!
//! [`Raster`] is a cheap handle: texels live behind an `Arc<[Texel]>` and are
//! never written after construction. Scaling always allocates a new raster
//! (or returns the same handle when no scaling is needed).

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use micromath::F32Ext;

use crate::error::AssetError;

// =============================================================================
// Asset Identity
// =============================================================================

/// The four bitmaps that make up the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    Background,
    HourHand,
    MinuteHand,
    SecondHand,
}

impl AssetId {
    pub const ALL: [Self; 4] = [Self::Background, Self::HourHand, Self::MinuteHand, Self::SecondHand];
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Background => "background",
            Self::HourHand => "hour hand",
            Self::MinuteHand => "minute hand",
            Self::SecondHand => "second hand",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Raster
// =============================================================================

/// One texel: Rgb565 color plus 8-bit coverage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texel {
    pub color: Rgb565,
    pub alpha: u8,
}

impl Texel {
    pub const TRANSPARENT: Self = Self {
        color: Rgb565::BLACK,
        alpha: 0,
    };

    #[inline]
    pub const fn opaque(color: Rgb565) -> Self { Self { color, alpha: u8::MAX } }
}

/// Immutable bitmap handle. Cloning shares the texels.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    texels: Arc<[Texel]>,
}

impl Raster {
    /// Wrap row-major texels. The texel count must equal `width * height`.
    pub fn new(width: u32, height: u32, texels: Vec<Texel>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(AssetError::DimensionMismatch {
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels: texels.into(),
        })
    }

    /// Build a raster by evaluating `f(x, y)` for every texel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Texel) -> Self {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            texels: texels.into(),
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    #[inline]
    pub const fn size(&self) -> (u32, u32) { (self.width, self.height) }

    /// Texel at `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Option<Texel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.texels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Whether two handles share the same texel storage.
    #[cfg(test)]
    pub fn shares_texels(&self, other: &Self) -> bool { Arc::ptr_eq(&self.texels, &other.texels) }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Scaling
// =============================================================================

/// Scale `asset` to `target_width`, preserving aspect ratio.
///
/// The new height is `round(native_height * target_width / native_width)`
/// (at least 1). Resampling is bilinear over color and alpha. Scaling to the
/// asset's own width returns the same handle, so repeated resizes to the same
/// size never degrade the image.
pub fn scale(asset: Option<&Raster>, target_width: u32) -> Result<Raster, AssetError> {
    let asset = asset.ok_or(AssetError::Missing)?;
    if asset.width == 0 {
        return Err(AssetError::ZeroWidth);
    }
    if asset.height == 0 {
        return Err(AssetError::ZeroHeight);
    }
    if target_width == 0 {
        return Err(AssetError::ZeroTarget);
    }
    if target_width == asset.width {
        return Ok(asset.clone());
    }

    let ratio = target_width as f32 / asset.width as f32;
    let target_height = F32Ext::round(asset.height as f32 * ratio).max(1.0) as u32;
    Ok(resample(asset, target_width, target_height))
}

/// Scale `asset` by `factor`: the target width is `round(native_width * factor)`.
pub fn scale_by(asset: Option<&Raster>, factor: f32) -> Result<Raster, AssetError> {
    let asset = asset.ok_or(AssetError::Missing)?;
    let target_width = F32Ext::round(asset.width as f32 * factor).max(0.0) as u32;
    scale(Some(asset), target_width)
}

/// Bilinear resample into a `width` x `height` raster.
fn resample(src: &Raster, width: u32, height: u32) -> Raster {
    let sx = src.width as f32 / width as f32;
    let sy = src.height as f32 / height as f32;
    let max_x = (src.width - 1) as f32;
    let max_y = (src.height - 1) as f32;

    Raster::from_fn(width, height, |x, y| {
        // Sample at destination texel centers
        let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
        let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let x0 = fx as u32;
        let y0 = fy as u32;
        let x1 = (x0 + 1).min(src.width - 1);
        let y1 = (y0 + 1).min(src.height - 1);
        // 8-bit fixed-point weights
        let wx = ((fx - x0 as f32) * 256.0) as i32;
        let wy = ((fy - y0 as f32) * 256.0) as i32;

        let t00 = src.texel(x0, y0).unwrap_or(Texel::TRANSPARENT);
        let t10 = src.texel(x1, y0).unwrap_or(Texel::TRANSPARENT);
        let t01 = src.texel(x0, y1).unwrap_or(Texel::TRANSPARENT);
        let t11 = src.texel(x1, y1).unwrap_or(Texel::TRANSPARENT);

        let top = lerp_texel(t00, t10, wx);
        let bottom = lerp_texel(t01, t11, wx);
        lerp_texel(top, bottom, wy)
    })
}

/// Interpolate two texels with an 8-bit fixed-point weight (0 = `a`, 256 = `b`).
fn lerp_texel(a: Texel, b: Texel, t: i32) -> Texel {
    let lerp = |from: u8, to: u8| -> u8 {
        let from = i32::from(from);
        let to = i32::from(to);
        (from + (((to - from) * t) >> 8)) as u8
    };
    Texel {
        color: Rgb565::new(
            lerp(a.color.r(), b.color.r()),
            lerp(a.color.g(), b.color.g()),
            lerp(a.color.b(), b.color.b()),
        ),
        alpha: lerp(a.alpha, b.alpha),
    }
}

// =============================================================================
// Asset Sets
// =============================================================================

/// How the hand scale factor is derived from the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HandScaling {
    /// `surface_width / scaled_background_width`: hands are scaled relative to
    /// the already-rescaled background, which leaves them at (close to) their
    /// native size.
    #[default]
    RelativeToScaledBackground,
    /// `surface_width / native_background_width`: hands get exactly the
    /// background's scale factor.
    RelativeToNativeBackground,
}

/// The four unscaled bitmaps as loaded from the asset source.
#[derive(Clone, Debug)]
pub struct RawAssetSet {
    pub background: Raster,
    pub hour_hand: Raster,
    pub minute_hand: Raster,
    pub second_hand: Raster,
}

impl RawAssetSet {
    /// Load all four assets, failing on the first missing one.
    pub fn load<S: crate::ports::AssetSource + ?Sized>(source: &mut S) -> Result<Self, AssetError> {
        Ok(Self {
            background: source.load(AssetId::Background)?,
            hour_hand: source.load(AssetId::HourHand)?,
            minute_hand: source.load(AssetId::MinuteHand)?,
            second_hand: source.load(AssetId::SecondHand)?,
        })
    }
}

/// The four bitmaps scaled for the current surface. Always rebuilt together.
#[derive(Clone, Debug)]
pub struct ScaledAssetSet {
    pub background: Raster,
    pub hour_hand: Raster,
    pub minute_hand: Raster,
    pub second_hand: Raster,
    /// `surface_width / background_native_width` at build time.
    pub scale_factor: f32,
    /// Factor applied to the three hands.
    pub hand_scale: f32,
}

impl ScaledAssetSet {
    /// Scale every asset for a surface `surface_width` pixels wide.
    pub fn build(raw: &RawAssetSet, surface_width: u32, policy: HandScaling) -> Result<Self, AssetError> {
        if raw.background.width() == 0 {
            return Err(AssetError::ZeroWidth);
        }
        let scale_factor = surface_width as f32 / raw.background.width() as f32;
        let background = scale(Some(&raw.background), surface_width)?;

        let hand_scale = match policy {
            HandScaling::RelativeToScaledBackground => surface_width as f32 / background.width() as f32,
            HandScaling::RelativeToNativeBackground => scale_factor,
        };

        Ok(Self {
            hour_hand: scale_by(Some(&raw.hour_hand), hand_scale)?,
            minute_hand: scale_by(Some(&raw.minute_hand), hand_scale)?,
            second_hand: scale_by(Some(&raw.second_hand), hand_scale)?,
            background,
            scale_factor,
            hand_scale,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: Rgb565) -> Raster { Raster::from_fn(width, height, |_, _| Texel::opaque(color)) }

    fn raw_set(bg: u32, hand_w: u32, hand_h: u32) -> RawAssetSet {
        RawAssetSet {
            background: solid(bg, bg, Rgb565::BLUE),
            hour_hand: solid(hand_w, hand_h, Rgb565::WHITE),
            minute_hand: solid(hand_w, hand_h + 20, Rgb565::WHITE),
            second_hand: solid(hand_w / 2, hand_h + 40, Rgb565::RED),
        }
    }

    // -------------------------------------------------------------------------
    // Raster Construction
    // -------------------------------------------------------------------------

    #[test]
    fn test_raster_rejects_wrong_texel_count() {
        let err = Raster::new(4, 4, alloc::vec![Texel::TRANSPARENT; 15]).unwrap_err();
        assert_eq!(err, AssetError::DimensionMismatch { expected: 16, actual: 15 });
    }

    #[test]
    fn test_texel_out_of_bounds() {
        let r = solid(3, 2, Rgb565::GREEN);
        assert!(r.texel(2, 1).is_some());
        assert!(r.texel(3, 0).is_none());
        assert!(r.texel(0, 2).is_none());
    }

    // -------------------------------------------------------------------------
    // Scaling
    // -------------------------------------------------------------------------

    #[test]
    fn test_scale_preserves_aspect_ratio() {
        let r = solid(40, 100, Rgb565::WHITE);
        let scaled = scale(Some(&r), 20).unwrap();
        assert_eq!(scaled.size(), (20, 50));

        let scaled = scale(Some(&r), 30).unwrap();
        assert_eq!(scaled.size(), (30, 75));
    }

    #[test]
    fn test_scale_rounds_height() {
        let r = solid(3, 10, Rgb565::WHITE);
        // 10 * 2/3 = 6.67
        assert_eq!(scale(Some(&r), 2).unwrap().height(), 7);
    }

    #[test]
    fn test_scale_does_not_touch_input() {
        let r = solid(8, 8, Rgb565::RED);
        let before = r.clone();
        let _ = scale(Some(&r), 16).unwrap();
        assert_eq!(r, before);
        assert_eq!(r.size(), (8, 8));
    }

    #[test]
    fn test_scale_same_width_is_identity() {
        let r = Raster::from_fn(10, 6, |x, y| Texel::opaque(Rgb565::new((x * 3) as u8, (y * 10) as u8, 4)));
        let once = scale(Some(&r), 10).unwrap();
        let twice = scale(Some(&once), 10).unwrap();
        assert_eq!(twice, r, "Resizing to the same size must not degrade the asset");
        assert!(twice.shares_texels(&r), "No new raster should be allocated");
    }

    #[test]
    fn test_scale_solid_color_stays_solid() {
        let r = solid(7, 7, Rgb565::new(20, 40, 10));
        let up = scale(Some(&r), 19).unwrap();
        for y in 0..up.height() {
            for x in 0..up.width() {
                assert_eq!(up.texel(x, y), Some(Texel::opaque(Rgb565::new(20, 40, 10))));
            }
        }
    }

    #[test]
    fn test_scale_interpolates_alpha() {
        // Left half opaque, right half transparent
        let r = Raster::from_fn(4, 1, |x, _| if x < 2 { Texel::opaque(Rgb565::WHITE) } else { Texel::TRANSPARENT });
        let down = scale(Some(&r), 2).unwrap();
        assert_eq!(down.texel(0, 0).unwrap().alpha, u8::MAX);
        assert_eq!(down.texel(1, 0).unwrap().alpha, 0);
    }

    #[test]
    fn test_scale_errors() {
        let empty = Raster::from_fn(0, 5, |_, _| Texel::TRANSPARENT);
        assert_eq!(scale(Some(&empty), 10).unwrap_err(), AssetError::ZeroWidth);
        assert_eq!(scale(None, 10).unwrap_err(), AssetError::Missing);
        assert_eq!(scale(Some(&solid(2, 2, Rgb565::RED)), 0).unwrap_err(), AssetError::ZeroTarget);

        let flat = Raster::from_fn(5, 0, |_, _| Texel::TRANSPARENT);
        assert_eq!(scale(Some(&flat), 10).unwrap_err(), AssetError::ZeroHeight);
    }

    #[test]
    fn test_scale_by_factor() {
        let r = solid(30, 90, Rgb565::WHITE);
        let half = scale_by(Some(&r), 0.5).unwrap();
        assert_eq!(half.size(), (15, 45));
    }

    // -------------------------------------------------------------------------
    // Asset Sets
    // -------------------------------------------------------------------------

    #[test]
    fn test_build_scales_background_to_surface() {
        let raw = raw_set(200, 10, 120);
        let set = ScaledAssetSet::build(&raw, 400, HandScaling::RelativeToNativeBackground).unwrap();
        assert_eq!(set.background.size(), (400, 400));
        assert_eq!(set.scale_factor, 2.0);
        assert_eq!(set.hand_scale, 2.0);
        assert_eq!(set.hour_hand.size(), (20, 240));
        assert_eq!(set.minute_hand.size(), (20, 280));
        assert_eq!(set.second_hand.size(), (10, 320));
    }

    #[test]
    fn test_build_relative_to_scaled_background() {
        let raw = raw_set(200, 10, 120);
        let set = ScaledAssetSet::build(&raw, 400, HandScaling::RelativeToScaledBackground).unwrap();
        assert_eq!(set.scale_factor, 2.0, "Background factor is still surface / native");
        assert_eq!(set.hand_scale, 1.0, "Hands are scaled against the already-scaled background");
        assert!(set.hour_hand.shares_texels(&raw.hour_hand), "A factor of 1 reuses the raster");
    }

    #[test]
    fn test_build_rejects_zero_width_background() {
        let mut raw = raw_set(200, 10, 120);
        raw.background = Raster::from_fn(0, 0, |_, _| Texel::TRANSPARENT);
        let err = ScaledAssetSet::build(&raw, 400, HandScaling::default()).unwrap_err();
        assert_eq!(err, AssetError::ZeroWidth);
    }

    #[test]
    fn test_asset_id_display() {
        assert_eq!(AssetId::HourHand.to_string(), "hour hand");
        assert_eq!(AssetId::ALL.len(), 4);
    }
}
