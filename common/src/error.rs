//! Error types for the watch face engine.
//!
//! - [`AssetError`]: missing or unusable raster. Fatal at start-up and on resize.
//! - [`RenderError`]: geometry and asset cache disagree. The frame is skipped.
//! - [`LifecycleError`]: the host called the entry points out of order.
//!
//! A timer fire delivered while idle is not an error at all; see
//! [`SchedulingInconsistency`](crate::scheduler::SchedulingInconsistency).

use core::fmt;

use crate::assets::AssetId;

/// A raster could not be loaded or scaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetError {
    /// The asset source has no asset with this id.
    NotFound(AssetId),
    /// The asset is absent at the point it is needed.
    Missing,
    /// The asset has zero native width.
    ZeroWidth,
    /// The asset has zero native height.
    ZeroHeight,
    /// The requested target width is zero.
    ZeroTarget,
    /// The texel buffer does not match the declared dimensions.
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "asset not found: {id}"),
            Self::Missing => write!(f, "asset is absent"),
            Self::ZeroWidth => write!(f, "asset has zero native width"),
            Self::ZeroHeight => write!(f, "asset has zero native height"),
            Self::ZeroTarget => write!(f, "target width must be greater than zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "texel count {actual} does not match dimensions ({expected} expected)")
            }
        }
    }
}

impl core::error::Error for AssetError {}

/// The compositor refused to build a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderError {
    /// No surface-size event has been seen yet.
    NoSurface,
    /// Geometry and assets were built with different scale factors.
    ScaleMismatch { geometry: f32, assets: f32 },
    /// The scaled background does not span the surface width.
    SizeMismatch { surface_width: u32, background_width: u32 },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSurface => write!(f, "no surface geometry yet"),
            Self::ScaleMismatch { geometry, assets } => {
                write!(f, "stale assets: geometry scale {geometry}, asset scale {assets}")
            }
            Self::SizeMismatch {
                surface_width,
                background_width,
            } => write!(
                f,
                "stale assets: surface width {surface_width}, background width {background_width}"
            ),
        }
    }
}

impl core::error::Error for RenderError {}

/// Entry points were called out of order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    /// An event arrived before `Create`.
    NotCreated,
    /// `Create` was delivered twice.
    AlreadyCreated,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCreated => write!(f, "event delivered before create"),
            Self::AlreadyCreated => write!(f, "create delivered twice"),
        }
    }
}

impl core::error::Error for LifecycleError {}

/// Error returned by [`LifecycleCoordinator::handle`](crate::lifecycle::LifecycleCoordinator::handle).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceError {
    Asset(AssetError),
    Lifecycle(LifecycleError),
}

impl fmt::Display for FaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(e) => write!(f, "asset error: {e}"),
            Self::Lifecycle(e) => write!(f, "lifecycle error: {e}"),
        }
    }
}

impl core::error::Error for FaceError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Asset(e) => Some(e),
            Self::Lifecycle(e) => Some(e),
        }
    }
}

impl From<AssetError> for FaceError {
    fn from(e: AssetError) -> Self { Self::Asset(e) }
}

impl From<LifecycleError> for FaceError {
    fn from(e: LifecycleError) -> Self { Self::Lifecycle(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display_names_asset() {
        let msg = AssetError::NotFound(AssetId::MinuteHand).to_string();
        assert!(msg.contains("minute"), "Message should name the asset: {msg}");
    }

    #[test]
    fn test_face_error_from_asset_error() {
        let err: FaceError = AssetError::ZeroWidth.into();
        assert_eq!(err, FaceError::Asset(AssetError::ZeroWidth));
    }

    #[test]
    fn test_face_error_source() {
        use core::error::Error;
        let err = FaceError::Lifecycle(LifecycleError::NotCreated);
        assert!(err.source().is_some(), "Wrapped errors should expose their source");
    }
}
