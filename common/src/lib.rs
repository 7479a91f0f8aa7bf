//! Analog watch face engine.
//!
//! This crate contains the platform-agnostic core shared by every host that
//! drives the face (the desktop simulator today, a watch target later):
//!
//! - [`angles`]: wall-clock time to hand rotation angles
//! - [`assets`]: raster handles and the once-per-resize asset scaler
//! - [`compositor`]: the fixed-order draw list for one frame
//! - [`sink`]: rasterizes a frame onto any `embedded-graphics` draw target
//! - [`scheduler`]: the second-aligned refresh state machine
//! - [`lifecycle`]: the event-driven coordinator that owns all face state
//! - [`ports`]: traits for the collaborators the host provides
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` and needs only `alloc` (raster texels are shared
//! behind `Arc`). Tests run with `std` enabled via `cfg_attr`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

extern crate alloc;

pub mod angles;
pub mod assets;
pub mod colors;
pub mod compositor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod modes;
pub mod overlay;
pub mod ports;
pub mod profiling;
pub mod queue;
pub mod scheduler;
pub mod sink;
pub mod timezone;
pub mod transform;

// Re-export commonly used items
pub use angles::{ClockAngles, angles};
pub use assets::{AssetId, Raster, ScaledAssetSet, Texel};
pub use compositor::{DrawCommand, Frame, HandStyle};
pub use error::{AssetError, FaceError, LifecycleError, RenderError};
pub use geometry::DisplayGeometry;
pub use lifecycle::{Event, FaceConfig, LifecycleCoordinator, Ports, Response, TapKind};
pub use modes::{PowerMode, Visibility};
pub use queue::EventQueue;
pub use scheduler::{FireToken, RefreshScheduler};
pub use sink::RasterSink;
pub use timezone::Timezone;
