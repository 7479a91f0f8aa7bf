//! Color constants for the watch face.
//!
//! Uses the built-in `RgbColor` constants where one exists. Rgb565 packs
//! 5 bits red, 6 bits green and 5 bits blue, which is the native format of the
//! small SPI/QSPI panels this face targets.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Dial background and the letterbox around non-square surfaces.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Overlay text and vector hands.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Second hand accent.
pub const RED: Rgb565 = Rgb565::RED;

// =============================================================================
// Custom Colors
// =============================================================================

/// Dark gray for minor dial ticks. RGB565: (8, 16, 8).
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Light gray for the minute hand body. RGB565: (24, 48, 24).
pub const SILVER: Rgb565 = Rgb565::new(24, 48, 24);

/// Deep navy for the dial face. RGB565: (2, 6, 8).
pub const NAVY: Rgb565 = Rgb565::new(2, 6, 8);

