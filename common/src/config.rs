//! Engine configuration constants.
//!
//! Everything the face needs that does not depend on the surface size is a
//! compile-time `const`. Values that do depend on it (center, overlay anchors,
//! vector hand lengths) are derived once per surface-size event in
//! [`DisplayGeometry`](crate::geometry::DisplayGeometry) from the ratios below.

// =============================================================================
// Refresh Timing
// =============================================================================

/// Interactive refresh period in milliseconds. The second hand advances once
/// per period, always aligned to the wall-clock second boundary.
pub const INTERACTIVE_UPDATE_RATE_MS: i64 = 1000;

/// Degrees the second and minute hands move per unit (360 / 60).
pub const DEGREES_PER_MINUTE_UNIT: f32 = 6.0;

/// Degrees the hour hand moves per hour (360 / 12).
pub const DEGREES_PER_HOUR: f32 = 30.0;

/// Minutes-to-degrees divisor for the hour hand creep (30 degrees per 60 minutes).
pub const HOUR_OFFSET_DIVISOR: f32 = 2.0;

// =============================================================================
// Overlay Layout (relative to the pivot)
// =============================================================================

/// Battery text sits `width / 12` left of center.
pub const BATTERY_X_DIVISOR: f32 = 12.0;

/// Battery text baseline sits `height / 8` below center.
pub const BATTERY_Y_DIVISOR: f32 = 8.0;

/// Day-of-month text sits `width / 3.2` right of center.
pub const DAY_X_DIVISOR: f32 = 3.2;

/// Day-of-month text baseline sits `height / 42` below center.
pub const DAY_Y_DIVISOR: f32 = 42.0;

/// Longest overlay string ("100%").
pub const OVERLAY_TEXT_LEN: usize = 8;

// =============================================================================
// Vector Hands
// =============================================================================

/// Hour hand length as a fraction of the face radius.
pub const HOUR_HAND_RATIO: f32 = 0.5;

/// Minute hand length as a fraction of the face radius.
pub const MINUTE_HAND_RATIO: f32 = 0.7;

/// Second hand length as a fraction of the face radius.
pub const SECOND_HAND_RATIO: f32 = 0.9;

/// Half-width and corner radius of a vector hand, in pixels.
pub const HAND_END_CAP_RADIUS: f32 = 4.0;

const _: () = assert!(HOUR_HAND_RATIO < MINUTE_HAND_RATIO);
const _: () = assert!(MINUTE_HAND_RATIO < SECOND_HAND_RATIO);
const _: () = assert!(SECOND_HAND_RATIO <= 1.0);

// =============================================================================
// Rasterization
// =============================================================================

/// Texels with alpha below this are treated as transparent when blitting.
/// The panel cannot read back, so there is no blending.
pub const ALPHA_THRESHOLD: u8 = 128;

// =============================================================================
// Events and Interaction
// =============================================================================

/// Capacity of the serialized inbound event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

/// Acknowledgment shown on a completed tap.
pub const TAP_MESSAGE: &str = "Analog face: tap received";

/// Maximum bytes in a timezone identifier.
pub const TIMEZONE_NAME_LEN: usize = 32;
