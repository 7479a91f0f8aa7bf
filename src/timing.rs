//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration`, which is not available in
//! `no_std`, so they live here rather than in the engine crate.

use std::time::Duration;

/// Main loop period (~50 Hz). Keeps input latency and timer jitter low.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// How long the tap acknowledgment stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Simulated battery loses one percent per interval.
pub const BATTERY_DRAIN_INTERVAL: Duration = Duration::from_secs(30);

/// How often frame statistics are logged at debug level.
pub const STATS_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Platform time tick period in milliseconds (once per wall-clock minute).
pub const TIME_TICK_PERIOD_MS: i64 = 60_000;
