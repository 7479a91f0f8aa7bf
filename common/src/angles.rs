//! Wall-clock time to hand rotation angles.
//!
//! The angles are continuous rather than stepped:
//!
//! ```text
//! second = (s + ms / 1000) * 6
//! minute = m * 6
//! hour   = (h % 12) * 30 + m / 2
//! ```
//!
//! so the second hand moves smoothly if sampled faster than once a second and
//! the hour hand creeps between hour marks instead of jumping. All angles are
//! clockwise from twelve o'clock, in degrees, normalized into `[0, 360)`.

use crate::config::{DEGREES_PER_HOUR, DEGREES_PER_MINUTE_UNIT, HOUR_OFFSET_DIVISOR};
use crate::timezone::Timezone;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Rotation of each hand, in degrees clockwise from twelve.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ClockAngles {
    pub hour_deg: f32,
    pub minute_deg: f32,
    pub second_deg: f32,
}

/// Local wall-clock fields of a timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallClock {
    /// Hour of day, 0-23.
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl WallClock {
    /// Split a UTC timestamp into local fields for `timezone`.
    ///
    /// Uses Euclidean remainder so timestamps before the epoch still yield
    /// fields in range.
    pub fn from_millis(now_millis: i64, timezone: &Timezone) -> Self {
        let local = now_millis.wrapping_add(timezone.offset_millis());
        let ms_of_day = local.rem_euclid(MS_PER_DAY);
        Self {
            hour: (ms_of_day / MS_PER_HOUR) as u32,
            minute: ((ms_of_day % MS_PER_HOUR) / MS_PER_MINUTE) as u32,
            second: ((ms_of_day % MS_PER_MINUTE) / MS_PER_SECOND) as u32,
            millisecond: (ms_of_day % MS_PER_SECOND) as u32,
        }
    }

    /// Hour on a 12-hour dial, 0-11.
    #[inline]
    pub const fn hour_of_12(self) -> u32 { self.hour % 12 }
}

/// Compute hand angles for a UTC timestamp in `timezone`.
pub fn angles(now_millis: i64, timezone: &Timezone) -> ClockAngles {
    angles_for(WallClock::from_millis(now_millis, timezone))
}

/// Compute hand angles from already-split wall-clock fields.
pub fn angles_for(clock: WallClock) -> ClockAngles {
    let seconds = clock.second as f32 + clock.millisecond as f32 / 1000.0;
    let second_deg = seconds * DEGREES_PER_MINUTE_UNIT;

    let minute_deg = clock.minute as f32 * DEGREES_PER_MINUTE_UNIT;

    let hour_offset_deg = clock.minute as f32 / HOUR_OFFSET_DIVISOR;
    let hour_deg = clock.hour_of_12() as f32 * DEGREES_PER_HOUR + hour_offset_deg;

    ClockAngles {
        hour_deg: normalize_degrees(hour_deg),
        minute_deg: normalize_degrees(minute_deg),
        second_deg: normalize_degrees(second_deg),
    }
}

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f32) -> f32 {
    let wrapped = deg % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // -tiny + 360.0 rounds to 360.0 in f32
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

// =============================================================================
// Tests
// =============================================================================
