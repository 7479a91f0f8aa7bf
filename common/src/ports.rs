//! Collaborators the host provides.
//!
//! The engine never talks to a platform directly. Everything it consumes is
//! behind one of these narrow traits, which keeps the core testable on the host
//! with plain structs standing in for the platform.

use chrono::{DateTime, Datelike};

use crate::assets::{AssetId, Raster};
use crate::compositor::Frame;
use crate::error::AssetError;
use crate::scheduler::FireToken;
use crate::timezone::Timezone;

/// Resource loader for the face bitmaps.
pub trait AssetSource {
    /// Load the raw (unscaled) asset. Fails with [`AssetError::NotFound`].
    fn load(&mut self, id: AssetId) -> Result<Raster, AssetError>;
}

/// Receives the primitive list for one frame. The engine never writes pixels.
pub trait DisplaySink {
    fn submit(&mut self, frame: &Frame);
}

/// Wall clock.
pub trait ClockSource {
    /// Milliseconds since the Unix epoch, UTC.
    fn now_millis(&self) -> i64;

    /// The zone currently configured on the device.
    fn current_timezone(&self) -> Timezone;
}

/// Platform subscription for timezone-change broadcasts.
///
/// The engine only calls these through
/// [`TimezoneReceiver`](crate::lifecycle::TimezoneReceiver), which guarantees
/// balanced calls.
pub trait TimezoneChangeNotifier {
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
}

/// Battery charge for the overlay.
pub trait BatteryLevelSource {
    /// Charge in percent, or `None` if unavailable.
    fn battery_percent(&self) -> Option<u8>;
}

/// Calendar lookup for the day-of-month overlay.
pub trait CalendarDayInfo {
    fn day_of_month(&self, now_millis: i64, timezone: &Timezone) -> Option<u8>;
}

/// User-visible, transient notification surface (toast).
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// "Call me back after N ms" capability.
///
/// The host delivers [`Event::TimerFired`](crate::lifecycle::Event::TimerFired)
/// with the same token once the delay elapses. Cancellation is best effort: a
/// fire that was already queued may still arrive, and the scheduler ignores it.
pub trait TimerHost {
    fn schedule(&mut self, delay_ms: u64, token: FireToken);
    fn cancel(&mut self, token: FireToken);
}

/// [`CalendarDayInfo`] backed by chrono's proleptic Gregorian calendar.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChronoCalendar;

impl CalendarDayInfo for ChronoCalendar {
    fn day_of_month(&self, now_millis: i64, timezone: &Timezone) -> Option<u8> {
        let utc = DateTime::from_timestamp_millis(now_millis)?;
        let local = utc.with_timezone(&timezone.offset());
        u8::try_from(local.day()).ok()
    }
}

/// Battery source for hosts without a battery.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBattery;

impl BatteryLevelSource for NoBattery {
    fn battery_percent(&self) -> Option<u8> { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2024-02-29 23:30:00 UTC.
    const LEAP_DAY_LATE: i64 = 1_709_249_400_000;

    #[test]
    fn test_chrono_calendar_day_in_utc() {
        assert_eq!(ChronoCalendar.day_of_month(LEAP_DAY_LATE, &Timezone::utc()), Some(29));
    }

    #[test]
    fn test_chrono_calendar_respects_offset() {
        let east = Timezone::new("CET", 3600).unwrap();
        assert_eq!(
            ChronoCalendar.day_of_month(LEAP_DAY_LATE, &east),
            Some(1),
            "00:30 on March 1st one hour east"
        );
        let west = Timezone::new("EST", -5 * 3600).unwrap();
        assert_eq!(ChronoCalendar.day_of_month(LEAP_DAY_LATE, &west), Some(29));
    }

    #[test]
    fn test_chrono_calendar_out_of_range() {
        assert_eq!(ChronoCalendar.day_of_month(i64::MAX, &Timezone::utc()), None);
    }

    #[test]
    fn test_no_battery() {
        assert_eq!(NoBattery.battery_percent(), None);
    }
}
