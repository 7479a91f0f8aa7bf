//! Text overlays drawn between the dial and the hands.
//!
//! Two values are shown: battery charge ("87%") and day of month ("29").
//! Either may be unavailable, in which case that overlay is simply left out.

use heapless::String;

use crate::config::OVERLAY_TEXT_LEN;
use crate::ports::{BatteryLevelSource, CalendarDayInfo};
use crate::profiling::push_u32;
use crate::timezone::Timezone;

/// Overlay values sampled once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct OverlayData {
    pub battery_percent: Option<u8>,
    pub day_of_month: Option<u8>,
}

impl OverlayData {
    /// Query both collaborators. Failures degrade to `None`.
    pub fn sample<B, C>(battery: &B, calendar: &C, now_millis: i64, timezone: &Timezone) -> Self
    where
        B: BatteryLevelSource + ?Sized,
        C: CalendarDayInfo + ?Sized,
    {
        Self {
            battery_percent: battery.battery_percent(),
            day_of_month: calendar.day_of_month(now_millis, timezone),
        }
    }

    /// "NN%", clamped to 100.
    pub fn battery_text(&self) -> Option<String<OVERLAY_TEXT_LEN>> {
        let percent = self.battery_percent?;
        let mut s = String::new();
        push_u32(&mut s, u32::from(percent.min(100)));
        s.push('%').ok();
        Some(s)
    }

    pub fn day_text(&self) -> Option<String<OVERLAY_TEXT_LEN>> {
        let day = self.day_of_month?;
        let mut s = String::new();
        push_u32(&mut s, u32::from(day));
        Some(s)
    }
}
