//! Simulated platform data sources: wall clock, battery and face bitmaps.

use std::time::Instant;

use analog_face_common::colors::{BLACK, GRAY, NAVY, RED, SILVER, WHITE};
use analog_face_common::ports::{AssetSource, BatteryLevelSource, ClockSource};
use analog_face_common::{AssetError, AssetId, Raster, Texel, Timezone};
use anyhow::{Context, Result};
use chrono::{FixedOffset, Local, Offset, Utc};
use embedded_graphics::pixelcolor::Rgb565;

use crate::timing::BATTERY_DRAIN_INTERVAL;

// =============================================================================
// Clock
// =============================================================================

/// Zones the `Z` key cycles through: (name, seconds east of UTC).
const DEMO_ZONES: [(&str, i32); 6] = [
    ("UTC", 0),
    ("CET", 3_600),
    ("IST", 19_800),
    ("JST", 32_400),
    ("AEST", 36_000),
    ("PST", -28_800),
];

/// System wall clock with an optional fixed zone override.
pub struct SystemClock {
    fixed: Option<Timezone>,
    next_demo_zone: usize,
}

impl SystemClock {
    /// Follow the system zone, or a fixed offset when one is given.
    pub fn new(utc_offset_minutes: Option<i32>) -> Result<Self> {
        let fixed = utc_offset_minutes.map(fixed_zone).transpose()?;
        Ok(Self {
            fixed,
            next_demo_zone: 0,
        })
    }

    /// Switch to the next demo zone, as if the user changed it in settings.
    pub fn cycle_zone(&mut self) -> Timezone {
        let (name, secs) = DEMO_ZONES[self.next_demo_zone % DEMO_ZONES.len()];
        self.next_demo_zone = self.next_demo_zone.wrapping_add(1);
        let zone = Timezone::new(name, secs).unwrap_or_default();
        self.fixed = Some(zone.clone());
        zone
    }
}

impl ClockSource for SystemClock {
    fn now_millis(&self) -> i64 { Utc::now().timestamp_millis() }

    fn current_timezone(&self) -> Timezone {
        self.fixed.clone().unwrap_or_else(|| {
            let offset = Local::now().offset().fix();
            Timezone::with_offset("Local", offset)
        })
    }
}

fn fixed_zone(minutes: i32) -> Result<Timezone> {
    let offset = minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("UTC offset of {minutes} minutes is out of range"))?;
    Ok(Timezone::with_offset(&format!("UTC{offset}"), offset))
}

// =============================================================================
// Battery
// =============================================================================

/// Battery that drains one percent per [`BATTERY_DRAIN_INTERVAL`].
pub struct SimBattery {
    start_percent: u8,
    started: Instant,
}

impl SimBattery {
    pub fn new(start_percent: u8) -> Self { Self::starting_at(start_percent, Instant::now()) }

    pub const fn starting_at(start_percent: u8, started: Instant) -> Self { Self { start_percent, started } }
}

impl BatteryLevelSource for SimBattery {
    fn battery_percent(&self) -> Option<u8> {
        let drained = self.started.elapsed().as_secs() / BATTERY_DRAIN_INTERVAL.as_secs().max(1);
        let drained = u8::try_from(drained).unwrap_or(u8::MAX);
        Some(self.start_percent.min(100).saturating_sub(drained))
    }
}

// =============================================================================
// Procedural Assets
// =============================================================================

/// Native width of the generated dial, in pixels.
pub const BACKGROUND_NATIVE_SIZE: u32 = 320;

/// Draws the face bitmaps at start-up instead of decoding image files.
///
/// Hands point at twelve with the pivot at the raster center, like any hand
/// artwork the engine expects.
pub struct ProceduralAssets {
    size: u32,
    without: Option<AssetId>,
}

impl ProceduralAssets {
    pub const fn new(size: u32) -> Self { Self { size, without: None } }

    /// Same source with one asset unavailable.
    #[allow(dead_code)]
    pub const fn without(mut self, id: AssetId) -> Self {
        self.without = Some(id);
        self
    }

    fn radius(&self) -> f32 { self.size as f32 / 2.0 }
}

impl AssetSource for ProceduralAssets {
    fn load(&mut self, id: AssetId) -> Result<Raster, AssetError> {
        if self.without == Some(id) {
            return Err(AssetError::NotFound(id));
        }
        let r = self.radius();
        let raster = match id {
            AssetId::Background => dial(self.size),
            AssetId::HourHand => hand(12, r * 0.5, 0.0, WHITE),
            AssetId::MinuteHand => hand(8, r * 0.75, 0.0, SILVER),
            AssetId::SecondHand => hand(4, r * 0.9, r * 0.15, RED),
        };
        log::debug!("generated {id} {}x{}", raster.width(), raster.height());
        Ok(raster)
    }
}

/// Round dial with minute and hour ticks on a black square.
fn dial(size: u32) -> Raster {
    let r = size as f32 / 2.0;
    Raster::from_fn(size, size, |x, y| {
        let px = x as f32 + 0.5 - r;
        let py = y as f32 + 0.5 - r;
        let d = px.hypot(py);
        if d > r {
            return Texel::opaque(BLACK);
        }
        if d > r - 3.0 {
            return Texel::opaque(SILVER);
        }

        // Clockwise from twelve
        let angle = px.atan2(-py).to_degrees().rem_euclid(360.0);
        let index = (angle / 6.0).round();
        let off_line = d * (angle - index * 6.0).to_radians().abs();
        let hour_mark = (index as u32) % 5 == 0;
        let (inner, half_width, color) = if hour_mark { (0.80, 2.0, WHITE) } else { (0.88, 0.75, GRAY) };
        if d >= r * inner && d <= r * 0.94 && off_line <= half_width {
            return Texel::opaque(color);
        }
        Texel::opaque(NAVY)
    })
}

/// Hand of `length` pointing up from the raster center, with a rounded tip
/// and an optional counterweight `tail`.
fn hand(width: u32, length: f32, tail: f32, color: Rgb565) -> Raster {
    let height = (2.0 * length).round() as u32;
    let half = width as f32 / 2.0;
    let pivot_y = height as f32 / 2.0;
    let top = pivot_y - length;
    Raster::from_fn(width, height, |x, y| {
        let dx = (x as f32 + 0.5 - half).abs();
        let py = y as f32 + 0.5;
        let inside = if py < top + half {
            dx.hypot(top + half - py) <= half
        } else {
            py <= pivot_y + tail.max(half)
        };
        if inside { Texel::opaque(color) } else { Texel::TRANSPARENT }
    })
}
