//! Timezone identifier with its UTC offset.
//!
//! The engine never resolves zone rules itself. The host's clock reports the
//! current zone (name + offset in effect) and the face re-reads it whenever the
//! platform broadcasts a timezone change or the face becomes visible again.

use chrono::{FixedOffset, Offset, Utc};
use heapless::String;

use crate::config::TIMEZONE_NAME_LEN;

/// Current timezone: display name plus the fixed offset in effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timezone {
    name: String<TIMEZONE_NAME_LEN>,
    offset: FixedOffset,
}

impl Timezone {
    /// Build a zone from a name and an offset in seconds east of UTC.
    ///
    /// Returns `None` if the offset is out of range (more than a day).
    /// Names longer than [`TIMEZONE_NAME_LEN`] are truncated.
    pub fn new(name: &str, offset_secs: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(offset_secs)?;
        Some(Self::with_offset(name, offset))
    }

    /// Build a zone from an existing chrono offset.
    pub fn with_offset(name: &str, offset: FixedOffset) -> Self {
        let mut stored: String<TIMEZONE_NAME_LEN> = String::new();
        for c in name.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }
        Self { name: stored, offset }
    }

    /// Coordinated Universal Time.
    pub fn utc() -> Self { Self::with_offset("UTC", Utc.fix()) }

    #[inline]
    pub fn name(&self) -> &str { self.name.as_str() }

    #[inline]
    pub const fn offset(&self) -> FixedOffset { self.offset }

    /// Offset from UTC in milliseconds.
    #[inline]
    pub fn offset_millis(&self) -> i64 { i64::from(self.offset.local_minus_utc()) * 1000 }
}

impl Default for Timezone {
    fn default() -> Self { Self::utc() }
}
