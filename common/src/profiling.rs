//! Engine counters and small formatting helpers.
//!
//! [`FaceMetrics`] counts what the engine did, with no time dependency. The
//! simulator's `ProfilingMetrics` layers frame timing on top since it needs a
//! platform clock.
//!
//! # Usage
//!
//! ```ignore
//! let metrics = coordinator.metrics();
//! log::info!("drawn={} skipped={}", metrics.frames_drawn, metrics.frames_skipped);
//! ```

use heapless::String;

// =============================================================================
// Face Metrics
// =============================================================================

/// Counters maintained by the lifecycle coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceMetrics {
    /// Frames handed to the display sink.
    pub frames_drawn: u32,
    /// Frames refused by the compositor (stale geometry/assets).
    pub frames_skipped: u32,
    /// Timer fires that produced a redraw.
    pub timer_fires: u32,
    /// Timer fires dropped by the token/liveness guard.
    pub ignored_fires: u32,
    /// Surface-size events processed.
    pub resizes: u32,
    /// Completed taps acknowledged.
    pub taps: u32,
}

impl FaceMetrics {
    pub const fn new() -> Self {
        Self {
            frames_drawn: 0,
            frames_skipped: 0,
            timer_fires: 0,
            ignored_fires: 0,
            resizes: 0,
            taps: 0,
        }
    }

    #[inline]
    pub const fn inc_frames_drawn(&mut self) { self.frames_drawn = self.frames_drawn.wrapping_add(1); }

    #[inline]
    pub const fn inc_frames_skipped(&mut self) { self.frames_skipped = self.frames_skipped.wrapping_add(1); }

    #[inline]
    pub const fn inc_timer_fires(&mut self) { self.timer_fires = self.timer_fires.wrapping_add(1); }

    #[inline]
    pub const fn inc_ignored_fires(&mut self) { self.ignored_fires = self.ignored_fires.wrapping_add(1); }

    #[inline]
    pub const fn inc_resizes(&mut self) { self.resizes = self.resizes.wrapping_add(1); }

    #[inline]
    pub const fn inc_taps(&mut self) { self.taps = self.taps.wrapping_add(1); }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Push a u32 value to a heapless string (no format! macro).
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    // Build digits in reverse
    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_start_at_zero() {
        assert_eq!(FaceMetrics::new(), FaceMetrics::default());
    }

    #[test]
    fn test_metrics_counters() {
        let mut m = FaceMetrics::new();
        m.inc_frames_drawn();
        m.inc_frames_drawn();
        m.inc_frames_skipped();
        m.inc_ignored_fires();
        assert_eq!(m.frames_drawn, 2);
        assert_eq!(m.frames_skipped, 1);
        assert_eq!(m.ignored_fires, 1);
        assert_eq!(m.timer_fires, 0);
    }

    #[test]
    fn test_metrics_wrap_instead_of_overflow() {
        let mut m = FaceMetrics {
            frames_drawn: u32::MAX,
            ..FaceMetrics::new()
        };
        m.inc_frames_drawn();
        assert_eq!(m.frames_drawn, 0);
    }

    #[test]
    fn test_push_u32() {
        let mut s: String<16> = String::new();
        push_u32(&mut s, 0);
        assert_eq!(s.as_str(), "0");

        let mut s: String<16> = String::new();
        push_u32(&mut s, 123);
        assert_eq!(s.as_str(), "123");

        let mut s: String<16> = String::new();
        push_u32(&mut s, u32::MAX);
        assert_eq!(s.as_str(), "4294967295");
    }

    #[test]
    fn test_push_u32_truncates_at_capacity() {
        let mut s: String<2> = String::new();
        push_u32(&mut s, 9999);
        assert_eq!(s.as_str(), "99", "Digits past capacity are dropped");
    }
}
