//! Host-side loop timing.
//!
//! The engine's [`FaceMetrics`] counts what the face did; this adds what it
//! cost: main loop period, time spent rasterizing, time spent sleeping. Both
//! are logged together every [`STATS_LOG_INTERVAL`].

use std::time::{Duration, Instant};

use analog_face_common::profiling::{FaceMetrics, push_u32};
use heapless::String;

use crate::timing::STATS_LOG_INTERVAL;

/// Loop timing statistics.
pub struct ProfilingMetrics {
    // Loop timing (microseconds)
    pub loop_time_us: u32,
    pub render_time_us: u32,
    pub sleep_time_us: u32,

    // Statistics
    pub render_time_max_us: u32,
    render_time_avg_us: f32,

    // Counters
    pub total_loops: u64,
    pub frames_rendered: u64,

    start_time: Instant,
    last_report: Instant,
}

impl ProfilingMetrics {
    const EMA_ALPHA: f32 = 0.1;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            loop_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            render_time_max_us: 0,
            render_time_avg_us: 0.0,
            total_loops: 0,
            frames_rendered: 0,
            start_time: now,
            last_report: now,
        }
    }

    /// Record one main loop pass. `render_time` is `None` when nothing was drawn.
    pub fn record_loop(
        &mut self,
        total_time: Duration,
        render_time: Option<Duration>,
        sleep_time: Duration,
    ) {
        self.loop_time_us = total_time.as_micros() as u32;
        self.sleep_time_us = sleep_time.as_micros() as u32;
        self.total_loops += 1;

        let Some(render_time) = render_time else {
            self.render_time_us = 0;
            return;
        };
        let render_us = render_time.as_micros() as u32;
        self.render_time_us = render_us;
        self.render_time_max_us = self.render_time_max_us.max(render_us);

        if self.frames_rendered == 0 {
            self.render_time_avg_us = render_us as f32;
        } else {
            self.render_time_avg_us =
                Self::EMA_ALPHA.mul_add(render_us as f32, (1.0 - Self::EMA_ALPHA) * self.render_time_avg_us);
        }
        self.frames_rendered += 1;
    }

    /// Average render time in microseconds.
    #[inline]
    pub const fn render_time_avg_us(&self) -> u32 { self.render_time_avg_us as u32 }

    /// Time since the metrics were created.
    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Format uptime as HH:MM:SS.
    pub fn uptime_string(&self) -> String<12> {
        let secs = self.uptime().as_secs();
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;

        let mut s = String::new();
        for (i, part) in [hours, mins, secs].into_iter().enumerate() {
            if i > 0 {
                s.push(':').ok();
            }
            if part < 10 {
                s.push('0').ok();
            }
            push_u32(&mut s, part as u32);
        }
        s
    }

    /// Log a summary if the report interval has elapsed.
    pub fn report(&mut self, face: &FaceMetrics) {
        if self.last_report.elapsed() < STATS_LOG_INTERVAL {
            return;
        }
        self.last_report = Instant::now();
        log::debug!(
            "up {} | drawn {} skipped {} | fires {} ignored {} | render last {} avg {} max {} us | loop {} sleep {} us",
            self.uptime_string(),
            face.frames_drawn,
            face.frames_skipped,
            face.timer_fires,
            face.ignored_fires,
            self.render_time_us,
            self.render_time_avg_us(),
            self.render_time_max_us,
            self.loop_time_us,
            self.sleep_time_us,
        );
    }
}

impl Default for ProfilingMetrics {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiling_metrics_new() {
        let metrics = ProfilingMetrics::new();
        assert_eq!(metrics.total_loops, 0);
        assert_eq!(metrics.frames_rendered, 0);
        assert_eq!(metrics.render_time_max_us, 0);
    }

    #[test]
    fn test_idle_loop_does_not_count_as_frame() {
        let mut metrics = ProfilingMetrics::new();
        metrics.record_loop(Duration::from_micros(20_000), None, Duration::from_micros(19_000));
        assert_eq!(metrics.total_loops, 1);
        assert_eq!(metrics.frames_rendered, 0);
        assert_eq!(metrics.sleep_time_us, 19_000);
    }

    #[test]
    fn test_render_max_and_average() {
        let mut metrics = ProfilingMetrics::new();
        metrics.record_loop(Duration::from_micros(20_000), Some(Duration::from_micros(4_000)), Duration::ZERO);
        assert_eq!(metrics.render_time_avg_us(), 4_000, "First frame seeds the average");
        metrics.record_loop(Duration::from_micros(20_000), Some(Duration::from_micros(9_000)), Duration::ZERO);
        metrics.record_loop(Duration::from_micros(20_000), Some(Duration::from_micros(2_000)), Duration::ZERO);

        assert_eq!(metrics.frames_rendered, 3);
        assert_eq!(metrics.render_time_max_us, 9_000);
        let avg = metrics.render_time_avg_us();
        assert!(avg > 2_000 && avg < 9_000, "EMA stays within observed range: {avg}");
    }

    #[test]
    fn test_uptime_string_format() {
        let metrics = ProfilingMetrics::new();
        let uptime = metrics.uptime_string();
        assert_eq!(uptime.as_str(), "00:00:00");
    }
}
