//! Platform capabilities the simulator provides to the face.
//!
//! [`SimHost`] bundles them and lends them out as [`Ports`] for each batch of
//! events.

use std::time::{Duration, Instant};

use analog_face_common::FireToken;
use analog_face_common::lifecycle::Ports;
use analog_face_common::ports::{Notifier, TimerHost, TimezoneChangeNotifier};
use heapless::Vec;

use crate::sources::{ProceduralAssets, SimBattery, SystemClock};
use crate::toast::Toast;

/// More than the scheduler ever keeps pending; extra room absorbs a fire that
/// races with a cancel.
const MAX_PENDING_FIRES: usize = 4;

// =============================================================================
// Timer
// =============================================================================

/// Deadline-based [`TimerHost`] polled from the main loop.
#[derive(Debug, Default)]
pub struct SimTimerHost {
    pending: Vec<(Instant, FireToken), MAX_PENDING_FIRES>,
}

impl SimTimerHost {
    pub const fn new() -> Self { Self { pending: Vec::new() } }

    /// Remove and return every fire whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<FireToken, MAX_PENDING_FIRES> {
        let mut due: Vec<(Instant, FireToken), MAX_PENDING_FIRES> = Vec::new();
        self.pending.retain(|&(deadline, token)| {
            if deadline <= now {
                due.push((deadline, token)).ok();
                false
            } else {
                true
            }
        });
        due.sort_unstable_by_key(|&(deadline, _)| deadline);
        due.iter().map(|&(_, token)| token).collect()
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize { self.pending.len() }
}

impl TimerHost for SimTimerHost {
    fn schedule(&mut self, delay_ms: u64, token: FireToken) {
        let deadline = Instant::now() + Duration::from_millis(delay_ms);
        if self.pending.push((deadline, token)).is_err() {
            log::warn!("timer table full, dropping fire {token}");
        }
    }

    fn cancel(&mut self, token: FireToken) { self.pending.retain(|&(_, pending)| pending != token); }
}

// =============================================================================
// Notifications
// =============================================================================

/// Timezone broadcasts only reach the face while it is subscribed.
#[derive(Debug, Default)]
pub struct SimTimezoneNotifier {
    subscribed: bool,
}

impl SimTimezoneNotifier {
    #[inline]
    pub const fn is_subscribed(&self) -> bool { self.subscribed }
}

impl TimezoneChangeNotifier for SimTimezoneNotifier {
    fn subscribe(&mut self) {
        log::debug!("timezone receiver registered");
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        log::debug!("timezone receiver unregistered");
        self.subscribed = false;
    }
}

/// [`Notifier`] that keeps the latest message as an on-screen toast.
#[derive(Debug, Default)]
pub struct ToastNotifier {
    active: Option<Toast>,
}

impl ToastNotifier {
    #[inline]
    pub const fn active(&self) -> Option<&Toast> { self.active.as_ref() }

    /// Drop an expired toast. Returns `true` if one was removed.
    pub fn expire(&mut self) -> bool {
        if self.active.as_ref().is_some_and(Toast::is_expired) {
            self.active = None;
            return true;
        }
        false
    }
}

impl Notifier for ToastNotifier {
    fn notify(&mut self, message: &str) {
        log::info!("toast: {message}");
        self.active = Some(Toast::new(message, Instant::now()));
    }
}

// =============================================================================
// Host Bundle
// =============================================================================

/// Everything the face borrows from the platform.
pub struct SimHost {
    pub clock: SystemClock,
    pub battery: SimBattery,
    pub assets: ProceduralAssets,
    pub timer: SimTimerHost,
    pub timezone_notifier: SimTimezoneNotifier,
    pub toasts: ToastNotifier,
}

impl SimHost {
    pub fn ports(&mut self) -> Ports<'_> {
        Ports {
            clock: &self.clock,
            assets: &mut self.assets,
            timer: &mut self.timer,
            timezone_notifier: &mut self.timezone_notifier,
            notifier: &mut self.toasts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_after_deadline() {
        let mut timer = SimTimerHost::new();
        timer.schedule(0, FireToken::new(1));
        timer.schedule(60_000, FireToken::new(2));

        let due = timer.take_due(Instant::now());
        assert_eq!(due.as_slice(), [FireToken::new(1)]);
        assert_eq!(timer.pending(), 1, "Future fire stays pending");
    }

    #[test]
    fn test_cancelled_fire_never_arrives() {
        let mut timer = SimTimerHost::new();
        timer.schedule(0, FireToken::new(7));
        timer.cancel(FireToken::new(7));
        assert!(timer.take_due(Instant::now() + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_due_fires_in_deadline_order() {
        let mut timer = SimTimerHost::new();
        timer.schedule(20, FireToken::new(2));
        timer.schedule(10, FireToken::new(1));
        let due = timer.take_due(Instant::now() + Duration::from_secs(1));
        assert_eq!(due.as_slice(), [FireToken::new(1), FireToken::new(2)]);
    }

    #[test]
    fn test_timezone_notifier_tracks_subscription() {
        let mut n = SimTimezoneNotifier::default();
        n.subscribe();
        assert!(n.is_subscribed());
        n.unsubscribe();
        assert!(!n.is_subscribed());
    }

    #[test]
    fn test_toast_notifier_keeps_latest() {
        let mut n = ToastNotifier::default();
        assert!(n.active().is_none());
        n.notify("first");
        n.notify("second");
        assert_eq!(n.active().map(Toast::message), Some("second"));
        assert!(!n.expire(), "Fresh toast is not expired");
    }
}
