//! Second-aligned refresh scheduler.
//!
//! # State Machine
//!
//! ```text
//!            start()                     on_fire(current token, should_run)
//!   Idle ─────────────────▶ Scheduled ───────────────────────────────┐
//!    ▲                          │  ▲                                  │
//!    │  stop() / on_fire(..,    │  └──────── redraw + re-arm ─────────┘
//!    │  should_run = false)     │
//!    └──────────────────────────┘
//! ```
//!
//! Every arm hands the [`TimerHost`] a fresh [`FireToken`]. A fire carrying any
//! other token (or arriving while idle) is reported as a
//! [`SchedulingInconsistency`] and otherwise ignored, so a cancelled fire that
//! was already queued can never redraw. At most one fire is pending at a time.
//!
//! # Alignment
//!
//! Each arm targets the next whole second of the wall clock, not "now plus one
//! second", so the second hand ticks on the boundary regardless of how late the
//! previous fire was delivered.

use core::fmt;

use crate::config::INTERACTIVE_UPDATE_RATE_MS;
use crate::ports::TimerHost;

/// Identifies one armed fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FireToken(u32);

impl FireToken {
    #[inline]
    pub const fn new(raw: u32) -> Self { Self(raw) }

    #[inline]
    pub const fn raw(self) -> u32 { self.0 }
}

impl fmt::Display for FireToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Timer state, owned by [`RefreshScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Scheduled {
        fire_at_ms: i64,
        token: FireToken,
    },
}

/// Why a fire was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InconsistencyKind {
    /// Nothing was scheduled.
    Idle,
    /// A newer fire superseded this one.
    Stale { current: FireToken },
}

/// A fire that did not match the scheduler state. Observability only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulingInconsistency {
    pub token: FireToken,
    pub kind: InconsistencyKind,
}

impl fmt::Display for SchedulingInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            InconsistencyKind::Idle => write!(f, "fire {} while idle", self.token),
            InconsistencyKind::Stale { current } => {
                write!(f, "stale fire {} (current {current})", self.token)
            }
        }
    }
}

/// What the host should do after a fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// Redraw now. The next fire is already armed.
    Redraw { next_delay_ms: u64 },
    /// The face is hidden or ambient: back to idle, no redraw.
    Suspended,
    /// The fire was not the one pending.
    Ignored(SchedulingInconsistency),
}

/// Milliseconds until the next whole second after `now_millis`, in `1..=1000`.
///
/// A timestamp exactly on a boundary waits a full period.
#[inline]
pub const fn next_second_delay(now_millis: i64) -> u64 {
    (INTERACTIVE_UPDATE_RATE_MS - now_millis.rem_euclid(INTERACTIVE_UPDATE_RATE_MS)) as u64
}

// =============================================================================
// Scheduler
// =============================================================================

/// Drives the per-second refresh through a [`TimerHost`].
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    state: TimerState,
    next_token: u32,
    shut_down: bool,
}

impl RefreshScheduler {
    pub const fn new() -> Self {
        Self {
            state: TimerState::Idle,
            next_token: 0,
            shut_down: false,
        }
    }

    #[inline]
    pub const fn state(&self) -> TimerState { self.state }

    #[inline]
    pub const fn is_scheduled(&self) -> bool { matches!(self.state, TimerState::Scheduled { .. }) }

    #[inline]
    pub const fn is_shut_down(&self) -> bool { self.shut_down }

    /// Arm the first fire. Returns `true` if the caller should redraw now.
    ///
    /// No-op (returning `false`) when already scheduled or shut down.
    pub fn start<H: TimerHost + ?Sized>(&mut self, now_millis: i64, host: &mut H) -> bool {
        if self.shut_down || self.is_scheduled() {
            return false;
        }
        self.arm(now_millis, host);
        true
    }

    /// Handle a fire delivered by the host.
    pub fn on_fire<H: TimerHost + ?Sized>(
        &mut self,
        token: FireToken,
        now_millis: i64,
        should_run: bool,
        host: &mut H,
    ) -> FireOutcome {
        let current = match self.state {
            TimerState::Idle => {
                let inconsistency = SchedulingInconsistency {
                    token,
                    kind: InconsistencyKind::Idle,
                };
                log::debug!("ignored {inconsistency}");
                return FireOutcome::Ignored(inconsistency);
            }
            TimerState::Scheduled { token: current, .. } => current,
        };

        if token != current {
            let inconsistency = SchedulingInconsistency {
                token,
                kind: InconsistencyKind::Stale { current },
            };
            log::debug!("ignored {inconsistency}");
            return FireOutcome::Ignored(inconsistency);
        }

        // The fire is consumed either way
        self.state = TimerState::Idle;
        if !should_run {
            log::debug!("fire {token} suspended");
            return FireOutcome::Suspended;
        }

        let next_delay_ms = self.arm(now_millis, host);
        FireOutcome::Redraw { next_delay_ms }
    }

    /// Cancel any pending fire and go idle.
    pub fn stop<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        if let TimerState::Scheduled { token, .. } = self.state {
            host.cancel(token);
            log::debug!("cancelled fire {token}");
        }
        self.state = TimerState::Idle;
    }

    /// Cancel, then re-arm only if the face should be ticking.
    ///
    /// Returns `true` if a new fire was armed.
    pub fn update<H: TimerHost + ?Sized>(&mut self, should_run: bool, now_millis: i64, host: &mut H) -> bool {
        self.stop(host);
        should_run && self.start(now_millis, host)
    }

    /// Stop for good. Later calls to [`start`](Self::start) are refused.
    pub fn shutdown<H: TimerHost + ?Sized>(&mut self, host: &mut H) {
        self.stop(host);
        self.shut_down = true;
    }

    fn arm<H: TimerHost + ?Sized>(&mut self, now_millis: i64, host: &mut H) -> u64 {
        let delay = next_second_delay(now_millis);
        self.next_token = self.next_token.wrapping_add(1);
        let token = FireToken(self.next_token);
        host.schedule(delay, token);
        self.state = TimerState::Scheduled {
            fire_at_ms: now_millis.saturating_add(delay as i64),
            token,
        };
        log::debug!("armed fire {token} in {delay} ms");
        delay
    }
}

// =============================================================================
// Tests
// =============================================================================
