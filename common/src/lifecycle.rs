//! Lifecycle coordinator.
//!
//! The single owner of all face state. The host turns every platform callback
//! into an [`Event`] and hands it to [`LifecycleCoordinator::handle`]; the
//! returned [`Response`] says whether to draw, and
//! [`render_frame`](LifecycleCoordinator::render_frame) does the drawing.
//!
//! # Phases
//!
//! ```text
//! Fresh ──Create──▶ Running ──Destroy──▶ Destroyed
//! ```
//!
//! Anything but `Create` while fresh is a [`LifecycleError::NotCreated`].
//! A second `Create` is [`LifecycleError::AlreadyCreated`]. Once destroyed,
//! every event is logged and ignored, so a late timer fire cannot act.
//!
//! # Event Handling
//!
//! | Event | Effect |
//! |-------|--------|
//! | `Create` | load raw assets, read the timezone |
//! | `SurfaceChanged` | rebuild geometry and scaled assets, redraw |
//! | `VisibilityChanged` | (un)register for timezone changes, refresh zone when shown, update timer |
//! | `AmbientModeChanged` | store on change and redraw, update timer |
//! | `TimezoneChanged` | re-read zone, redraw |
//! | `TimeTick` | redraw |
//! | `TimerFired` | scheduler decides |
//! | `Tap` | redraw, acknowledge completed taps |
//! | `Destroy` | unregister, shut the scheduler down |

use crate::angles::angles;
use crate::assets::{HandScaling, RawAssetSet, ScaledAssetSet};
use crate::compositor::{FrameCompositor, HandStyle};
use crate::config::TAP_MESSAGE;
use crate::error::{FaceError, LifecycleError, RenderError};
use crate::geometry::DisplayGeometry;
use crate::modes::{Modes, PowerMode, Visibility};
use crate::overlay::OverlayData;
use crate::ports::{
    AssetSource,
    BatteryLevelSource,
    CalendarDayInfo,
    ClockSource,
    DisplaySink,
    Notifier,
    TimerHost,
    TimezoneChangeNotifier,
};
use crate::profiling::FaceMetrics;
use crate::queue::EventQueue;
use crate::scheduler::{FireOutcome, FireToken, RefreshScheduler};
use crate::timezone::Timezone;

// =============================================================================
// Events
// =============================================================================

/// Touch phases the platform reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapKind {
    TouchStart,
    TouchCancel,
    TapComplete,
}

/// Everything the host can tell the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Create,
    SurfaceChanged { width: u32, height: u32 },
    VisibilityChanged(Visibility),
    AmbientModeChanged(PowerMode),
    TimezoneChanged,
    TimeTick,
    TimerFired(FireToken),
    Tap(TapKind),
    Destroy,
}

/// What the host should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Response {
    /// Call [`LifecycleCoordinator::render_frame`].
    pub redraw: bool,
}

impl Response {
    pub const NONE: Self = Self { redraw: false };
    pub const REDRAW: Self = Self { redraw: true };

    /// Combine two responses: redraw if either asks.
    #[inline]
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            redraw: self.redraw || other.redraw,
        }
    }
}

/// Runtime options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FaceConfig {
    pub hand_style: HandStyle,
    pub hand_scaling: HandScaling,
}

/// Host capabilities needed while handling an event.
pub struct Ports<'a> {
    pub clock: &'a dyn ClockSource,
    pub assets: &'a mut dyn AssetSource,
    pub timer: &'a mut dyn TimerHost,
    pub timezone_notifier: &'a mut dyn TimezoneChangeNotifier,
    pub notifier: &'a mut dyn Notifier,
}

// =============================================================================
// State
// =============================================================================

/// Coordinator phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Fresh,
    Running,
    Destroyed,
}

/// Keeps timezone-change registration balanced.
///
/// Subscribing twice or unsubscribing while not subscribed is a no-op, so the
/// platform never sees an unbalanced pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimezoneReceiver {
    registered: bool,
}

impl TimezoneReceiver {
    #[inline]
    pub const fn is_registered(&self) -> bool { self.registered }

    pub fn register<N: TimezoneChangeNotifier + ?Sized>(&mut self, notifier: &mut N) {
        if self.registered {
            return;
        }
        self.registered = true;
        notifier.subscribe();
    }

    pub fn unregister<N: TimezoneChangeNotifier + ?Sized>(&mut self, notifier: &mut N) {
        if !self.registered {
            return;
        }
        self.registered = false;
        notifier.unsubscribe();
    }
}

/// All mutable face state, owned by the coordinator.
#[derive(Debug, Default)]
pub struct FaceState {
    pub phase: Phase,
    pub modes: Modes,
    pub timezone: Timezone,
    pub receiver: TimezoneReceiver,
    pub raw_assets: Option<RawAssetSet>,
    /// Geometry and scaled assets are replaced together on resize.
    pub surface: Option<(DisplayGeometry, ScaledAssetSet)>,
}

// =============================================================================
// Coordinator
// =============================================================================

/// Routes events to the scheduler, asset cache and compositor.
#[derive(Debug, Default)]
pub struct LifecycleCoordinator {
    config: FaceConfig,
    compositor: FrameCompositor,
    scheduler: RefreshScheduler,
    state: FaceState,
    metrics: FaceMetrics,
}

impl LifecycleCoordinator {
    pub fn new(config: FaceConfig) -> Self {
        Self {
            config,
            compositor: FrameCompositor::new(config.hand_style),
            scheduler: RefreshScheduler::new(),
            state: FaceState::default(),
            metrics: FaceMetrics::new(),
        }
    }

    #[inline]
    pub const fn state(&self) -> &FaceState { &self.state }

    #[inline]
    pub const fn phase(&self) -> Phase { self.state.phase }

    #[inline]
    pub const fn modes(&self) -> Modes { self.state.modes }

    #[inline]
    pub const fn timezone(&self) -> &Timezone { &self.state.timezone }

    #[inline]
    pub fn geometry(&self) -> Option<&DisplayGeometry> { self.state.surface.as_ref().map(|(g, _)| g) }

    #[inline]
    pub const fn scheduler(&self) -> &RefreshScheduler { &self.scheduler }

    #[inline]
    pub const fn metrics(&self) -> &FaceMetrics { &self.metrics }

    /// Process one event.
    pub fn handle(&mut self, event: Event, ports: &mut Ports<'_>) -> Result<Response, FaceError> {
        match (self.state.phase, event) {
            (Phase::Destroyed, event) => {
                log::debug!("ignoring {event:?} after destroy");
                Ok(Response::NONE)
            }
            (Phase::Fresh, Event::Create) => self.on_create(ports),
            (Phase::Fresh, _) => Err(LifecycleError::NotCreated.into()),
            (Phase::Running, event) => self.dispatch(event, ports),
        }
    }

    /// Drain `queue`, merging the responses. Stops at the first error and
    /// leaves the remaining events queued.
    pub fn handle_queued(&mut self, queue: &mut EventQueue, ports: &mut Ports<'_>) -> Result<Response, FaceError> {
        let mut response = Response::NONE;
        while let Some(event) = queue.pop() {
            response = response.merge(self.handle(event, ports)?);
        }
        Ok(response)
    }

    /// Draw the current time into `sink`.
    ///
    /// A frame that cannot be built is logged, counted and skipped; the error is
    /// returned for callers that care.
    pub fn render_frame<S: DisplaySink + ?Sized>(
        &mut self,
        sink: &mut S,
        clock: &dyn ClockSource,
        battery: &dyn BatteryLevelSource,
        calendar: &dyn CalendarDayInfo,
    ) -> Result<(), RenderError> {
        let result = self.try_render(sink, clock, battery, calendar);
        match result {
            Ok(()) => self.metrics.inc_frames_drawn(),
            Err(e) => {
                self.metrics.inc_frames_skipped();
                log::warn!("frame skipped: {e}");
            }
        }
        result
    }

    fn try_render<S: DisplaySink + ?Sized>(
        &self,
        sink: &mut S,
        clock: &dyn ClockSource,
        battery: &dyn BatteryLevelSource,
        calendar: &dyn CalendarDayInfo,
    ) -> Result<(), RenderError> {
        let (geometry, assets) = self.state.surface.as_ref().ok_or(RenderError::NoSurface)?;
        let now = clock.now_millis();
        let timezone = &self.state.timezone;
        let overlay = OverlayData::sample(battery, calendar, now, timezone);
        self.compositor.render(
            sink,
            geometry,
            assets,
            angles(now, timezone),
            self.state.modes.power,
            &overlay,
        )
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    fn dispatch(&mut self, event: Event, ports: &mut Ports<'_>) -> Result<Response, FaceError> {
        let response = match event {
            Event::Create => return Err(LifecycleError::AlreadyCreated.into()),
            Event::SurfaceChanged { width, height } => self.on_surface_changed(width, height)?,
            Event::VisibilityChanged(visibility) => self.on_visibility_changed(visibility, ports),
            Event::AmbientModeChanged(power) => self.on_ambient_mode_changed(power, ports),
            Event::TimezoneChanged => {
                self.refresh_timezone(ports.clock);
                Response::REDRAW
            }
            Event::TimeTick => Response::REDRAW,
            Event::TimerFired(token) => self.on_timer_fired(token, ports),
            Event::Tap(kind) => self.on_tap(kind, ports),
            Event::Destroy => self.on_destroy(ports),
        };
        Ok(response)
    }

    fn on_create(&mut self, ports: &mut Ports<'_>) -> Result<Response, FaceError> {
        let raw = RawAssetSet::load(ports.assets)?;
        log::info!(
            "face created, background {}x{}",
            raw.background.width(),
            raw.background.height()
        );
        self.state.raw_assets = Some(raw);
        self.refresh_timezone(ports.clock);
        self.state.phase = Phase::Running;
        Ok(Response::NONE)
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) -> Result<Response, FaceError> {
        let raw = self.state.raw_assets.as_ref().ok_or(LifecycleError::NotCreated)?;
        let assets = ScaledAssetSet::build(raw, width, self.config.hand_scaling)?;
        let geometry = DisplayGeometry::new(width, height, assets.scale_factor, assets.hand_scale);
        log::info!(
            "surface {width}x{height}, scale {:.3}, hand scale {:.3}",
            geometry.scale_factor,
            geometry.hand_scale
        );
        self.state.surface = Some((geometry, assets));
        self.metrics.inc_resizes();
        Ok(Response::REDRAW)
    }

    fn on_visibility_changed(&mut self, visibility: Visibility, ports: &mut Ports<'_>) -> Response {
        if self.state.modes.visibility != visibility {
            log::info!("visibility {visibility:?}");
        }
        self.state.modes.visibility = visibility;

        if visibility.is_visible() {
            self.state.receiver.register(ports.timezone_notifier);
            // The zone may have changed while hidden
            self.refresh_timezone(ports.clock);
        } else {
            self.state.receiver.unregister(ports.timezone_notifier);
        }
        let started = self.update_timer(ports);

        Response {
            redraw: visibility.is_visible() || started,
        }
    }

    fn on_ambient_mode_changed(&mut self, power: PowerMode, ports: &mut Ports<'_>) -> Response {
        let changed = self.state.modes.power != power;
        if changed {
            log::info!("power mode {power:?}");
            self.state.modes.power = power;
        }
        let started = self.update_timer(ports);
        Response {
            redraw: changed || started,
        }
    }

    fn on_timer_fired(&mut self, token: FireToken, ports: &mut Ports<'_>) -> Response {
        let now = ports.clock.now_millis();
        match self.scheduler.on_fire(token, now, self.state.modes.should_run(), ports.timer) {
            FireOutcome::Redraw { .. } => {
                self.metrics.inc_timer_fires();
                Response::REDRAW
            }
            FireOutcome::Suspended => Response::NONE,
            FireOutcome::Ignored(_) => {
                self.metrics.inc_ignored_fires();
                Response::NONE
            }
        }
    }

    fn on_tap(&mut self, kind: TapKind, ports: &mut Ports<'_>) -> Response {
        if kind == TapKind::TapComplete {
            self.metrics.inc_taps();
            ports.notifier.notify(TAP_MESSAGE);
        }
        Response::REDRAW
    }

    fn on_destroy(&mut self, ports: &mut Ports<'_>) -> Response {
        self.state.receiver.unregister(ports.timezone_notifier);
        self.scheduler.shutdown(ports.timer);
        self.state.phase = Phase::Destroyed;
        log::info!(
            "face destroyed after {} frames ({} skipped)",
            self.metrics.frames_drawn,
            self.metrics.frames_skipped
        );
        Response::NONE
    }

    fn refresh_timezone(&mut self, clock: &dyn ClockSource) {
        let timezone = clock.current_timezone();
        if timezone != self.state.timezone {
            log::info!("timezone {}", timezone.name());
            self.state.timezone = timezone;
        }
    }

    /// Re-arm or stop the per-second timer for the current modes. Returns
    /// `true` when the timer was (re)started, which asks for a redraw now.
    fn update_timer(&mut self, ports: &mut Ports<'_>) -> bool {
        let now = ports.clock.now_millis();
        self.scheduler.update(self.state.modes.should_run(), now, ports.timer)
    }
}

// =============================================================================
// Tests
// =============================================================================
