// Crate-level lints: pixel math casts between integer and float types
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]

//! Desktop simulator for the analog watch face.
//!
//! Runs the engine from `analog-face-common` in an SDL window, standing in for
//! the watch platform: it owns the wall clock, the timer, the battery and the
//! event stream, and shows the face's notifications as toasts.
//!
//! # Controls
//!
//! | Input | Platform event |
//! |-------|----------------|
//! | `A` | toggle ambient mode |
//! | `V` | toggle visibility (screen off/on) |
//! | `Z` | switch to the next demo timezone |
//! | `T` | deliver a time tick |
//! | left mouse down / up | touch start / tap complete |
//! | right mouse up | touch cancel |
//!
//! Set `RUST_LOG=debug` to see scheduler and lifecycle traces.

mod cli;
mod host;
mod profiling;
mod sources;
mod timing;
mod toast;

use std::thread;
use std::time::Instant;

use analog_face_common::colors::BLACK;
use analog_face_common::ports::{ChronoCalendar, ClockSource};
use analog_face_common::{
    Event,
    EventQueue,
    LifecycleCoordinator,
    PowerMode,
    RasterSink,
    TapKind,
    Visibility,
};
use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::{Keycode, MouseButton};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use host::{SimHost, SimTimerHost, SimTimezoneNotifier, ToastNotifier};
use profiling::ProfilingMetrics;
use sources::{BACKGROUND_NATIVE_SIZE, ProceduralAssets, SimBattery, SystemClock};
use timing::{FRAME_TIME, TIME_TICK_PERIOD_MS};
use toast::draw_toast;

/// Battery level the simulated pack starts at.
const START_BATTERY_PERCENT: u8 = 87;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("starting face simulator: {cli:?}");

    let display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(cli.size, cli.size));
    let mut sink = RasterSink::new(display);
    let output_settings = OutputSettingsBuilder::new().scale(cli.scale).build();
    let mut window = Window::new("Analog Face", &output_settings);

    let mut host = SimHost {
        clock: SystemClock::new(cli.utc_offset_minutes).context("invalid --utc-offset-minutes")?,
        battery: SimBattery::new(START_BATTERY_PERCENT),
        assets: ProceduralAssets::new(BACKGROUND_NATIVE_SIZE),
        timer: SimTimerHost::new(),
        timezone_notifier: SimTimezoneNotifier::default(),
        toasts: ToastNotifier::default(),
    };
    let mut face = LifecycleCoordinator::new(cli.face_config());
    let mut queue = EventQueue::new();

    // =========================================================================
    // Start-up
    // =========================================================================

    let mut power = PowerMode::from_ambient(cli.ambient);
    let mut visibility = Visibility::Visible;
    for event in [
        Event::Create,
        Event::SurfaceChanged {
            width: cli.size,
            height: cli.size,
        },
        Event::AmbientModeChanged(power),
        Event::VisibilityChanged(visibility),
    ] {
        queue.push(event).ok();
    }
    face.handle_queued(&mut queue, &mut host.ports())
        .context("face failed to start")?;

    sink.target_mut().clear(BLACK).ok();
    face.render_frame(&mut sink, &host.clock, &host.battery, &ChronoCalendar).ok();
    window.update(sink.target());

    let mut metrics = ProfilingMetrics::new();
    let mut last_minute = host.clock.now_millis().div_euclid(TIME_TICK_PERIOD_MS);

    // =========================================================================
    // Main Loop
    // =========================================================================

    'running: loop {
        let frame_start = Instant::now();

        // ---------------------------------------------------------------------
        // Platform events
        // ---------------------------------------------------------------------

        for ev in window.events() {
            let event = match ev {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    // Ignore OS key repeat so holding a key does not flap modes
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::A => {
                            power = power.toggle();
                            Event::AmbientModeChanged(power)
                        }
                        Keycode::V => {
                            visibility = visibility.toggle();
                            if !visibility.is_visible() {
                                sink.target_mut().clear(BLACK).ok();
                            }
                            Event::VisibilityChanged(visibility)
                        }
                        Keycode::Z => {
                            let zone = host.clock.cycle_zone();
                            log::info!("system timezone is now {}", zone.name());
                            if !host.timezone_notifier.is_subscribed() {
                                continue;
                            }
                            Event::TimezoneChanged
                        }
                        Keycode::T => Event::TimeTick,
                        _ => continue,
                    }
                }
                SimulatorEvent::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    ..
                } => Event::Tap(TapKind::TouchStart),
                SimulatorEvent::MouseButtonUp { mouse_btn, .. } => match mouse_btn {
                    MouseButton::Left => Event::Tap(TapKind::TapComplete),
                    MouseButton::Right => Event::Tap(TapKind::TouchCancel),
                    _ => continue,
                },
                _ => continue,
            };
            queue.push(event).ok();
        }

        for token in host.timer.take_due(Instant::now()) {
            queue.push(Event::TimerFired(token)).ok();
        }

        let minute = host.clock.now_millis().div_euclid(TIME_TICK_PERIOD_MS);
        if minute != last_minute {
            last_minute = minute;
            queue.push(Event::TimeTick).ok();
        }

        // ---------------------------------------------------------------------
        // Face
        // ---------------------------------------------------------------------

        let mut redraw = match face.handle_queued(&mut queue, &mut host.ports()) {
            Ok(response) => response.redraw,
            Err(e) => {
                log::warn!("event rejected: {e}");
                false
            }
        };
        redraw |= host.toasts.expire();

        let render_time = if frame_due(redraw, visibility) {
            let render_start = Instant::now();
            face.render_frame(&mut sink, &host.clock, &host.battery, &ChronoCalendar).ok();
            if let Some(toast) = host.toasts.active() {
                draw_toast(sink.target_mut(), toast);
            }
            Some(render_start.elapsed())
        } else {
            None
        };

        window.update(sink.target());

        // ---------------------------------------------------------------------
        // Frame pacing
        // ---------------------------------------------------------------------

        let pre_sleep = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(pre_sleep) {
            thread::sleep(remaining);
        }
        let sleep_time = frame_start.elapsed().saturating_sub(pre_sleep);

        metrics.record_loop(frame_start.elapsed(), render_time, sleep_time);
        metrics.report(face.metrics());
    }

    face.handle(Event::Destroy, &mut host.ports())
        .context("face failed to shut down")?;

    let stats = face.metrics();
    log::info!(
        "ran {} | {} frames drawn, {} skipped, {} taps",
        metrics.uptime_string(),
        stats.frames_drawn,
        stats.frames_skipped,
        stats.taps,
    );
    Ok(())
}

/// Whether to paint this pass. The screen is off while hidden, even though
/// ticks and taps still ask the face for a redraw.
const fn frame_due(redraw: bool, visibility: Visibility) -> bool { redraw && visibility.is_visible() }
