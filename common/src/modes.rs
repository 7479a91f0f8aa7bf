//! Power and visibility modes.
//!
//! The refresh cadence is a function of exactly these two values:
//!
//! | Visibility | Power mode | Per-second timer |
//! |------------|------------|------------------|
//! | Visible | Interactive | running |
//! | Visible | Ambient | suspended (minute ticks only) |
//! | Hidden | either | suspended |

/// Display power state.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum PowerMode {
    /// Full-power state with per-second refresh and the second hand shown.
    #[default]
    Interactive,

    /// Low-power state. Refreshed only on platform time ticks; no second hand.
    Ambient,
}

impl PowerMode {
    /// Map the host's "in ambient mode" flag.
    #[inline]
    pub const fn from_ambient(in_ambient: bool) -> Self {
        if in_ambient { Self::Ambient } else { Self::Interactive }
    }

    #[inline]
    pub const fn is_ambient(self) -> bool { matches!(self, Self::Ambient) }

    /// Toggle between the two modes.
    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Interactive => Self::Ambient,
            Self::Ambient => Self::Interactive,
        }
    }
}

/// Whether the face is currently on screen.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Visibility {
    Visible,
    #[default]
    Hidden,
}

impl Visibility {
    #[inline]
    pub const fn from_visible(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }

    #[inline]
    pub const fn is_visible(self) -> bool { matches!(self, Self::Visible) }

    #[inline]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }
}

/// Snapshot of the two mode flags the scheduler's liveness check reads.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Modes {
    pub visibility: Visibility,
    pub power: PowerMode,
}

impl Modes {
    /// Whether the per-second timer should be running.
    #[inline]
    pub const fn should_run(self) -> bool { self.visibility.is_visible() && !self.power.is_ambient() }
}
