#![warn(missing_docs)]

//! # countdown-tea
//!
//! A countdown-to-date timer for the terminal, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! The user picks a local date, a 12-hour clock time and AM/PM. Once started,
//! the remaining time is shown as days, hours, minutes and seconds and
//! refreshed every second until the target is reached, at which point an
//! alarm sounds and a completion message appears.
//!
//! ## Overview
//!
//! The countdown itself lives in [`controller::TimerController`], which is
//! independent of any terminal. It talks to the outside world through three
//! small traits:
//!
//! - [`clock::Clock`] for the current instant,
//! - [`scheduler::Scheduler`] for the one-second repeating tick,
//! - [`alarm::Alarm`] for the sound played on expiry.
//!
//! [`app::App`] puts the controller on screen as a bubbletea-rs model, and
//! [`headless::run`] drives it from tokio for plain line output.
//!
//! ## Example
//!
//! ```rust
//! use countdown_tea::prelude::*;
//!
//! let clock = ManualClock::new(0);
//! let mut timer = TimerController::new(clock.clone(), ManualScheduler::new(), SilentAlarm);
//! timer.set_date("2999-12-31");
//! timer.set_time("11:59");
//! timer.set_meridiem(Meridiem::Pm);
//!
//! assert!(timer.validate().is_empty());
//! timer.start().unwrap();
//! assert!(timer.can_stop());
//!
//! timer.stop();
//! assert_eq!(timer.message(), "⏸️ Countdown stopped.");
//! ```
//!
//! ## Focus Management
//!
//! Entry fields on the countdown screen implement [`Component`], which the
//! screen uses to move keyboard focus between them.

pub mod alarm;
pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod headless;
pub mod help;
pub mod input;
pub mod key;
pub mod logging;
pub mod remaining;
pub mod scheduler;
pub mod validation;

use bubbletea_rs::Cmd;

/// Focus handling for screen controls.
///
/// A focused control receives typed keys and renders its cursor; a blurred
/// one ignores keys.
///
/// ```rust
/// use countdown_tea::app::{EntryField, FieldKind};
/// use countdown_tea::Component;
///
/// let mut field = EntryField::new(FieldKind::Date);
/// assert!(!field.focused());
/// field.focus();
/// assert!(field.focused());
/// field.blur();
/// assert!(!field.focused());
/// ```
pub trait Component {
    /// Focuses the control. May return a command to run on focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes focus from the control.
    fn blur(&mut self);

    /// Whether the control is focused.
    fn focused(&self) -> bool;
}

pub use app::App;
pub use controller::{RunState, TickOutcome, TimerController, TimerState};
pub use error::{Error, Result};
pub use input::{Meridiem, TargetInstant, TimerInput};
pub use remaining::RemainingDuration;
pub use validation::{Field, ValidationErrors};

/// Everything needed to build and drive a countdown.
pub mod prelude {
    pub use crate::alarm::{Alarm, AlarmSet, RecordingAlarm, SilentAlarm, TerminalBell};
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::controller::{RunState, TickOutcome, TimerController, TimerState};
    pub use crate::help::Model as HelpModel;
    pub use crate::input::{Meridiem, TargetInstant, TimerInput};
    pub use crate::key::{matches_binding, Binding, Help as KeyHelp, KeyMap, KeyPress};
    pub use crate::remaining::RemainingDuration;
    pub use crate::scheduler::{
        CommandScheduler, ManualScheduler, ScheduleHandle, Scheduler, TickMsg, TokioScheduler,
    };
    pub use crate::validation::{validate, Field, ValidationErrors};
    pub use crate::Component;
}
