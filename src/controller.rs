//! The countdown state machine.
//!
//! [`TimerController`] owns the whole countdown: the user's input, the
//! validation messages, the remaining time shown to the user, the status
//! message and the [`RunState`]. It reads time from a [`Clock`], asks a
//! [`Scheduler`] for a one-second repeating tick, and rings an [`Alarm`] on
//! expiry.
//!
//! ```text
//!            start (valid)            target reached
//!   Idle ───────────────────▶ Running ───────────────▶ Expired
//!    ▲                         │  ▲                       │
//!    │ reset            stop   │  │ start (valid)         │
//!    │                         ▼  │                       │
//!    └──────────────────────── Stopped ◀──────────────────┘
//!                     reset from any state        start (valid)
//! ```
//!
//! The controller holds at most one schedule handle, and holds one exactly
//! while it is [`RunState::Running`]. Dropping the controller cancels it.
//!
//! # Examples
//!
//! ```rust
//! use countdown_tea::alarm::RecordingAlarm;
//! use countdown_tea::clock::ManualClock;
//! use countdown_tea::controller::{RunState, TimerController};
//! use countdown_tea::input::Meridiem;
//! use countdown_tea::scheduler::ManualScheduler;
//!
//! let clock = ManualClock::new(0);
//! let mut timer = TimerController::new(clock.clone(), ManualScheduler::new(), RecordingAlarm::new());
//! timer.set_date("2999-01-01");
//! timer.set_time("9:30");
//! timer.set_meridiem(Meridiem::Pm);
//!
//! let target = timer.start().unwrap();
//! assert_eq!(timer.run_state(), RunState::Running);
//!
//! clock.set(target.as_millis());
//! timer.tick();
//! assert_eq!(timer.run_state(), RunState::Expired);
//! assert_eq!(timer.alarm().plays(), 1);
//! ```

use crate::alarm::Alarm;
use crate::clock::Clock;
use crate::input::{Meridiem, TargetInstant, TimerInput};
use crate::remaining::RemainingDuration;
use crate::scheduler::{ScheduleHandle, Scheduler};
use crate::validation::{validate, validate_target, ValidationErrors};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Status message once the target has been reached.
pub const MSG_EXPIRED: &str = "🎉 Time is up!";

/// Status message after a manual stop.
pub const MSG_STOPPED: &str = "⏸️ Countdown stopped.";

/// Where the countdown is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Nothing started since the last reset.
    #[default]
    Idle,
    /// Counting down.
    Running,
    /// Stopped by the user before the target.
    Stopped,
    /// The target was reached.
    Expired,
}

impl RunState {
    /// Whether a tick schedule is live.
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Stopped => "stopped",
            RunState::Expired => "expired",
        })
    }
}

/// Everything a view needs to render the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerState {
    /// The target as entered.
    pub input: TimerInput,
    /// Time left at the last tick.
    pub remaining: RemainingDuration,
    /// Status line, empty when there is nothing to say.
    pub message: String,
    /// Messages from the last validation.
    pub errors: ValidationErrors,
    /// Lifecycle state.
    pub run_state: RunState,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The controller was not running, or the firing was stale.
    Ignored,
    /// The remaining time was recomputed.
    Updated(RemainingDuration),
    /// The target was reached on this tick.
    Expired,
}

/// Counts down to a user-chosen local date and time.
pub struct TimerController<C: Clock, S: Scheduler, A: Alarm> {
    clock: C,
    scheduler: S,
    alarm: A,
    state: TimerState,
    target: Option<TargetInstant>,
    handle: Option<ScheduleHandle>,
}

impl<C: Clock, S: Scheduler, A: Alarm> TimerController<C, S, A> {
    /// Creates an idle controller with empty input.
    pub fn new(clock: C, scheduler: S, alarm: A) -> Self {
        Self {
            clock,
            scheduler,
            alarm,
            state: TimerState::default(),
            target: None,
            handle: None,
        }
    }

    /// Full view state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// The input as entered.
    pub fn input(&self) -> &TimerInput {
        &self.state.input
    }

    /// Mutable access to the input fields.
    pub fn input_mut(&mut self) -> &mut TimerInput {
        &mut self.state.input
    }

    /// Replaces the date text.
    pub fn set_date(&mut self, date: impl Into<String>) {
        self.state.input.date = date.into();
    }

    /// Replaces the time text.
    pub fn set_time(&mut self, time: impl Into<String>) {
        self.state.input.time = time.into();
    }

    /// Selects AM or PM.
    pub fn set_meridiem(&mut self, meridiem: Meridiem) {
        self.state.input.meridiem = meridiem;
    }

    /// Time left at the last tick.
    pub fn remaining(&self) -> RemainingDuration {
        self.state.remaining
    }

    /// Status line.
    pub fn message(&self) -> &str {
        &self.state.message
    }

    /// Messages from the last validation.
    pub fn errors(&self) -> &ValidationErrors {
        &self.state.errors
    }

    /// Lifecycle state.
    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    /// The instant computed by the last successful start.
    pub fn target(&self) -> Option<TargetInstant> {
        self.target
    }

    /// The live schedule, present exactly while running.
    pub fn handle(&self) -> Option<ScheduleHandle> {
        self.handle
    }

    /// Whether the Start control is enabled.
    pub fn can_start(&self) -> bool {
        !self.state.run_state.is_running()
    }

    /// Whether the Stop control is enabled.
    pub fn can_stop(&self) -> bool {
        self.state.run_state.is_running()
    }

    /// The clock in use.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The scheduler in use.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the scheduler, for hosts that drain commands from it.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The alarm in use.
    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    /// Validates the current input against the current instant.
    ///
    /// Does not touch the stored errors; [`start`](Self::start) does that.
    pub fn validate(&self) -> ValidationErrors {
        validate(&self.state.input, self.clock.now_millis())
    }

    /// Validates the input and, if it is valid, starts counting down.
    ///
    /// The stored errors are replaced by this validation either way. On
    /// success any previous schedule is cancelled before a new one is made,
    /// and the remaining time is published right away.
    pub fn start(&mut self) -> Result<TargetInstant, ValidationErrors> {
        let target = match validate_target(&self.state.input, self.clock.now_millis()) {
            Ok(target) => target,
            Err(errors) => {
                debug!(%errors, "start rejected");
                self.state.errors = errors.clone();
                return Err(errors);
            }
        };
        self.state.errors.clear();

        self.cancel_schedule();
        self.state.message.clear();
        self.state.run_state = RunState::Running;
        self.target = Some(target);
        let handle = self.scheduler.schedule_repeating(TICK_PERIOD);
        self.handle = Some(handle);
        info!(%target, %handle, "countdown started");

        self.tick();
        Ok(target)
    }

    /// Recomputes the remaining time; expires the countdown once it reaches zero.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.run_state.is_running() {
            return TickOutcome::Ignored;
        }
        let Some(target) = self.target else {
            return TickOutcome::Ignored;
        };

        let diff = target.millis_from(self.clock.now_millis());
        if diff <= 0 {
            self.cancel_schedule();
            self.state.run_state = RunState::Expired;
            self.state.remaining = RemainingDuration::ZERO;
            self.state.message = MSG_EXPIRED.to_string();
            self.alarm.play();
            info!(%target, "countdown expired");
            return TickOutcome::Expired;
        }

        let remaining = RemainingDuration::from_millis(diff);
        self.state.remaining = remaining;
        debug!(%remaining, "tick");
        TickOutcome::Updated(remaining)
    }

    /// Host entry point for a schedule firing.
    ///
    /// Firings of any handle other than the live one are ignored.
    pub fn on_fire(&mut self, handle: ScheduleHandle) -> TickOutcome {
        if self.handle != Some(handle) {
            debug!(%handle, "stale tick ignored");
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    /// Stops a running countdown, keeping the input and the remaining time.
    ///
    /// Returns `false` without changing anything when not running.
    pub fn stop(&mut self) -> bool {
        if !self.state.run_state.is_running() {
            return false;
        }
        self.cancel_schedule();
        self.state.run_state = RunState::Stopped;
        self.state.message = MSG_STOPPED.to_string();
        info!(remaining = %self.state.remaining, "countdown stopped");
        true
    }

    /// Returns to the idle state with empty input, AM selected and a
    /// silenced alarm.
    pub fn reset(&mut self) {
        self.cancel_schedule();
        self.target = None;
        self.state.input.clear(Meridiem::Am);
        self.state.remaining = RemainingDuration::ZERO;
        self.state.message.clear();
        self.state.errors.clear();
        self.state.run_state = RunState::Idle;
        self.alarm.pause();
        self.alarm.rewind();
        info!("countdown reset");
    }

    fn cancel_schedule(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
            debug!(%handle, "schedule cancelled");
        }
    }
}

impl<C: Clock, S: Scheduler, A: Alarm> Drop for TimerController<C, S, A> {
    fn drop(&mut self) {
        self.cancel_schedule();
    }
}

impl<C: Clock, S: Scheduler, A: Alarm> fmt::Debug for TimerController<C, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerController")
            .field("state", &self.state)
            .field("target", &self.target)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
