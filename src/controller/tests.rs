//! Tests for the countdown controller.

use super::*;
use crate::alarm::{AlarmEvent, RecordingAlarm};
use crate::clock::ManualClock;
use crate::scheduler::ManualScheduler;
use crate::validation::{Field, MSG_FUTURE, MSG_SELECT_DATE, MSG_SELECT_TIME};
use chrono::{Local, Timelike};
use std::cell::RefCell;
use std::rc::Rc;

type TestController = TimerController<ManualClock, ManualScheduler, RecordingAlarm>;

const DATE: &str = "2031-03-14";
const TIME: &str = "9:26";

fn target_of(date: &str, time: &str, meridiem: Meridiem) -> TargetInstant {
    TimerInput::new(date, time, meridiem)
        .target_instant()
        .unwrap()
}

/// A controller whose clock sits `millis_before` ahead of the filled-in target.
fn armed(millis_before: i64) -> (TestController, ManualClock, TargetInstant) {
    let target = target_of(DATE, TIME, Meridiem::Pm);
    let clock = ManualClock::new(target.as_millis() - millis_before);
    let mut timer =
        TimerController::new(clock.clone(), ManualScheduler::new(), RecordingAlarm::new());
    timer.set_date(DATE);
    timer.set_time(TIME);
    timer.set_meridiem(Meridiem::Pm);
    (timer, clock, target)
}

#[test]
fn test_new_controller_is_idle() {
    let timer: TestController =
        TimerController::new(ManualClock::new(0), ManualScheduler::new(), RecordingAlarm::new());

    assert_eq!(timer.run_state(), RunState::Idle);
    assert_eq!(timer.input(), &TimerInput::default());
    assert!(timer.remaining().is_zero());
    assert_eq!(timer.message(), "");
    assert!(timer.errors().is_empty());
    assert!(timer.handle().is_none());
    assert!(timer.can_start());
    assert!(!timer.can_stop());
}

#[test]
fn test_start_valid_runs_and_publishes_immediately() {
    let (mut timer, _clock, target) = armed(90_061_000);

    assert_eq!(timer.start(), Ok(target));
    assert_eq!(timer.run_state(), RunState::Running);
    assert_eq!(timer.target(), Some(target));
    assert_eq!(timer.remaining().padded(), ["01", "01", "01", "01"]);
    assert!(!timer.can_start());
    assert!(timer.can_stop());

    let live = timer.scheduler().live();
    assert_eq!(live.len(), 1);
    assert_eq!(timer.handle(), Some(live[0]));
    assert_eq!(timer.scheduler().period(live[0]), Some(TICK_PERIOD));
}

#[test]
fn test_start_rejects_missing_fields() {
    let mut timer: TestController =
        TimerController::new(ManualClock::new(0), ManualScheduler::new(), RecordingAlarm::new());

    let errors = timer.start().unwrap_err();
    assert_eq!(errors.get(Field::Date), Some(MSG_SELECT_DATE));
    assert_eq!(errors.get(Field::Time), Some(MSG_SELECT_TIME));
    assert_eq!(timer.errors(), &errors);
    assert_eq!(timer.run_state(), RunState::Idle);
    assert_eq!(timer.scheduler().created(), 0);
    assert!(timer.handle().is_none());
}

#[test]
fn test_start_rejects_target_at_now() {
    let (mut timer, _clock, _target) = armed(0);

    let errors = timer.start().unwrap_err();
    assert_eq!(errors.get(Field::Time), Some(MSG_FUTURE));
    assert!(!errors.contains(Field::Date));
    assert_eq!(timer.run_state(), RunState::Idle);
    assert_eq!(timer.scheduler().created(), 0);
}

#[test]
fn test_successful_start_clears_stale_errors() {
    let (mut timer, _clock, _target) = armed(60_000);
    timer.set_time("");
    assert!(timer.start().is_err());
    assert!(timer.errors().contains(Field::Time));

    timer.set_time(TIME);
    assert!(timer.start().is_ok());
    assert!(timer.errors().is_empty());
}

#[test]
fn test_validate_does_not_store_errors() {
    let (mut timer, _clock, _target) = armed(60_000);
    timer.set_date("");
    assert!(timer.validate().contains(Field::Date));
    assert!(timer.errors().is_empty());
}

#[test]
fn test_double_start_keeps_one_schedule() {
    let (mut timer, clock, _target) = armed(10_000);

    timer.start().unwrap();
    let first = timer.handle().unwrap();
    timer.start().unwrap();
    let second = timer.handle().unwrap();

    assert_ne!(first, second);
    assert_eq!(timer.scheduler().live(), vec![second]);
    assert_eq!(timer.scheduler().created(), 2);
    assert_eq!(timer.scheduler().cancelled(), 1);

    // A firing of the first schedule that was already queued does nothing.
    clock.advance(1_000);
    assert_eq!(timer.on_fire(first), TickOutcome::Ignored);
    assert_eq!(timer.remaining().seconds, 10);

    let outcome = timer.on_fire(second);
    assert_eq!(
        outcome,
        TickOutcome::Updated(RemainingDuration::from_millis(9_000))
    );
}

#[test]
fn test_tick_counts_down() {
    let (mut timer, clock, _target) = armed(3_600_000 * 5 + 2_500);
    timer.start().unwrap();
    assert_eq!(timer.remaining().padded(), ["00", "05", "00", "02"]);

    clock.advance(1_000);
    timer.tick();
    assert_eq!(timer.remaining().padded(), ["00", "05", "00", "01"]);

    clock.advance(1_000);
    timer.tick();
    assert_eq!(timer.remaining().padded(), ["00", "05", "00", "00"]);

    clock.advance(1_000);
    timer.tick();
    assert_eq!(timer.remaining().padded(), ["00", "04", "59", "59"]);
}

#[test]
fn test_expiry_happens_once() {
    let (mut timer, clock, target) = armed(2_000);
    timer.start().unwrap();
    let handle = timer.handle().unwrap();

    clock.set(target.as_millis());
    assert_eq!(timer.on_fire(handle), TickOutcome::Expired);

    assert_eq!(timer.run_state(), RunState::Expired);
    assert!(timer.remaining().is_zero());
    assert_eq!(timer.message(), MSG_EXPIRED);
    assert_eq!(timer.alarm().plays(), 1);
    assert!(timer.handle().is_none());
    assert!(timer.scheduler().live().is_empty());

    clock.advance(5_000);
    assert_eq!(timer.on_fire(handle), TickOutcome::Ignored);
    assert_eq!(timer.tick(), TickOutcome::Ignored);
    assert_eq!(timer.alarm().plays(), 1);
    assert!(timer.can_start());
    assert!(!timer.can_stop());
}

#[test]
fn test_expiry_when_tick_arrives_late() {
    let (mut timer, clock, target) = armed(1_000);
    timer.start().unwrap();

    clock.set(target.as_millis() + 42_000);
    assert_eq!(timer.tick(), TickOutcome::Expired);
    assert!(timer.remaining().is_zero());
}

#[test]
fn test_stop_keeps_input_and_remaining() {
    let (mut timer, clock, _target) = armed(90_061_000);
    timer.start().unwrap();
    clock.advance(1_000);
    timer.tick();
    let remaining = timer.remaining();

    assert!(timer.stop());
    assert_eq!(timer.run_state(), RunState::Stopped);
    assert_eq!(timer.message(), MSG_STOPPED);
    assert_eq!(timer.remaining(), remaining);
    assert_eq!(timer.input().date, DATE);
    assert_eq!(timer.input().time, TIME);
    assert!(timer.handle().is_none());
    assert!(timer.scheduler().live().is_empty());

    // Ticks after a stop are ignored
    clock.advance(1_000);
    assert_eq!(timer.tick(), TickOutcome::Ignored);
    assert_eq!(timer.remaining(), remaining);
}

#[test]
fn test_stop_when_not_running_does_nothing() {
    let (mut timer, _clock, _target) = armed(10_000);
    assert!(!timer.stop());
    assert_eq!(timer.run_state(), RunState::Idle);
    assert_eq!(timer.message(), "");
}

#[test]
fn test_restart_after_stop_and_expiry() {
    let (mut timer, clock, target) = armed(10_000);
    timer.start().unwrap();
    timer.stop();

    timer.start().unwrap();
    assert_eq!(timer.run_state(), RunState::Running);
    assert_eq!(timer.message(), "");

    clock.set(target.as_millis());
    timer.tick();
    assert_eq!(timer.run_state(), RunState::Expired);

    // Move the target forward and start again from Expired.
    timer.set_date("2032-03-14");
    timer.start().unwrap();
    assert_eq!(timer.run_state(), RunState::Running);
    assert_eq!(timer.message(), "");
    assert_eq!(timer.scheduler().live().len(), 1);
}

fn assert_reset(timer: &TestController) {
    assert_eq!(timer.run_state(), RunState::Idle);
    assert_eq!(timer.input().date, "");
    assert_eq!(timer.input().time, "");
    assert_eq!(timer.input().meridiem, Meridiem::Am);
    assert_eq!(timer.remaining().padded(), ["00", "00", "00", "00"]);
    assert_eq!(timer.message(), "");
    assert!(timer.errors().is_empty());
    assert!(timer.handle().is_none());
    assert!(timer.target().is_none());
    assert!(timer.scheduler().live().is_empty());
    assert_eq!(
        timer.alarm().events().last_chunk::<2>(),
        Some(&[AlarmEvent::Pause, AlarmEvent::Rewind])
    );
}

#[test]
fn test_reset_from_running() {
    let (mut timer, _clock, _target) = armed(90_061_000);
    timer.start().unwrap();
    timer.reset();
    assert_reset(&timer);
}

#[test]
fn test_reset_from_stopped() {
    let (mut timer, _clock, _target) = armed(90_061_000);
    timer.start().unwrap();
    timer.stop();
    timer.reset();
    assert_reset(&timer);
}

#[test]
fn test_reset_from_expired() {
    let (mut timer, clock, target) = armed(1_000);
    timer.start().unwrap();
    clock.set(target.as_millis());
    timer.tick();
    timer.reset();
    assert_reset(&timer);
    assert_eq!(
        timer.alarm().events(),
        &[AlarmEvent::Play, AlarmEvent::Pause, AlarmEvent::Rewind]
    );
}

#[test]
fn test_reset_clears_validation_errors() {
    let (mut timer, _clock, _target) = armed(0);
    assert!(timer.start().is_err());
    timer.reset();
    assert_reset(&timer);
}

#[test]
fn test_reset_selects_am_after_pm() {
    let (mut timer, _clock, _target) = armed(60_000);
    assert_eq!(timer.input().meridiem, Meridiem::Pm);
    timer.start().unwrap();
    timer.reset();
    assert_eq!(timer.input().meridiem, Meridiem::Am);
}

#[test]
fn test_tomorrow_midnight() {
    let now = Local::now();
    let tomorrow = now.date_naive().succ_opt().unwrap();
    let clock = ManualClock::new(now.timestamp_millis());
    let mut timer: TestController =
        TimerController::new(clock, ManualScheduler::new(), RecordingAlarm::new());
    timer.set_date(tomorrow.format("%Y-%m-%d").to_string());
    timer.set_time("12:00");
    timer.set_meridiem(Meridiem::Am);

    let target = timer.start().unwrap();
    let local = target.to_local().unwrap();
    assert_eq!(local.date_naive(), tomorrow);
    assert_eq!(local.hour(), 0);
    assert_eq!(local.minute(), 0);

    let days = &timer.remaining().padded()[0];
    assert!(days == "00" || days == "01", "unexpected days field {days}");
}

/// Scheduler whose bookkeeping outlives the controller that owns it.
#[derive(Clone, Default)]
struct SharedScheduler(Rc<RefCell<ManualScheduler>>);

impl Scheduler for SharedScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> ScheduleHandle {
        self.0.borrow_mut().schedule_repeating(period)
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.0.borrow_mut().cancel(handle)
    }
}

#[test]
fn test_drop_cancels_live_schedule() {
    let scheduler = SharedScheduler::default();
    let target = target_of(DATE, TIME, Meridiem::Pm);
    {
        let mut timer = TimerController::new(
            ManualClock::new(target.as_millis() - 60_000),
            scheduler.clone(),
            RecordingAlarm::new(),
        );
        timer.set_date(DATE);
        timer.set_time(TIME);
        timer.set_meridiem(Meridiem::Pm);
        timer.start().unwrap();
        assert_eq!(scheduler.0.borrow().live().len(), 1);
    }
    assert!(scheduler.0.borrow().live().is_empty());
    assert_eq!(scheduler.0.borrow().cancelled(), 1);
}
