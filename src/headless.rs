//! Line-by-line countdown without the terminal screen.
//!
//! Ticks come from a [`TokioScheduler`]; every firing prints the remaining
//! time as `DD:HH:MM:SS`, and the run ends with the status message once the
//! target is reached or `shutdown` resolves.

use crate::alarm::Alarm;
use crate::clock::Clock;
use crate::controller::{RunState, TickOutcome, TimerController};
use crate::error::Result;
use crate::scheduler::{ScheduleHandle, TokioScheduler};
use std::future::Future;
use std::io::Write;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// Starts `controller` and prints the countdown to `out` until it ends.
///
/// Returns the final [`RunState`]: `Expired` when the target was reached,
/// `Stopped` when `shutdown` resolved first. Invalid input is returned as
/// [`Error::Validation`](crate::error::Error::Validation) before anything
/// is printed.
pub async fn run<C, A, W, F>(
    controller: &mut TimerController<C, TokioScheduler, A>,
    ticks: &mut UnboundedReceiver<ScheduleHandle>,
    out: &mut W,
    shutdown: F,
) -> Result<RunState>
where
    C: Clock,
    A: Alarm,
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let target = controller.start()?;
    writeln!(out, "Counting down to {target}")?;
    if controller.run_state() == RunState::Expired {
        writeln!(out, "{}", controller.message())?;
        return Ok(RunState::Expired);
    }
    writeln!(out, "{}", controller.remaining())?;
    out.flush()?;

    loop {
        tokio::select! {
            fired = ticks.recv() => {
                let Some(handle) = fired else {
                    debug!("tick channel closed");
                    break;
                };
                match controller.on_fire(handle) {
                    TickOutcome::Updated(remaining) => writeln!(out, "{remaining}")?,
                    TickOutcome::Expired => {
                        writeln!(out, "{}", controller.message())?;
                        break;
                    }
                    TickOutcome::Ignored => {}
                }
                out.flush()?;
            }
            _ = &mut shutdown => {
                if controller.stop() {
                    writeln!(out, "{}", controller.message())?;
                }
                break;
            }
        }
    }
    out.flush()?;
    Ok(controller.run_state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::RecordingAlarm;
    use crate::controller::{MSG_EXPIRED, MSG_STOPPED};
    use crate::error::Error;
    use crate::input::{Meridiem, TimerInput};
    use std::time::Duration;
    use tokio::time::Instant;

    /// Wall clock driven by tokio's (pausable) time.
    struct TokioClock {
        base: i64,
        started: Instant,
    }

    impl Clock for TokioClock {
        fn now_millis(&self) -> i64 {
            self.base + self.started.elapsed().as_millis() as i64
        }
    }

    fn controller_before_target(
        millis: i64,
    ) -> (
        TimerController<TokioClock, TokioScheduler, RecordingAlarm>,
        UnboundedReceiver<ScheduleHandle>,
    ) {
        let input = TimerInput::new("2031-03-14", "9:26", Meridiem::Pm);
        let target = input.target_instant().unwrap();
        let clock = TokioClock {
            base: target.as_millis() - millis,
            started: Instant::now(),
        };
        let (scheduler, ticks) = TokioScheduler::new();
        let mut controller = TimerController::new(clock, scheduler, RecordingAlarm::new());
        *controller.input_mut() = input;
        (controller, ticks)
    }

    fn lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_expiry() {
        let (mut controller, mut ticks) = controller_before_target(3_500);
        let mut out = Vec::new();

        let state = run(
            &mut controller,
            &mut ticks,
            &mut out,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(state, RunState::Expired);
        assert_eq!(controller.alarm().plays(), 1);
        let lines = lines(out);
        assert!(lines[0].starts_with("Counting down to 2031-03-14 09:26 PM"));
        assert_eq!(
            &lines[1..],
            [
                "00:00:00:03",
                "00:00:00:02",
                "00:00:00:01",
                "00:00:00:00",
                MSG_EXPIRED
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops() {
        let (mut controller, mut ticks) = controller_before_target(60_000);
        let mut out = Vec::new();

        let state = run(
            &mut controller,
            &mut ticks,
            &mut out,
            tokio::time::sleep(Duration::from_millis(1_500)),
        )
        .await
        .unwrap();

        assert_eq!(state, RunState::Stopped);
        assert_eq!(controller.handle(), None);
        let lines = lines(out);
        assert_eq!(lines.last().map(String::as_str), Some(MSG_STOPPED));
        assert!(lines.contains(&"00:00:00:59".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_input_prints_nothing() {
        let (scheduler, mut ticks) = TokioScheduler::new();
        let clock = TokioClock {
            base: 0,
            started: Instant::now(),
        };
        let mut controller = TimerController::new(clock, scheduler, RecordingAlarm::new());
        let mut out = Vec::new();

        let err = run(
            &mut controller,
            &mut ticks,
            &mut out,
            std::future::pending(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Validation(ref errors) if errors.len() == 2));
        assert!(out.is_empty());
    }
}
