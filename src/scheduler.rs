//! Repeating-callback scheduling behind a cancel handle.
//!
//! The countdown controller asks a [`Scheduler`] for one repeating schedule
//! per start and cancels it on stop, reset, expiry and drop. Each schedule is
//! identified by a [`ScheduleHandle`]. Every firing carries its handle, so a
//! firing that was already queued when the schedule was cancelled can be
//! recognised and dropped.
//!
//! Two hosts are provided:
//!
//! - [`CommandScheduler`] for bubbletea-rs programs. Each period is a one-shot
//!   bubbletea `tick` command that is re-armed after it fires.
//! - [`TokioScheduler`] for headless use. Each schedule is a tokio interval
//!   task feeding handles into an mpsc channel.
//!
//! [`ManualScheduler`] records schedules without any runtime and is what the
//! controller tests use.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

static LAST_HANDLE: AtomicU64 = AtomicU64::new(0);

/// Identifies one live repeating schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    /// Allocates a process-unique handle, starting from 1.
    pub fn next() -> Self {
        Self(LAST_HANDLE.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The raw id.
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A host primitive that fires a handle every `period` until cancelled.
pub trait Scheduler {
    /// Starts a new repeating schedule and returns its handle.
    fn schedule_repeating(&mut self, period: Duration) -> ScheduleHandle;

    /// Cancels `handle`. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: ScheduleHandle);
}

/// Message delivered to a bubbletea program each time a schedule fires.
#[derive(Debug, Clone, Copy)]
pub struct TickMsg {
    /// The schedule that fired.
    pub handle: ScheduleHandle,
}

/// Scheduler for bubbletea-rs programs.
///
/// Scheduling only records the first tick command. The program drains it with
/// [`take_command`](Self::take_command) after each update and, when a
/// [`TickMsg`] arrives, asks [`rearm`](Self::rearm) for the next one.
#[derive(Default)]
pub struct CommandScheduler {
    active: Option<(ScheduleHandle, Duration)>,
    pending: Option<Cmd>,
}

impl CommandScheduler {
    /// Creates a scheduler with no live schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// The live handle, if any.
    pub fn active(&self) -> Option<ScheduleHandle> {
        self.active.map(|(handle, _)| handle)
    }

    /// Whether `handle` is the live schedule.
    pub fn is_active(&self, handle: ScheduleHandle) -> bool {
        self.active() == Some(handle)
    }

    /// Takes the first tick command of a freshly created schedule.
    pub fn take_command(&mut self) -> Option<Cmd> {
        self.pending.take()
    }

    /// Returns the next tick command if `handle` is still live.
    pub fn rearm(&mut self, handle: ScheduleHandle) -> Option<Cmd> {
        match self.active {
            Some((live, period)) if live == handle => Some(tick_command(handle, period)),
            _ => None,
        }
    }
}

impl fmt::Debug for CommandScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandScheduler")
            .field("active", &self.active)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl Scheduler for CommandScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> ScheduleHandle {
        let handle = ScheduleHandle::next();
        self.active = Some((handle, period));
        self.pending = Some(tick_command(handle, period));
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        if self.is_active(handle) {
            self.active = None;
            self.pending = None;
        }
    }
}

fn tick_command(handle: ScheduleHandle, period: Duration) -> Cmd {
    bubbletea_tick(period, move |_| Box::new(TickMsg { handle }) as Msg)
}

/// Scheduler backed by tokio interval tasks.
///
/// Must be used from within a tokio runtime. Firings arrive on the receiver
/// returned by [`TokioScheduler::new`].
#[derive(Debug)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<ScheduleHandle>,
    tasks: HashMap<ScheduleHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Creates the scheduler and the receiving end of its firings.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScheduleHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }

    /// Number of schedules still running.
    pub fn live(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> ScheduleHandle {
        let handle = ScheduleHandle::next();
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

/// Scheduler that fires only when the caller says so.
///
/// Keeps a record of every schedule it created so tests can check that
/// exactly one is live.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    live: Vec<(ScheduleHandle, Duration)>,
    created: usize,
    cancelled: usize,
}

impl ManualScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles that have not been cancelled, oldest first.
    pub fn live(&self) -> Vec<ScheduleHandle> {
        self.live.iter().map(|(handle, _)| *handle).collect()
    }

    /// The period of a live handle.
    pub fn period(&self, handle: ScheduleHandle) -> Option<Duration> {
        self.live
            .iter()
            .find(|(live, _)| *live == handle)
            .map(|(_, period)| *period)
    }

    /// Total schedules ever created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Total schedules cancelled.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> ScheduleHandle {
        let handle = ScheduleHandle::next();
        self.live.push((handle, period));
        self.created += 1;
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        let before = self.live.len();
        self.live.retain(|(live, _)| *live != handle);
        if self.live.len() < before {
            self.cancelled += 1;
        }
    }
}
