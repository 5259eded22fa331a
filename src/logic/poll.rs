//! Poll Scheduler: cancellable repeating tasks bound to the lifetime of their owner.
//!
//! Each tick is awaited inside the task before the next one is scheduled, so a task never has
//! more than one fetch in flight. Dropping the [`PollHandle`] aborts the task at its current
//! await point; a response that arrives afterwards is never applied.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Public spectator view refresh.
pub const PUBLIC_VIEW_PERIOD: Duration = Duration::from_secs(15);
/// Live scoreboard refresh.
pub const LIVE_SCOREBOARD_PERIOD: Duration = Duration::from_secs(5);
/// Tablet board status refresh.
pub const TABLET_STATUS_PERIOD: Duration = Duration::from_secs(10);

const MIN_PERIOD: Duration = Duration::from_millis(10);

/// When the first tick fires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FirstTick {
    /// Right away (data polls: fetch on mount).
    Immediate,
    /// One period after spawning (auto-advance).
    AfterPeriod,
}

/// Owning handle of a repeating task. Aborts the task when cancelled or dropped.
#[derive(Debug)]
pub struct PollHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            log::debug!("Stopping {} timer", self.name);
        }
        self.task.abort();
    }
}

/// Spawn `tick` every `period` on the current Tokio runtime until it returns
/// `ControlFlow::Break` or the handle is dropped.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_periodic<F, Fut>(
    name: &'static str,
    period: Duration,
    first: FirstTick,
    mut tick: F,
) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ControlFlow<()>> + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    let task = tokio::spawn(async move {
        let start = match first {
            FirstTick::Immediate => Instant::now(),
            FirstTick::AfterPeriod => Instant::now() + period,
        };
        let mut interval = time::interval_at(start, period);
        // A slow fetch pushes the schedule back instead of bursting to catch up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tick().await.is_break() {
                log::debug!("{} timer finished", name);
                break;
            }
        }
    });
    log::debug!("Started {} timer every {:?}", name, period);
    PollHandle { name, task }
}
