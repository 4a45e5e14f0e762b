//! Roaming scheduler — the self-rescheduling tick loop, plus the cancellable
//! delayed-task slot used for "play this, then go back to idle".

use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

// ── Delayed Task ───────────────────────────────────────

/// Holds at most one pending timer task. Replacing or dropping the slot
/// aborts whatever was in it.
#[derive(Debug, Default)]
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
}

impl DelayedTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handle`, aborting the previous task if one was pending.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        if let Some(old) = self.handle.replace(handle) {
            old.abort();
        }
    }

    /// Abort the pending task. Returns `true` if one was still running.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let live = !handle.is_finished();
                handle.abort();
                live
            }
            None => false,
        }
    }

    /// Forget the pending task without aborting it. Used by a task that is
    /// clearing its own slot.
    pub fn disarm(&mut self) {
        self.handle = None;
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── Roaming Loop ───────────────────────────────────────

/// What the loop drives.
pub trait Roamer: Send + Sync + 'static {
    /// Wait before the next tick.
    fn next_delay(&self) -> Duration;
    /// Run one decision cycle.
    fn tick(&self);
}

/// `stopped ⇄ running` switch around a single loop task.
#[derive(Debug, Default)]
pub struct RoamingScheduler {
    task: Mutex<DelayedTask>,
}

impl RoamingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the loop unless one is already running. Returns `true` if this
    /// call started it.
    pub fn start<R: Roamer>(&self, runtime: &Handle, roamer: Weak<R>) -> bool {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.is_pending() {
            return false;
        }
        task.replace(runtime.spawn(roam_loop(roamer)));
        true
    }

    /// Cancel the pending loop timer. Returns `true` if a loop was running.
    pub fn stop(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_pending()
    }
}

/// Sleep, tick, repeat. Holds only a weak reference so a dropped mascot
/// ends its own loop.
async fn roam_loop<R: Roamer>(roamer: Weak<R>) {
    loop {
        let delay = match roamer.upgrade() {
            Some(r) => r.next_delay(),
            None => break,
        };
        tokio::time::sleep(delay).await;
        match roamer.upgrade() {
            Some(r) => r.tick(),
            None => break,
        }
    }
    tracing::debug!("roaming loop exited");
}
