use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Shared stop/resume signal for one scheduler session.
///
/// `stop` is checked at the top of every cycle and deterministically prevents
/// any further cycle from running; it also wakes a paused or sleeping session
/// immediately. `resume` is the explicit external re-arm required to leave
/// `Paused` (the source reporting `Playing` again is not enough on its own).
#[derive(Debug, Default)]
pub struct SessionControl {
    stopped: AtomicBool,
    resume_requested: AtomicBool,
    gate: Mutex<()>,
    wake: Condvar,
}

impl SessionControl {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Request session shutdown. Idempotent.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.notify();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Request that a paused session re-enter `Running`. A no-op while the
    /// session is not paused (the pending request is dropped on pause entry).
    pub fn resume(&self) {
        self.resume_requested.store(true, Ordering::SeqCst);
        self.notify();
    }

    /// Notify under the gate lock, so a waiter that has checked state but not
    /// yet parked cannot miss the wakeup.
    fn notify(&self) {
        let _guard = self
            .gate
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        self.wake.notify_all();
    }

    /// Consume a pending resume request, if any.
    pub(crate) fn take_resume(&self) -> bool {
        self.resume_requested.swap(false, Ordering::SeqCst)
    }

    /// Block for up to `timeout`, waking early on `stop` or `resume`.
    pub(crate) fn wait(&self, timeout: Duration) {
        if self.is_stopped() {
            return;
        }
        let guard = self
            .gate
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if self.is_stopped() {
            return;
        }
        // Wakeups may be spurious; callers re-check state after returning.
        let _ = self
            .wake
            .wait_timeout(guard, timeout)
            .unwrap_or_else(std::sync::PoisonError::into_inner);
    }

    /// Sleep for `dur` unless (or until) the session is stopped.
    pub(crate) fn sleep(&self, dur: Duration) {
        let deadline = Instant::now() + dur;
        loop {
            if self.is_stopped() {
                return;
            }
            let Some(remaining) = deadline
                .checked_duration_since(Instant::now())
                .filter(|d| !d.is_zero())
            else {
                return;
            };
            self.wait(remaining);
        }
    }
}
