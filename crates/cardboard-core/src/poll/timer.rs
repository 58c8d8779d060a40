//! One-shot timers that post a command back to the controller.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Handle to a scheduled message. Cancelling aborts the sleeping task; a
/// message already delivered stays delivered.
#[derive(Debug)]
pub(crate) struct TimerHandle {
    abort: AbortHandle,
    due: Instant,
}

impl TimerHandle {
    pub(crate) fn due(&self) -> Instant {
        self.due
    }

    pub(crate) fn cancel(self) {
        self.abort.abort();
    }
}

/// Send `message` on `tx` after `delay`.
pub(crate) fn schedule_after<T: Send + 'static>(
    delay: Duration,
    tx: UnboundedSender<T>,
    message: T,
) -> TimerHandle {
    let due = Instant::now() + delay;
    let task = tokio::spawn(async move {
        tokio::time::sleep_until(due).await;
        // Receiver gone means the controller already exited.
        let _ = tx.send(message);
    });
    TimerHandle {
        abort: task.abort_handle(),
        due,
    }
}
