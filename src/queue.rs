//! Provisioning work queue
//!
//! An unbounded FIFO of logins shared between the startup reconciler and the
//! webhook handlers (producers) and the single provisioning worker
//! (consumer). The channel handle is passed explicitly to everything that
//! touches it; there is no process-global queue.
//!
//! Items are held only in memory. If the process dies before the worker
//! drains an item, the next startup reconciliation pass re-enqueues that
//! user anyway.

use tokio::sync::mpsc;
use tracing::debug;

/// Producer handle for the provisioning queue. Cheap to clone.
#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::UnboundedSender<String>,
}

/// Consumer side of the provisioning queue. Exactly one exists per process.
pub struct WorkReceiver {
    rx: mpsc::UnboundedReceiver<String>,
}

/// Create a connected queue/receiver pair.
pub fn work_queue() -> (WorkQueue, WorkReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (WorkQueue { tx }, WorkReceiver { rx })
}

impl WorkQueue {
    /// Enqueue a login for provisioning.
    ///
    /// Never fails in practice: the receiver lives for the whole process. If
    /// the worker is somehow gone the item is dropped, which matches the
    /// at-most-once semantics of the rest of the pipeline.
    pub fn enqueue(&self, login: impl Into<String>) {
        let login = login.into();
        if self.tx.send(login.clone()).is_err() {
            debug!("Worker gone; dropping provisioning request for {}", login);
        }
    }
}

impl WorkReceiver {
    /// Wait for the next login, or `None` once every producer is dropped.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv); `None` when the queue
    /// is currently empty.
    pub fn try_recv(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}
