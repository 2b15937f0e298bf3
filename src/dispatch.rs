//! FIFO dispatch queue between producers and the worker
//!
//! Backed by an unbounded tokio channel: pushing never blocks, and only the single
//! receiving worker ever waits.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::types::JobId;

/// Create a connected sender/receiver pair
pub fn dispatch_queue() -> (DispatchSender, DispatchReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let pending = Arc::new(AtomicUsize::new(0));
    (
        DispatchSender {
            tx,
            pending: pending.clone(),
        },
        DispatchReceiver { rx, pending },
    )
}

/// Producer side, cloneable
#[derive(Clone, Debug)]
pub struct DispatchSender {
    tx: mpsc::UnboundedSender<JobId>,
    pending: Arc<AtomicUsize>,
}

impl DispatchSender {
    /// Append a job id. Never blocks; fails only once the receiver is gone.
    pub fn push(&self, id: JobId) -> Result<()> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.tx.send(id).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            Error::ShuttingDown
        })
    }

    /// Number of ids pushed but not yet popped
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

/// Consumer side, owned by the worker
#[derive(Debug)]
pub struct DispatchReceiver {
    rx: mpsc::UnboundedReceiver<JobId>,
    pending: Arc<AtomicUsize>,
}

impl DispatchReceiver {
    /// Wait for the next id. Returns `None` once every sender has been dropped
    /// and the queue is drained.
    pub async fn pop(&mut self) -> Option<JobId> {
        let id = self.rx.recv().await?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(id)
    }

    /// Number of ids waiting
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}
