//! Shutdown coordination.

use std::sync::atomic::Ordering;
use std::time::Duration;

use super::MediaDownloader;
use crate::error::Result;
use crate::types::Event;

/// How long shutdown waits for an in-flight job
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval while waiting for the in-flight job
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl MediaDownloader {
    /// Gracefully shut down the downloader
    ///
    /// 1. Stops accepting new jobs (`enqueue` returns `ShuttingDown`)
    /// 2. Tells the worker not to take further jobs
    /// 3. Waits up to 30 seconds for the in-flight job, if any, to finish
    /// 4. Emits [`Event::Shutdown`]
    ///
    /// Jobs still queued stay `Queued`; the in-flight job is never cancelled.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.accepting_new.store(false, Ordering::SeqCst);
        self.shutdown_token.cancel();
        tracing::info!("Stopped accepting new jobs");

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.wait_for_in_flight()).await {
            Ok(()) => tracing::info!("No job in flight"),
            Err(_) => tracing::warn!("Timeout waiting for the in-flight job, proceeding with shutdown"),
        }

        self.emit_event(Event::Shutdown);
        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Whether `enqueue` still accepts jobs
    pub fn is_accepting(&self) -> bool {
        self.accepting_new.load(Ordering::SeqCst)
    }

    async fn wait_for_in_flight(&self) {
        loop {
            let downloading = self.registry.stats().downloading;
            if downloading == 0 {
                return;
            }
            tracing::debug!(downloading, "Waiting for in-flight job to complete");
            tokio::time::sleep(SHUTDOWN_POLL_INTERVAL).await;
        }
    }
}
