//! # media-dl
//!
//! Queued remote media downloader: accepts page URLs, fetches them one at a
//! time through an external engine (yt-dlp), and serves the finished video or
//! audio file back over a small REST API with pollable progress.
//!
//! ## Overview
//!
//! - [`MediaDownloader`] owns the job registry, the FIFO dispatch queue and the
//!   single background worker.
//! - [`engine::FetchEngine`] abstracts the fetch tool; [`CliFetchEngine`] drives
//!   the `yt-dlp` binary.
//! - [`api`] exposes the downloader over HTTP (axum).
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_dl::{Config, MediaDownloader, OutputKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = MediaDownloader::new(Config::default()).await?;
//!     downloader.start_worker();
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let receipt = downloader.enqueue("https://example.com/watch?v=1", OutputKind::Audio, None)?;
//!     println!("{}", receipt.message);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Engine error classification
pub mod classify;
/// Configuration types
pub mod config;
/// FIFO hand-off between enqueue and the worker
pub mod dispatch;
/// Job service (decomposed into focused submodules)
pub mod downloader;
/// Fetch engines
pub mod engine;
/// Error types
pub mod error;
/// Quality labels and engine format directives
pub mod format;
/// Queue position computation
pub mod position;
/// In-memory job store
pub mod registry;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use classify::{ClassifiedError, ErrorCategory};
pub use config::Config;
pub use downloader::MediaDownloader;
pub use engine::{
    CliFetchEngine, FetchEngine, FetchOutcome, FetchRequest, NoOpFetchEngine, ProgressCallback,
    ProgressUpdate,
};
pub use error::{ApiError, EngineError, Error, ErrorDetail, Result, ToHttpStatus};
pub use types::{
    EnqueueReceipt, Event, Job, JobId, JobInfo, JobResult, OutputKind, QueueStats, Status,
};

/// Helper function to run the downloader with graceful signal handling.
///
/// Waits for a termination signal and then calls the downloader's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use media_dl::{Config, MediaDownloader, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = MediaDownloader::new(Config::default()).await?;
///     let worker = downloader.start_worker();
///
///     run_with_shutdown(downloader).await?;
///     worker.await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: MediaDownloader) -> Result<()> {
    wait_for_signal().await;
    tracing::info!("Shutdown signal received");
    downloader.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, tests)
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!(signal = "SIGTERM", "Received termination signal"),
                _ = sigint.recv() => tracing::info!(signal = "SIGINT", "Received termination signal"),
            }
        }
        (Ok(mut only), Err(e)) | (Err(e), Ok(mut only)) => {
            tracing::warn!(error = %e, "Could not register both signal handlers, waiting on the other");
            only.recv().await;
            tracing::info!("Received termination signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!(signal = "ctrl_c", "Received termination signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
