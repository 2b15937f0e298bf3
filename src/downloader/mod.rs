//! Core downloader implementation split into focused submodules.
//!
//! The `MediaDownloader` struct and its methods are organized by domain:
//! - [`enqueue`] - Job validation, registration and dispatch
//! - [`query`] - Status, result and listing lookups
//! - [`worker`] - The single background worker that drives the fetch engine
//! - [`lifecycle`] - Shutdown coordination

mod enqueue;
mod lifecycle;
mod query;
mod worker;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::dispatch::{DispatchReceiver, DispatchSender, dispatch_queue};
use crate::engine::{CliFetchEngine, FetchEngine, NoOpFetchEngine};
use crate::error::{Error, Result};
use crate::registry::JobRegistry;
use crate::types::Event;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct MediaDownloader {
    /// Every job ever enqueued
    pub(crate) registry: JobRegistry,
    /// Producer side of the dispatch queue
    pub(crate) dispatch: DispatchSender,
    /// Consumer side, taken by the worker when it starts
    pub(crate) receiver: Arc<Mutex<Option<DispatchReceiver>>>,
    /// Fetch engine (trait object for pluggable implementations)
    pub(crate) engine: Arc<dyn FetchEngine>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Whether new jobs are accepted (set to false during shutdown)
    pub(crate) accepting_new: Arc<AtomicBool>,
    /// Stops the worker from taking further jobs
    pub(crate) shutdown_token: CancellationToken,
}

impl MediaDownloader {
    /// Create a new MediaDownloader instance
    ///
    /// Validates the configuration, creates the output directory and selects a
    /// fetch engine: the configured `yt-dlp` binary, one found on PATH, or a
    /// [`NoOpFetchEngine`] that fails every job when neither is available.
    ///
    /// The worker is not started; call [`start_worker`](Self::start_worker).
    pub async fn new(config: Config) -> Result<Self> {
        let engine: Arc<dyn FetchEngine> = match CliFetchEngine::from_config(&config.engine) {
            Some(engine) => Arc::new(engine),
            None => {
                tracing::warn!(
                    "yt-dlp not found; jobs will fail until engine.binary_path is configured"
                );
                Arc::new(NoOpFetchEngine)
            }
        };
        Self::with_engine(config, engine).await
    }

    /// Create a MediaDownloader around a caller-supplied fetch engine
    pub async fn with_engine(config: Config, engine: Arc<dyn FetchEngine>) -> Result<Self> {
        config.validate()?;

        tokio::fs::create_dir_all(&config.download.output_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create output directory '{}': {}",
                        config.download.output_dir.display(),
                        e
                    ),
                ))
            })?;

        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (dispatch, receiver) = dispatch_queue();

        tracing::info!(
            engine = engine.name(),
            output_dir = %config.download.output_dir.display(),
            "Media downloader initialized"
        );

        Ok(Self {
            registry: JobRegistry::new(),
            dispatch,
            receiver: Arc::new(Mutex::new(Some(receiver))),
            engine,
            config: Arc::new(config),
            event_tx,
            accepting_new: Arc::new(AtomicBool::new(true)),
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Subscribe to job lifecycle events
    ///
    /// Each subscriber receives all events independently. A subscriber that falls
    /// more than 1000 events behind receives `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Name of the active fetch engine
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    // No receivers is fine; the event is dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    pub fn spawn_api_server(&self) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = Arc::new(self.clone());
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
