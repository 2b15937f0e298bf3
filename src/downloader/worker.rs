//! Worker: takes jobs off the dispatch queue one at a time and drives the engine.

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

use futures::FutureExt;

use super::MediaDownloader;
use crate::classify::classify;
use crate::engine::{FetchRequest, ProgressCallback, ProgressUpdate, locate_output};
use crate::format;
use crate::types::{Event, Job, JobId, JobResult, Status};
use crate::utils::{display_name, output_template};

/// Progress text when the worker picks a job up
pub(crate) const STARTING_MESSAGE: &str = "Starting download...";
/// Progress text once the result is available
pub(crate) const READY_MESSAGE: &str = "Ready to download";
/// Failure detail when the engine succeeded but wrote nothing we can find
pub(crate) const OUTPUT_NOT_FOUND: &str = "downloaded file not found";
/// Failure detail recorded when the per-job body panics
pub(crate) const INTERNAL_FAILURE: &str = "internal error while processing the job";

impl MediaDownloader {
    /// Start the background worker
    ///
    /// The worker processes one job at a time in FIFO order until
    /// [`shutdown`](Self::shutdown) is called. A job that fails or panics is
    /// recorded as `Error` and the loop continues.
    ///
    /// Only the first call starts a worker; later calls log a warning and return a
    /// handle to a task that finishes immediately.
    pub fn start_worker(&self) -> tokio::task::JoinHandle<()> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(mut receiver) = receiver else {
            tracing::warn!("Worker already started, ignoring");
            return tokio::spawn(async {});
        };

        let downloader = self.clone();
        tokio::spawn(async move {
            tracing::info!(engine = downloader.engine.name(), "Worker started");
            loop {
                let next = tokio::select! {
                    _ = downloader.shutdown_token.cancelled() => None,
                    id = receiver.pop() => id,
                };
                let Some(id) = next else {
                    break;
                };
                downloader.process_job(id).await;
            }
            tracing::info!(pending = receiver.pending(), "Worker stopped");
        })
    }

    /// Run one job to a terminal state
    pub(crate) async fn process_job(&self, id: JobId) {
        let job = match self.registry.get(id) {
            Ok(job) => job,
            Err(_) => {
                tracing::warn!(job_id = %id, "Dispatched job is not registered, skipping");
                return;
            }
        };

        match self.registry.mutate(id, |job| job.begin(STARTING_MESSAGE)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(job_id = %id, error = %e, "Skipping job that is not queued");
                return;
            }
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "Job vanished before start");
                return;
            }
        }
        tracing::info!(job_id = %id, url = %job.source_url, "Download started");
        self.emit_event(Event::Downloading { id });

        let outcome = AssertUnwindSafe(self.run_job(&job)).catch_unwind().await;
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                let panic_msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(job_id = %id, panic = %panic_msg, "Job panicked");
                Err(INTERNAL_FAILURE.to_string())
            }
        };

        match outcome {
            Ok(result) => self.finish_success(id, result),
            Err(detail) => self.finish_failure(id, &detail),
        }
    }

    /// Per-job body. Returns the raw failure text on error.
    async fn run_job(&self, job: &Job) -> std::result::Result<JobResult, String> {
        let output_dir = &self.config.download.output_dir;
        let token = job.correlation_token.to_string();

        let request = FetchRequest {
            url: job.source_url.clone(),
            kind: job.output_kind,
            directive: format::select(job.output_kind, &job.quality),
            output_template: output_template(output_dir, &token),
            cookie_file: self.resolve_cookie_file().await,
        };
        tracing::debug!(job_id = %job.id, directive = %request.directive, "Invoking engine");

        let outcome = self
            .engine
            .run(request, self.progress_callback(job.id))
            .await
            .map_err(|e| e.to_string())?;

        let path = match locate_output(output_dir, &token).await {
            Ok(Some(path)) => path,
            Ok(None) => return Err(OUTPUT_NOT_FOUND.to_string()),
            Err(e) => return Err(format!("failed to scan output directory: {e}")),
        };

        let title = outcome.title.unwrap_or_default();
        Ok(JobResult {
            display_name: display_name(&title, &path, job.output_kind),
            mime_type: job.output_kind.mime_type().to_string(),
            path,
        })
    }

    /// Cookie file to pass to the engine, if configured and present
    async fn resolve_cookie_file(&self) -> Option<PathBuf> {
        let path = self.config.engine.cookie_file.as_ref()?;
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Some(path.clone())
        } else {
            tracing::warn!(
                path = %path.display(),
                "Configured cookie file does not exist, continuing without it"
            );
            None
        }
    }

    /// Callback that stores engine progress on the job and broadcasts it
    fn progress_callback(&self, id: JobId) -> ProgressCallback {
        let registry = self.registry.clone();
        let event_tx = self.event_tx.clone();
        Arc::new(move |update: ProgressUpdate| {
            let message = update.message();
            let applied = registry.mutate(id, |job| {
                job.set_progress(message.clone());
                job.status == Status::Downloading
            });
            if matches!(applied, Ok(true)) {
                event_tx.send(Event::Progress { id, message }).ok();
            }
        })
    }

    fn finish_success(&self, id: JobId, result: JobResult) {
        let display_name = result.display_name.clone();
        let path = result.path.clone();
        match self
            .registry
            .mutate(id, |job| job.complete(result, READY_MESSAGE))
        {
            Ok(Ok(())) => {
                tracing::info!(
                    job_id = %id,
                    path = %path.display(),
                    display_name = %display_name,
                    "Download complete"
                );
                self.emit_event(Event::Done { id, display_name });
            }
            Ok(Err(e)) | Err(e) => {
                tracing::error!(job_id = %id, error = %e, "Failed to record completion");
            }
        }
    }

    fn finish_failure(&self, id: JobId, raw: &str) {
        let classified = classify(raw);
        let message = classified.message.clone();
        match self
            .registry
            .mutate(id, |job| job.fail(classified.detail, classified.message))
        {
            Ok(Ok(())) => {
                tracing::warn!(
                    job_id = %id,
                    category = ?classified.category,
                    error = %message,
                    "Download failed"
                );
                self.emit_event(Event::Failed { id, message });
            }
            Ok(Err(e)) | Err(e) => {
                tracing::error!(job_id = %id, error = %e, "Failed to record failure");
            }
        }
    }
}
