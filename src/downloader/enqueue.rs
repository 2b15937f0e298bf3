//! Job validation, registration and dispatch.

use std::sync::atomic::Ordering;

use super::MediaDownloader;
use crate::error::{Error, Result};
use crate::types::{EnqueueReceipt, Event, Job, OutputKind};

impl MediaDownloader {
    /// Create a job and queue it for the worker
    ///
    /// `quality` falls back to the configured default when `None` or blank.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if the URL is empty after trimming (no job is created)
    /// - [`Error::ShuttingDown`] after [`shutdown`](Self::shutdown)
    pub fn enqueue(
        &self,
        url: &str,
        kind: OutputKind,
        quality: Option<&str>,
    ) -> Result<EnqueueReceipt> {
        if !self.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidInput("url must not be empty".into()));
        }

        let quality = quality
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(self.config.download.default_quality.as_str());

        let job = Job::new(url, kind, quality);
        let id = job.id;

        // Registered before dispatch so the worker never pops an unknown id
        let position = self.registry.insert_with_position(job)?;
        tracing::info!(job_id = %id, url, kind = %kind, quality, position, "Job queued");
        self.emit_event(Event::Queued {
            id,
            url: url.to_string(),
            position,
        });

        if let Err(e) = self.dispatch.push(id) {
            tracing::error!(job_id = %id, error = %e, "Failed to dispatch job");
            return Err(e);
        }

        Ok(EnqueueReceipt {
            job_id: id,
            position,
            message: format!("Queued at position {position}"),
        })
    }
}
