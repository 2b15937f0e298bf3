//! Status, result and listing lookups.

use super::MediaDownloader;
use crate::error::{Error, Result};
use crate::types::{JobId, JobInfo, JobResult, QueueStats, Status};

impl MediaDownloader {
    /// Current view of a job
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no job has this id.
    pub fn status(&self, id: JobId) -> Result<JobInfo> {
        let (job, position) = self.registry.get_with_position(id)?;
        Ok(JobInfo::from_job(&job, position))
    }

    /// Output of a finished job
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no job has this id
    /// - [`Error::NotReady`] if the job is not `Done`
    /// - [`Error::ResultMissing`] if the file was removed from disk after completion
    pub async fn result(&self, id: JobId) -> Result<JobResult> {
        let job = self.registry.get(id)?;
        let result = match (job.status, job.result) {
            (Status::Done, Some(result)) => result,
            (status, _) => return Err(Error::NotReady { id, status }),
        };

        if !tokio::fs::try_exists(&result.path).await.unwrap_or(false) {
            tracing::warn!(job_id = %id, path = %result.path.display(), "Result file is missing");
            return Err(Error::ResultMissing {
                id,
                path: result.path,
            });
        }

        Ok(result)
    }

    /// Every job in enqueue order
    pub fn list_jobs(&self) -> Vec<JobInfo> {
        self.registry
            .snapshot_with_positions()
            .iter()
            .map(|(job, position)| JobInfo::from_job(job, *position))
            .collect()
    }

    /// Job counts by status
    pub fn queue_stats(&self) -> QueueStats {
        self.registry.stats()
    }
}
