//! Shared job registry
//!
//! All job records live here behind a single mutex. Updates touch one record at a
//! time, but position estimation needs a consistent view across every record, so
//! the whole map shares one lock. Critical sections are short and never do I/O or
//! cross an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::position::position;
use crate::types::{Job, JobId, QueueStats, Status};

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, Job>,
    /// Insertion order, for stable listings
    order: Vec<JobId>,
}

/// Thread-safe map from job id to job record (cheap to clone, all clones share state)
#[derive(Clone, Default)]
pub struct JobRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning is recovered; records stay readable after a panicked mutation.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new job. Fails if the id is already present.
    pub fn insert(&self, job: Job) -> Result<()> {
        let mut inner = self.lock();
        Self::insert_locked(&mut inner, job)
    }

    /// Store a new job and return its position, under one lock
    pub fn insert_with_position(&self, job: Job) -> Result<usize> {
        let mut inner = self.lock();
        let id = job.id;
        Self::insert_locked(&mut inner, job)?;
        let job = inner
            .jobs
            .get(&id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(position(job, inner.jobs.values()))
    }

    fn insert_locked(inner: &mut Inner, job: Job) -> Result<()> {
        if inner.jobs.contains_key(&job.id) {
            return Err(Error::Duplicate(format!("job {} already registered", job.id)));
        }
        inner.order.push(job.id);
        inner.jobs.insert(job.id, job);
        Ok(())
    }

    /// Clone of the job record
    pub fn get(&self, id: JobId) -> Result<Job> {
        self.lock()
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Clone of the job record together with its current queue position
    pub fn get_with_position(&self, id: JobId) -> Result<(Job, usize)> {
        let inner = self.lock();
        let job = inner
            .jobs
            .get(&id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok((job.clone(), position(job, inner.jobs.values())))
    }

    /// Apply `f` to the job in place, atomically with respect to all other operations
    pub fn mutate<F, R>(&self, id: JobId, f: F) -> Result<R>
    where
        F: FnOnce(&mut Job) -> R,
    {
        let mut inner = self.lock();
        let job = inner
            .jobs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(f(job))
    }

    /// Every job in insertion order
    pub fn snapshot_all(&self) -> Vec<Job> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect()
    }

    /// Every job with its position, in insertion order, from one consistent view
    pub fn snapshot_with_positions(&self) -> Vec<(Job, usize)> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.jobs.get(id))
            .map(|job| (job.clone(), position(job, inner.jobs.values())))
            .collect()
    }

    /// Job counts by status
    pub fn stats(&self) -> QueueStats {
        let inner = self.lock();
        let mut stats = QueueStats::default();
        for job in inner.jobs.values() {
            match job.status {
                Status::Queued => stats.queued += 1,
                Status::Downloading => stats.downloading += 1,
                Status::Done => stats.done += 1,
                Status::Error => stats.failed += 1,
            }
        }
        stats
    }

    /// Number of jobs ever registered
    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    /// Whether no job was ever registered
    pub fn is_empty(&self) -> bool {
        self.lock().jobs.is_empty()
    }
}
