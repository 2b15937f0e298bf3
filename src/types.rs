//! Core types for media-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique, client-facing identifier for a job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a fresh random JobId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Identifier that namespaces a job's output file on disk
///
/// Kept separate from [`JobId`] so the public identifier never has to follow
/// filesystem naming rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CorrelationToken(Uuid);

impl CorrelationToken {
    /// Generate a fresh random token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Requested output kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Video with audio, delivered as mp4
    #[serde(alias = "mp4")]
    Video,
    /// Audio only, delivered as mp3
    #[serde(alias = "mp3")]
    Audio,
}

impl OutputKind {
    /// Parse a client-supplied kind. Accepts `video`/`mp4` and `audio`/`mp3`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "video" | "mp4" => Ok(OutputKind::Video),
            "audio" | "mp3" => Ok(OutputKind::Audio),
            other => Err(Error::InvalidInput(format!(
                "unsupported output kind '{other}' (expected video/mp4 or audio/mp3)"
            ))),
        }
    }

    /// MIME type of the delivered file
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputKind::Video => "video/mp4",
            OutputKind::Audio => "audio/mpeg",
        }
    }

    /// Extension used when the output file has none
    pub fn default_extension(&self) -> &'static str {
        match self {
            OutputKind::Video => "mp4",
            OutputKind::Audio => "mp3",
        }
    }
}

impl std::str::FromStr for OutputKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse an output kind from client text. See [`OutputKind::parse`].
pub fn parse_output_kind(value: &str) -> Result<OutputKind> {
    OutputKind::parse(value)
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Video => f.write_str("video"),
            OutputKind::Audio => f.write_str("audio"),
        }
    }
}

/// Job status
///
/// Transitions only move forward: `Queued -> Downloading -> {Done, Error}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Waiting in the dispatch queue
    Queued,
    /// Picked up by the worker, engine running
    Downloading,
    /// Finished, result available
    Done,
    /// Failed with a classified error
    Error,
}

impl Status {
    /// Whether no further transitions can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Done | Status::Error)
    }

    /// Whether the job still counts as pending work
    pub fn is_pending(&self) -> bool {
        matches!(self, Status::Queued | Status::Downloading)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Queued => "queued",
            Status::Downloading => "downloading",
            Status::Done => "done",
            Status::Error => "error",
        };
        f.write_str(s)
    }
}

/// Output of a successful job
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobResult {
    /// Location of the file on disk
    #[schema(value_type = String)]
    pub path: PathBuf,
    /// Filesystem-safe name offered to the client
    pub display_name: String,
    /// MIME type of the file
    pub mime_type: String,
}

/// One requested fetch and its lifecycle record
#[derive(Clone, Debug)]
pub struct Job {
    /// Public identifier
    pub id: JobId,
    /// Namespaces the engine's output file
    pub correlation_token: CorrelationToken,
    /// What to fetch
    pub source_url: String,
    /// Requested output kind
    pub output_kind: OutputKind,
    /// Free-form quality label, e.g. "1080p"
    pub quality: String,
    /// Current lifecycle status
    pub status: Status,
    /// Human-readable progress, overwritten while downloading
    pub progress_message: String,
    /// When the job was created (used for queue position)
    pub created_at: DateTime<Utc>,
    /// When the worker picked the job up
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state
    pub finished_at: Option<DateTime<Utc>>,
    /// Populated iff `status == Done`
    pub result: Option<JobResult>,
    /// Raw (ANSI-stripped) failure text, populated iff `status == Error`
    pub error_detail: Option<String>,
}

impl Job {
    /// Create a new job in the `Queued` state
    pub fn new(
        source_url: impl Into<String>,
        output_kind: OutputKind,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            id: JobId::new(),
            correlation_token: CorrelationToken::new(),
            source_url: source_url.into(),
            output_kind,
            quality: quality.into(),
            status: Status::Queued,
            progress_message: "Waiting in queue...".to_string(),
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            result: None,
            error_detail: None,
        }
    }

    /// `Queued -> Downloading`
    pub fn begin(&mut self, message: impl Into<String>) -> Result<()> {
        self.transition(Status::Downloading)?;
        self.started_at = Some(Utc::now());
        self.progress_message = message.into();
        Ok(())
    }

    /// `Downloading -> Done`
    pub fn complete(&mut self, result: JobResult, message: impl Into<String>) -> Result<()> {
        self.transition(Status::Done)?;
        self.finished_at = Some(Utc::now());
        self.result = Some(result);
        self.progress_message = message.into();
        Ok(())
    }

    /// `Downloading -> Error`
    pub fn fail(&mut self, detail: impl Into<String>, message: impl Into<String>) -> Result<()> {
        self.transition(Status::Error)?;
        self.finished_at = Some(Utc::now());
        self.error_detail = Some(detail.into());
        self.progress_message = message.into();
        Ok(())
    }

    /// Overwrite the progress message. Ignored once the job is terminal.
    pub fn set_progress(&mut self, message: impl Into<String>) {
        if self.status == Status::Downloading {
            self.progress_message = message.into();
        }
    }

    fn transition(&mut self, to: Status) -> Result<()> {
        let allowed = matches!(
            (self.status, to),
            (Status::Queued, Status::Downloading)
                | (Status::Downloading, Status::Done)
                | (Status::Downloading, Status::Error)
        );
        if !allowed {
            return Err(Error::InvalidTransition {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Client-facing view of a job
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobInfo {
    /// Job identifier
    pub job_id: JobId,
    /// Source URL
    pub url: String,
    /// Output kind
    pub kind: OutputKind,
    /// Quality label as requested
    pub quality: String,
    /// Current status
    pub status: Status,
    /// Human-readable progress or classified error text
    pub progress: String,
    /// Approximate position among pending jobs (0 once terminal)
    pub position: usize,
    /// Raw error text, present iff status is `error`
    pub error: Option<String>,
    /// Name the file will be served under, present iff status is `done`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the worker picked it up
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When it finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobInfo {
    /// Build the view of `job` at the given queue position
    pub fn from_job(job: &Job, position: usize) -> Self {
        Self {
            job_id: job.id,
            url: job.source_url.clone(),
            kind: job.output_kind,
            quality: job.quality.clone(),
            status: job.status,
            progress: job.progress_message.clone(),
            position,
            error: job.error_detail.clone(),
            display_name: job.result.as_ref().map(|r| r.display_name.clone()),
            created_at: job.created_at,
            started_at: job.started_at,
            finished_at: job.finished_at,
        }
    }
}

/// Returned by enqueue
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EnqueueReceipt {
    /// Identifier to poll
    pub job_id: JobId,
    /// Approximate position at enqueue time (1 = next up)
    pub position: usize,
    /// Human-readable confirmation
    pub message: String,
}

/// Job counts by status
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QueueStats {
    /// Jobs waiting for the worker
    pub queued: usize,
    /// Jobs currently running (0 or 1)
    pub downloading: usize,
    /// Completed jobs
    pub done: usize,
    /// Failed jobs
    pub failed: usize,
}

/// Event emitted during the job lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Job accepted and queued
    Queued {
        /// Job ID
        id: JobId,
        /// Source URL
        url: String,
        /// Position at enqueue time
        position: usize,
    },

    /// Worker started the job
    Downloading {
        /// Job ID
        id: JobId,
    },

    /// Engine reported progress
    Progress {
        /// Job ID
        id: JobId,
        /// Progress message as stored on the job
        message: String,
    },

    /// Job finished successfully
    Done {
        /// Job ID
        id: JobId,
        /// Name the file is served under
        display_name: String,
    },

    /// Job failed
    Failed {
        /// Job ID
        id: JobId,
        /// Classified, human-facing message
        message: String,
    },

    /// Downloader is shutting down
    Shutdown,
}
