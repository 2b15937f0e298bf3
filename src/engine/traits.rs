//! Traits and types for fetch engines

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::EngineError;
use crate::types::OutputKind;

/// Everything an engine needs to fetch one job
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Source URL
    pub url: String,
    /// Requested output kind
    pub kind: OutputKind,
    /// Stream-selection directive from [`format::select`](crate::format::select)
    pub directive: String,
    /// Output template, `<dir>/<token>.%(ext)s`
    pub output_template: PathBuf,
    /// Credential file, only set when it exists on disk
    pub cookie_file: Option<PathBuf>,
}

/// Result of a successful fetch
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Title reported by the source, if any
    pub title: Option<String>,
}

/// Progress reported by an engine while it runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Transfer in progress. Fields are the engine's own formatted strings.
    Downloading {
        /// e.g. "42.0%"
        percent: String,
        /// e.g. "1.20MiB/s"
        speed: String,
        /// e.g. "00:10"
        eta: String,
    },
    /// Transfer complete, post-processing (merge, extraction) may follow
    Finished,
}

impl ProgressUpdate {
    /// Human-readable progress text stored on the job
    pub fn message(&self) -> String {
        match self {
            ProgressUpdate::Downloading {
                percent,
                speed,
                eta,
            } => format!(
                "Downloading... {} | speed {} | ETA {}",
                percent.trim(),
                speed.trim(),
                eta.trim()
            ),
            ProgressUpdate::Finished => "Download finished, preparing file...".to_string(),
        }
    }
}

/// Progress sink handed to [`FetchEngine::run`]. Safe to call from any thread.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// A media fetch engine
///
/// Implementations resolve a URL, download the selected streams, and write a single
/// output file matching the request's output template.
///
/// # Examples
///
/// ```no_run
/// use media_dl::engine::{CliFetchEngine, FetchEngine, FetchRequest};
/// use media_dl::types::OutputKind;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = CliFetchEngine::from_path().expect("yt-dlp not found");
/// let request = FetchRequest {
///     url: "https://example.com/watch?v=1".into(),
///     kind: OutputKind::Audio,
///     directive: "bestaudio/best".into(),
///     output_template: "/tmp/abc.%(ext)s".into(),
///     cookie_file: None,
/// };
/// let outcome = engine
///     .run(request, Arc::new(|update| println!("{}", update.message())))
///     .await?;
/// println!("title: {:?}", outcome.title);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// Fetch the request, reporting progress through `on_progress`
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the engine cannot be started or reports failure.
    async fn run(
        &self,
        request: FetchRequest,
        on_progress: ProgressCallback,
    ) -> Result<FetchOutcome, EngineError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
