//! Engine used when no yt-dlp binary is available

use async_trait::async_trait;

use super::traits::{FetchEngine, FetchOutcome, FetchRequest, ProgressCallback};
use crate::error::EngineError;

/// Fetch engine that fails every request
///
/// Lets the service start and accept jobs when no binary is installed; each job
/// then fails with a message explaining how to configure one.
///
/// # Examples
///
/// ```
/// use media_dl::engine::{FetchEngine, FetchRequest, NoOpFetchEngine};
/// use media_dl::types::OutputKind;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let request = FetchRequest {
///     url: "https://example.com/v".into(),
///     kind: OutputKind::Video,
///     directive: "best".into(),
///     output_template: "/tmp/x.%(ext)s".into(),
///     cookie_file: None,
/// };
/// let result = NoOpFetchEngine.run(request, Arc::new(|_: media_dl::engine::ProgressUpdate| {})).await;
/// assert!(result.is_err());
/// # }
/// ```
pub struct NoOpFetchEngine;

#[async_trait]
impl FetchEngine for NoOpFetchEngine {
    async fn run(
        &self,
        _request: FetchRequest,
        _on_progress: ProgressCallback,
    ) -> Result<FetchOutcome, EngineError> {
        Err(EngineError::Other(
            "no fetch engine available: install yt-dlp or set engine.binary_path".into(),
        ))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
