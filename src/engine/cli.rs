//! CLI-based fetch engine using an external yt-dlp binary

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use super::parser::{EngineLine, PROGRESS_MARKER, TITLE_MARKER, error_summary, parse_line};
use super::traits::{FetchEngine, FetchOutcome, FetchRequest, ProgressCallback};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::OutputKind;

/// Binary name searched for on PATH
const BINARY_NAME: &str = "yt-dlp";

/// Fetch engine that runs the `yt-dlp` binary
///
/// Progress is read line by line from the child's stdout while it runs; stderr is
/// collected and reported verbatim when the process fails.
///
/// # Examples
///
/// ```no_run
/// use media_dl::engine::CliFetchEngine;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let engine = CliFetchEngine::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let engine = CliFetchEngine::from_path().expect("yt-dlp not found in PATH");
/// ```
pub struct CliFetchEngine {
    binary_path: PathBuf,
    settings: EngineConfig,
}

impl CliFetchEngine {
    /// Create an engine for an explicit binary path with default settings
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            settings: EngineConfig::default(),
        }
    }

    /// Replace the retry, fragment and audio settings
    pub fn with_settings(mut self, settings: EngineConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which(BINARY_NAME).ok().map(Self::new)
    }

    /// Build an engine from configuration.
    ///
    /// Uses `binary_path` when set, otherwise searches PATH if `search_path` allows it.
    /// Returns `None` when no binary is available.
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        let engine = match &config.binary_path {
            Some(path) => Self::new(path.clone()),
            None if config.search_path => Self::from_path()?,
            None => return None,
        };
        Some(engine.with_settings(config.clone()))
    }

    /// Path of the binary this engine runs
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }

    pub(crate) fn build_args(&self, request: &FetchRequest) -> Vec<OsString> {
        let s = &self.settings;
        let mut args: Vec<OsString> = vec![
            "--newline".into(),
            "--progress".into(),
            "--no-playlist".into(),
            "--progress-template".into(),
            format!(
                "download:{PROGRESS_MARKER}%(progress.status)s|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s"
            )
            .into(),
            "--no-simulate".into(),
            "--print".into(),
            format!("after_move:{TITLE_MARKER}%(title)s").into(),
            "--retries".into(),
            s.retries.to_string().into(),
            "--fragment-retries".into(),
            s.fragment_retries.to_string().into(),
            "--skip-unavailable-fragments".into(),
            "-f".into(),
            request.directive.clone().into(),
            "-o".into(),
            request.output_template.clone().into_os_string(),
        ];

        if let Some(cookie_file) = &request.cookie_file {
            args.push("--cookies".into());
            args.push(cookie_file.clone().into_os_string());
        }

        match request.kind {
            OutputKind::Video => {
                args.push("--merge-output-format".into());
                args.push(s.merge_output_format.clone().into());
                args.push("--concurrent-fragments".into());
                args.push(s.concurrent_fragments.to_string().into());
            }
            OutputKind::Audio => {
                args.push("--extract-audio".into());
                args.push("--audio-format".into());
                args.push(s.audio_codec.clone().into());
                args.push("--audio-quality".into());
                args.push(format!("{}K", s.audio_bitrate_kbps).into());
            }
        }

        args.push("--".into());
        args.push(request.url.clone().into());
        args
    }
}

#[async_trait]
impl FetchEngine for CliFetchEngine {
    async fn run(
        &self,
        request: FetchRequest,
        on_progress: ProgressCallback,
    ) -> Result<FetchOutcome, EngineError> {
        let args = self.build_args(&request);
        tracing::debug!(
            binary = %self.binary_path.display(),
            url = %request.url,
            directive = %request.directive,
            "Starting engine"
        );

        let mut child = Command::new(&self.binary_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Spawn {
                binary: self.binary_path.clone(),
                reason: e.to_string(),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Other("engine stdout was not captured".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Other("engine stderr was not captured".into()))?;

        // Drained concurrently so a chatty stderr cannot block the child
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
            String::from_utf8_lossy(&buf).into_owned()
        });

        let mut title = None;
        let mut lines = BufReader::new(stdout).split(b'\n');
        while let Some(raw) = lines
            .next_segment()
            .await
            .map_err(|e| EngineError::Other(format!("failed to read engine output: {e}")))?
        {
            let line = String::from_utf8_lossy(&raw);
            match parse_line(&line) {
                EngineLine::Progress(update) => on_progress(update),
                EngineLine::Title(t) => title = Some(t),
                EngineLine::Other => tracing::trace!(line = %line, "engine output"),
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| EngineError::Other(format!("failed to wait for engine: {e}")))?;
        let stderr_text = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let summary = error_summary(&stderr_text);
            let stderr = if summary.is_empty() {
                format!("{} exited with {}", BINARY_NAME, status)
            } else {
                summary
            };
            return Err(EngineError::Failed {
                exit_code: status.code(),
                stderr,
            });
        }

        Ok(FetchOutcome { title })
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}
