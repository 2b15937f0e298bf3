//! Shared test helpers: a scripted fetch engine and downloader constructors.

use crate::config::Config;
use crate::downloader::MediaDownloader;
use crate::engine::{FetchEngine, FetchOutcome, FetchRequest, ProgressCallback, ProgressUpdate};
use crate::error::EngineError;
use crate::types::{JobId, JobInfo};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::Notify;

/// What the mock engine does for one request
pub(crate) enum Script {
    /// Report progress, write `<token>.<extension>`, return `title`
    Succeed {
        title: Option<String>,
        extension: &'static str,
        progress: Vec<ProgressUpdate>,
    },
    /// Report success but write no file
    SucceedWithoutFile,
    /// Fail with this stderr text
    Fail(String),
    /// Panic inside the engine
    Panic,
    /// Wait for the gate, then behave like `Succeed` with a default title
    Gated(Arc<Notify>),
}

impl Script {
    pub(crate) fn ok(title: &str, extension: &'static str) -> Self {
        Script::Succeed {
            title: Some(title.to_string()),
            extension,
            progress: vec![
                ProgressUpdate::Downloading {
                    percent: "50.0%".into(),
                    speed: "1.00MiB/s".into(),
                    eta: "00:01".into(),
                },
                ProgressUpdate::Finished,
            ],
        }
    }
}

/// Fetch engine driven by a queue of scripts; succeeds with an mp4 when the queue is empty
#[derive(Default)]
pub(crate) struct MockEngine {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockEngine {
    pub(crate) fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests seen so far, in call order
    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn write_output(request: &FetchRequest, extension: &str) {
    let template = request.output_template.to_string_lossy();
    let path = template.replace("%(ext)s", extension);
    std::fs::write(path, b"media bytes").unwrap();
}

#[async_trait]
impl FetchEngine for MockEngine {
    async fn run(
        &self,
        request: FetchRequest,
        on_progress: ProgressCallback,
    ) -> Result<FetchOutcome, EngineError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::ok("Mock Clip", "mp4"));

        match script {
            Script::Succeed {
                title,
                extension,
                progress,
            } => {
                for update in progress {
                    on_progress(update);
                }
                write_output(&request, extension);
                Ok(FetchOutcome { title })
            }
            Script::SucceedWithoutFile => Ok(FetchOutcome {
                title: Some("Ghost".into()),
            }),
            Script::Fail(stderr) => Err(EngineError::Failed {
                exit_code: Some(1),
                stderr,
            }),
            Script::Panic => panic!("mock engine exploded"),
            Script::Gated(gate) => {
                gate.notified().await;
                write_output(&request, "mp4");
                Ok(FetchOutcome {
                    title: Some("Gated".into()),
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Test config rooted in a fresh temp dir
pub(crate) fn test_config(temp_dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.download.output_dir = temp_dir.path().join("output");
    config.engine.search_path = false;
    config
}

/// Downloader backed by `engine`, worker not started.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader(
    engine: Arc<MockEngine>,
) -> (MediaDownloader, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(&temp_dir);
    let downloader = MediaDownloader::with_engine(config, engine).await.unwrap();
    (downloader, temp_dir)
}

/// Poll until the job is `Done` or `Error`
pub(crate) async fn wait_for_terminal(downloader: &MediaDownloader, id: JobId) -> JobInfo {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let info = downloader.status(id).unwrap();
            if info.status.is_terminal() {
                return info;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}
