//! Shared helpers for integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use media_dl::{
    Config, EngineError, FetchEngine, FetchOutcome, FetchRequest, JobId, JobInfo,
    MediaDownloader, ProgressCallback, ProgressUpdate,
};
use std::time::Duration;
use tempfile::TempDir;

/// Engine that writes a fixed payload next to the requested template
pub struct StubEngine {
    pub payload: &'static [u8],
    pub title: &'static str,
}

#[async_trait]
impl FetchEngine for StubEngine {
    async fn run(
        &self,
        request: FetchRequest,
        on_progress: ProgressCallback,
    ) -> Result<FetchOutcome, EngineError> {
        on_progress(ProgressUpdate::Downloading {
            percent: "100.0%".into(),
            speed: "2.00MiB/s".into(),
            eta: "00:00".into(),
        });
        on_progress(ProgressUpdate::Finished);

        let template = request.output_template.to_string_lossy();
        let path = template.replace("%(ext)s", request.kind.default_extension());
        tokio::fs::write(&path, self.payload)
            .await
            .map_err(|e| EngineError::Other(e.to_string()))?;

        Ok(FetchOutcome {
            title: Some(self.title.to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Config writing into `temp_dir`, with PATH lookup disabled
pub fn config_in(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.download.output_dir = temp_dir.path().join("media");
    config.engine.search_path = false;
    config
}

/// Poll until the job reaches `done` or `error`
pub async fn wait_for_terminal(downloader: &MediaDownloader, id: JobId) -> JobInfo {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let info = downloader.status(id).unwrap();
            if info.status.is_terminal() {
                return info;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}
