//! REST API server demo
//!
//! Runs media-dl with the REST API and the download worker, shutting down
//! cleanly on SIGINT/SIGTERM.
//!
//! ```text
//! cargo run --example rest_api_server [config.json]
//! ```
//!
//! After starting, you can:
//! - Open the front end at http://localhost:5000/
//! - View Swagger UI at http://localhost:5000/swagger-ui
//! - Queue a job via POST http://localhost:5000/enqueue
//! - Poll progress via GET http://localhost:5000/status/<job_id>
//! - Stream events via GET http://localhost:5000/events

use media_dl::{Config, MediaDownloader, run_with_shutdown};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("media_dl=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(&PathBuf::from(path))?,
        None => Config::default(),
    };
    let address = config.server.api.bind_address;

    let downloader = MediaDownloader::new(config).await?;
    println!("Engine: {}", downloader.engine_name());
    println!("Front end: http://{address}/");
    println!("Swagger UI: http://{address}/swagger-ui");
    println!();
    println!("Example commands:");
    println!("  curl -X POST http://{address}/enqueue \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!(
        "    -d '{{\"url\": \"https://www.youtube.com/watch?v=...\", \"format\": \"mp3\"}}'"
    );
    println!("  curl http://{address}/status/<job_id>");
    println!("  curl -OJ http://{address}/download/<job_id>");

    let worker = downloader.start_worker();
    let server = downloader.spawn_api_server();

    run_with_shutdown(downloader).await?;
    worker.await?;
    server.abort();

    Ok(())
}
