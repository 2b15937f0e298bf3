//! Job handlers: enqueue, status, file download, listing and stats.

use super::EnqueueRequest;
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::types::{EnqueueReceipt, JobId, JobInfo, OutputKind, QueueStats};
use crate::utils::content_disposition;
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

/// Ids that do not parse can never name a job
fn parse_job_id(raw: &str) -> Result<JobId> {
    raw.parse()
        .map_err(|_| Error::NotFound(format!("no job with id '{raw}'")))
}

/// POST /enqueue - Queue a new job
#[utoipa::path(
    post,
    path = "/enqueue",
    tag = "jobs",
    request_body = EnqueueRequest,
    responses(
        (status = 200, description = "Job queued", body = EnqueueReceipt),
        (status = 400, description = "Missing URL or unsupported format", body = crate::error::ApiError),
        (status = 503, description = "Shutting down", body = crate::error::ApiError)
    )
)]
pub async fn enqueue(
    State(state): State<AppState>,
    Json(request): Json<EnqueueRequest>,
) -> Result<Json<EnqueueReceipt>> {
    let kind = match request.format.as_deref() {
        Some(format) => OutputKind::parse(format)?,
        None => OutputKind::Video,
    };

    let receipt = state
        .downloader
        .enqueue(&request.url, kind, request.quality.as_deref())?;
    Ok(Json(receipt))
}

/// GET /status/:id - Job status, progress and queue position
#[utoipa::path(
    get,
    path = "/status/{id}",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Current job status", body = JobInfo),
        (status = 404, description = "Job not found", body = crate::error::ApiError)
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobInfo>> {
    let id = parse_job_id(&id)?;
    Ok(Json(state.downloader.status(id)?))
}

/// GET /download/:id - Stream the finished file as an attachment
#[utoipa::path(
    get,
    path = "/download/{id}",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "The file (video/mp4 or audio/mpeg)", content_type = "application/octet-stream"),
        (status = 404, description = "Job not found", body = crate::error::ApiError),
        (status = 409, description = "Job has not finished successfully", body = crate::error::ApiError),
        (status = 500, description = "File missing on disk", body = crate::error::ApiError)
    )
)]
pub async fn download_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_job_id(&id)?;
    let result = state.downloader.result(id).await?;

    let file = tokio::fs::File::open(&result.path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ResultMissing {
                id,
                path: result.path.clone(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    let length = file.metadata().await.ok().map(|m| m.len());

    tracing::info!(job_id = %id, display_name = %result.display_name, "Serving file");

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.mime_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&result.display_name),
        );
    if let Some(length) = length {
        response = response.header(header::CONTENT_LENGTH, length);
    }

    response
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| Error::ApiServerError(e.to_string()))
}

/// GET /jobs - List all jobs in enqueue order
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    responses(
        (status = 200, description = "Every job", body = Vec<JobInfo>)
    )
)]
pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobInfo>> {
    Json(state.downloader.list_jobs())
}

/// GET /queue/stats - Job counts by status
#[utoipa::path(
    get,
    path = "/queue/stats",
    tag = "jobs",
    responses(
        (status = 200, description = "Job counts", body = QueueStats)
    )
)]
pub async fn queue_stats(State(state): State<AppState>) -> Json<QueueStats> {
    Json(state.downloader.queue_stats())
}
