//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the media-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the media-dl REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "media-dl REST API",
        version = "0.1.0",
        description = "Queue remote media downloads, poll their progress and fetch the finished files",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Jobs
        crate::api::routes::enqueue,
        crate::api::routes::get_status,
        crate::api::routes::download_result,
        crate::api::routes::list_jobs,
        crate::api::routes::queue_stats,

        // System
        crate::api::routes::index,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::JobId,
        crate::types::Status,
        crate::types::OutputKind,
        crate::types::JobInfo,
        crate::types::EnqueueReceipt,
        crate::types::QueueStats,
        crate::types::Event,

        // Config types from config.rs
        crate::config::Config,
        crate::config::DownloadConfig,
        crate::config::EngineConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // Request types from routes
        crate::api::routes::EnqueueRequest,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "jobs", description = "Jobs - Enqueue downloads, poll status and fetch finished files"),
        (name = "system", description = "System endpoints - Front end, health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;
