//! Error types for media-dl
//!
//! This module provides error handling for the library, including:
//! - The top-level [`Error`] returned by every fallible operation
//! - [`EngineError`] for failures raised by a fetch engine
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::{JobId, Status};

/// Result type alias for media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-dl
///
/// Caller mistakes (`InvalidInput`, `NotFound`, `NotReady`) are reported synchronously.
/// Engine failures never reach callers through this type; the worker stores them on the
/// job instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was malformed (empty URL, unknown output kind, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No job with this identifier exists
    #[error("job not found: {0}")]
    NotFound(String),

    /// Result requested before the job finished successfully
    #[error("job {id} is not ready (status: {status})")]
    NotReady {
        /// The job whose result was requested
        id: JobId,
        /// The job's status at the time of the request
        status: Status,
    },

    /// The job completed but its output file is no longer on disk
    #[error("result file for job {id} is missing at {path}")]
    ResultMissing {
        /// The completed job
        id: JobId,
        /// Where the output file was recorded
        path: PathBuf,
    },

    /// A job state change that the lifecycle does not allow
    #[error("job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The job being updated
        id: JobId,
        /// Current status
        from: Status,
        /// Requested status
        to: Status,
    },

    /// A job with the same identifier is already registered
    #[error("duplicate job: {0}")]
    Duplicate(String),

    /// Fetch engine failure
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new jobs")]
    ShuttingDown,

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "output_dir")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Failures raised by a [`FetchEngine`](crate::engine::FetchEngine)
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary could not be started
    #[error("failed to start {binary}: {reason}")]
    Spawn {
        /// Binary that was executed
        binary: PathBuf,
        /// Underlying OS error text
        reason: String,
    },

    /// The engine ran but reported failure
    #[error("{stderr}")]
    Failed {
        /// Process exit code, if the process exited normally
        exit_code: Option<i32>,
        /// Diagnostic output collected from the engine
        stderr: String,
    },

    /// The engine succeeded but its output could not be used
    #[error("{0}")]
    Other(String),
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_ready",
///     "message": "job 3f0c... is not ready (status: downloading)",
///     "details": { "job_id": "3f0c...", "status": "downloading" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "invalid_input")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create an "invalid input" error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new("invalid_input", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - caller error
            Error::InvalidInput(_) => 400,
            Error::Config { .. } => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 409 Conflict - resource not in the required state
            Error::NotReady { .. } => 409,
            Error::InvalidTransition { .. } => 409,
            Error::Duplicate(_) => 409,

            // 500 Internal Server Error - recorded success but file gone, etc.
            Error::ResultMissing { .. } => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            // 502 Bad Gateway - external engine failed
            Error::Engine(_) => 502,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::Config { .. } => "config_error",
            Error::NotFound(_) => "not_found",
            Error::NotReady { .. } => "not_ready",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::Duplicate(_) => "duplicate",
            Error::ResultMissing { .. } => "result_missing",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Engine(e) => match e {
                EngineError::Spawn { .. } => "engine_unavailable",
                EngineError::Failed { .. } => "engine_failed",
                EngineError::Other(_) => "engine_error",
            },
            Error::ShuttingDown => "shutting_down",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::NotReady { id, status } => Some(serde_json::json!({
                "job_id": id,
                "status": status,
            })),
            Error::ResultMissing { id, path } => Some(serde_json::json!({
                "job_id": id,
                "path": path,
            })),
            Error::InvalidTransition { id, from, to } => Some(serde_json::json!({
                "job_id": id,
                "from": from,
                "to": to,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Engine(EngineError::Failed {
                exit_code: Some(code),
                ..
            }) => Some(serde_json::json!({
                "exit_code": code,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
