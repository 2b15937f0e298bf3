//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`jobs`] - Enqueue, status, file download, listing and stats
//! - [`system`] - Front end page, health, events, OpenAPI

use serde::{Deserialize, Serialize};

mod jobs;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use jobs::*;
pub use system::*;

// ============================================================================
// Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /enqueue
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct EnqueueRequest {
    /// URL of the media page to fetch
    #[serde(default)]
    pub url: String,
    /// Output kind: "mp4"/"video" or "mp3"/"audio" (default: "mp4")
    #[serde(default, alias = "kind")]
    pub format: Option<String>,
    /// Quality label such as "1080p" (default: configured default quality)
    #[serde(default)]
    pub quality: Option<String>,
}
