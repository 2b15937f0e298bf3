//! Media fetch engines
//!
//! The worker talks to an engine only through the [`FetchEngine`] trait, so the
//! download backend can be swapped (or mocked in tests). Implementations:
//!
//! - [`CliFetchEngine`]: runs an external `yt-dlp` binary
//! - [`NoOpFetchEngine`]: fails every job, used when no binary is available
//!
//! [`locate_output`] finds the file an engine wrote for a given correlation token.

mod cli;
mod noop;
mod output;
mod parser;
mod traits;

pub use cli::CliFetchEngine;
pub use noop::NoOpFetchEngine;
pub use output::locate_output;
pub use parser::{EngineLine, error_summary, parse_line};
pub use traits::{FetchEngine, FetchOutcome, FetchRequest, ProgressCallback, ProgressUpdate};
