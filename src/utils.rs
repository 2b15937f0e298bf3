//! Utility functions for file naming and path handling

use std::path::{Path, PathBuf};

use crate::types::OutputKind;

/// Name used when a title sanitizes to nothing
pub const DEFAULT_DISPLAY_NAME: &str = "media_download";

/// Characters that are not allowed in filenames on common filesystems
const RESERVED_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Strip reserved filename characters and surrounding whitespace.
///
/// # Examples
///
/// ```
/// use media_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("  AC/DC: Live? "), "ACDC Live");
/// assert_eq!(sanitize_filename("///"), "media_download");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !RESERVED_CHARS.contains(c) && !c.is_control())
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        DEFAULT_DISPLAY_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the name a finished file is offered under: sanitized title plus the
/// extension of the file actually written, or the kind's default extension.
pub fn display_name(title: &str, output: &Path, kind: OutputKind) -> String {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(kind.default_extension());
    format!("{}.{}", sanitize_filename(title), ext)
}

/// Output template handed to the engine: `<dir>/<token>.%(ext)s`
pub fn output_template(dir: &Path, token: &str) -> PathBuf {
    dir.join(format!("{token}.%(ext)s"))
}

/// `Content-Disposition` value for an attachment, with an ASCII fallback and an
/// RFC 5987 encoded UTF-8 name.
pub fn content_disposition(display_name: &str) -> String {
    let ascii: String = display_name
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(display_name)
    )
}
