//! Parser for yt-dlp command output

use regex::Regex;
use std::sync::LazyLock;

use super::traits::ProgressUpdate;

/// Prefix of the lines our `--progress-template` produces
pub(crate) const PROGRESS_MARKER: &str = "media-dl:progress ";

/// Prefix of the line our `--print` template produces after the file is moved
pub(crate) const TITLE_MARKER: &str = "media-dl:title ";

/// yt-dlp's default progress line, for builds that ignore the progress template
static DEFAULT_PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r"^\[download\]\s+(?P<percent>\d+(?:\.\d+)?%)\s+of\s+~?\s*\S+(?:\s+at\s+(?P<speed>\S+))?(?:\s+ETA\s+(?P<eta>\S+))?",
    )
    .expect("static progress pattern is valid")
});

/// One classified line of engine output
#[derive(Debug, Clone, PartialEq)]
pub enum EngineLine {
    /// Progress report
    Progress(ProgressUpdate),
    /// Title of the fetched media
    Title(String),
    /// Anything else
    Other,
}

/// Classify a single line of yt-dlp output
pub fn parse_line(line: &str) -> EngineLine {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(rest) = line.strip_prefix(TITLE_MARKER) {
        return EngineLine::Title(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix(PROGRESS_MARKER) {
        return parse_template_progress(rest).map_or(EngineLine::Other, EngineLine::Progress);
    }

    if line.starts_with("[Merger]") || line.starts_with("[ExtractAudio]") {
        return EngineLine::Progress(ProgressUpdate::Finished);
    }

    if let Some(caps) = DEFAULT_PROGRESS.captures(line) {
        let field = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "N/A".to_string())
        };
        return EngineLine::Progress(ProgressUpdate::Downloading {
            percent: field("percent"),
            speed: field("speed"),
            eta: field("eta"),
        });
    }

    EngineLine::Other
}

// `<status>|<percent>|<speed>|<eta>`
fn parse_template_progress(rest: &str) -> Option<ProgressUpdate> {
    let mut parts = rest.splitn(4, '|');
    let status = parts.next()?.trim();
    match status {
        "finished" => Some(ProgressUpdate::Finished),
        "downloading" => Some(ProgressUpdate::Downloading {
            percent: parts.next()?.trim().to_string(),
            speed: parts.next()?.trim().to_string(),
            eta: parts.next()?.trim().to_string(),
        }),
        _ => None,
    }
}

/// Reduce engine diagnostics to the text worth reporting.
///
/// Keeps `ERROR:` lines when there are any, otherwise the trimmed output as a whole.
pub fn error_summary(stderr: &str) -> String {
    let errors: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .collect();
    if errors.is_empty() {
        stderr.trim().to_string()
    } else {
        errors.join("\n")
    }
}
