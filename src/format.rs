//! Format selection: maps an output kind and quality label to a yt-dlp format directive
//!
//! A directive is an ordered list of `/`-separated alternatives. The engine tries them
//! left to right and uses the first one it can satisfy.
//!
//! For video at 1080p and below, a single progressive (pre-muxed) mp4 stream is
//! preferred since it needs no merge step. Above 1080p, progressive streams are
//! rarely offered, so separate video and audio streams are requested and muxed.

use crate::types::OutputKind;

/// Quality label used when the client supplies none or an unknown one
pub const DEFAULT_QUALITY: &str = "720p";

/// Highest resolution served from a progressive stream
const PROGRESSIVE_MAX_HEIGHT: u32 = 1080;

/// Named quality tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityTier {
    /// No resolution cap
    Best,
    /// 3840x2160
    P2160,
    /// 2560x1440
    P1440,
    /// 1920x1080
    P1080,
    /// 1280x720
    P720,
    /// 854x480
    P480,
    /// 640x360
    P360,
}

impl QualityTier {
    /// Parse a label case-insensitively. Unknown labels fall back to 720p.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "best" => QualityTier::Best,
            "2160p" | "4k" => QualityTier::P2160,
            "1440p" | "2k" => QualityTier::P1440,
            "1080p" => QualityTier::P1080,
            "720p" => QualityTier::P720,
            "480p" => QualityTier::P480,
            "360p" => QualityTier::P360,
            _ => QualityTier::P720,
        }
    }

    /// Target vertical resolution, `None` for unbounded
    pub fn max_height(&self) -> Option<u32> {
        match self {
            QualityTier::Best => None,
            QualityTier::P2160 => Some(2160),
            QualityTier::P1440 => Some(1440),
            QualityTier::P1080 => Some(1080),
            QualityTier::P720 => Some(720),
            QualityTier::P480 => Some(480),
            QualityTier::P360 => Some(360),
        }
    }
}

/// Build the format directive for `kind` at `quality`.
///
/// Total and deterministic: every input yields a directive.
///
/// ```
/// use media_dl::format::select;
/// use media_dl::types::OutputKind;
///
/// assert_eq!(
///     select(OutputKind::Video, "1080p"),
///     "best[ext=mp4][height<=1080]/best[height<=1080]"
/// );
/// assert_eq!(select(OutputKind::Audio, "4k"), "bestaudio/best");
/// ```
pub fn select(kind: OutputKind, quality: &str) -> String {
    match kind {
        OutputKind::Audio => "bestaudio/best".to_string(),
        OutputKind::Video => video_directive(QualityTier::parse(quality)),
    }
}

fn video_directive(tier: QualityTier) -> String {
    match tier.max_height() {
        None => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
        Some(h) if h <= PROGRESSIVE_MAX_HEIGHT => {
            format!("best[ext=mp4][height<={h}]/best[height<={h}]")
        }
        Some(h) => format!(
            "bestvideo[ext=mp4][height<={h}]+bestaudio[ext=m4a]/\
             bestvideo[height<={h}]+bestaudio/\
             best[height<={h}]/\
             best"
        ),
    }
}
