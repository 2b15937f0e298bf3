//! Failure classification: turns raw engine output into a message a user can act on

use regex::Regex;
use std::sync::LazyLock;

/// Terminal color sequences such as `ESC[0;31m`
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\x1b\[[0-9;]*m").expect("static ANSI pattern is valid")
});

const BOT_CHALLENGE_MARKERS: &[&str] = &[
    "Sign in to confirm you're not a bot",
    "Sign in to confirm you\u{2019}re not a bot",
];

const BOT_CHALLENGE_MESSAGE: &str = "The site wants to confirm you are not a bot (sign-in required) for this media.\n\
- Check that the cookie file is valid and has not expired\n\
- If needed, export a fresh cookie file from a logged-in browser session";

const MISSING_COOKIES_MESSAGE: &str = "The configured cookie file could not be found.\n\
Check that engine.cookie_file points at your exported cookie file.";

/// Broad failure categories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bot check / sign-in verification challenge
    BotChallenge,
    /// The cookie file passed to the engine does not exist
    MissingCredentials,
    /// Anything else
    Other,
}

/// A classified failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedError {
    /// Matched category
    pub category: ErrorCategory,
    /// Raw text with color sequences removed
    pub detail: String,
    /// Human-facing message
    pub message: String,
}

/// Remove terminal color sequences
pub fn strip_ansi(raw: &str) -> String {
    ANSI_ESCAPE.replace_all(raw, "").into_owned()
}

/// Match already-cleaned text against the known patterns, in priority order
pub fn categorize(cleaned: &str) -> ErrorCategory {
    if BOT_CHALLENGE_MARKERS.iter().any(|m| cleaned.contains(m)) {
        ErrorCategory::BotChallenge
    } else if cleaned.to_lowercase().contains("cookie")
        && cleaned.contains("No such file or directory")
    {
        ErrorCategory::MissingCredentials
    } else {
        ErrorCategory::Other
    }
}

/// Classify raw failure text.
///
/// Text that matches no known pattern is kept verbatim (minus color codes) inside
/// the generic message.
pub fn classify(raw: &str) -> ClassifiedError {
    let detail = strip_ansi(raw);
    let category = categorize(&detail);
    let message = match category {
        ErrorCategory::BotChallenge => BOT_CHALLENGE_MESSAGE.to_string(),
        ErrorCategory::MissingCredentials => MISSING_COOKIES_MESSAGE.to_string(),
        ErrorCategory::Other => format!("Download failed: {detail}"),
    };

    ClassifiedError {
        category,
        detail,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_sequences() {
        assert_eq!(
            strip_ansi("\x1b[0;31mERROR:\x1b[0m Video unavailable"),
            "ERROR: Video unavailable"
        );
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn bot_challenge_with_either_apostrophe() {
        for raw in [
            "ERROR: [youtube] abc: Sign in to confirm you're not a bot. Use --cookies",
            "ERROR: [youtube] abc: Sign in to confirm you\u{2019}re not a bot",
        ] {
            let c = classify(raw);
            assert_eq!(c.category, ErrorCategory::BotChallenge);
            assert!(c.message.contains("cookie file"));
        }
    }

    #[test]
    fn bot_challenge_behind_color_codes() {
        let c = classify("\x1b[0;31mERROR:\x1b[0m Sign in to confirm you're not a bot");
        assert_eq!(c.category, ErrorCategory::BotChallenge);
        assert!(!c.detail.contains('\x1b'));
    }

    #[test]
    fn missing_cookie_file() {
        let c = classify("[Errno 2] No such file or directory: '/home/u/cookies.txt' (cookiefile)");
        assert_eq!(c.category, ErrorCategory::MissingCredentials);
        assert!(c.message.contains("cookie_file"));
    }

    #[test]
    fn bot_challenge_takes_priority() {
        let c = classify("Sign in to confirm you're not a bot; cookie No such file or directory");
        assert_eq!(c.category, ErrorCategory::BotChallenge);
    }

    #[test]
    fn unmatched_text_is_kept_verbatim() {
        let raw = "\x1b[0;31mERROR:\x1b[0m [generic] Unsupported URL: https://x.test/";
        let c = classify(raw);
        assert_eq!(c.category, ErrorCategory::Other);
        assert!(c.message.contains(&strip_ansi(raw)));
        assert_eq!(c.detail, "ERROR: [generic] Unsupported URL: https://x.test/");
    }

    #[test]
    fn empty_text_still_produces_a_message() {
        let c = classify("");
        assert_eq!(c.category, ErrorCategory::Other);
        assert_eq!(c.message, "Download failed: ");
    }
}
