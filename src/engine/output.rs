//! Locating the file an engine wrote

use std::path::{Path, PathBuf};

/// Suffixes of in-progress files the engine leaves behind
const TEMPORARY_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp"];

/// Find the output file for `token` in `dir`.
///
/// Matches `<dir>/<token>.*`, skipping temporaries. When several files match, the
/// lexicographically first one wins. Returns `Ok(None)` when nothing matches.
pub async fn locate_output(dir: &Path, token: &str) -> std::io::Result<Option<PathBuf>> {
    let prefix = format!("{token}.");
    let mut matches = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(&prefix) || TEMPORARY_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            continue;
        }
        if entry.file_type().await?.is_file() {
            matches.push(entry.path());
        }
    }

    matches.sort();
    Ok(matches.into_iter().next())
}
