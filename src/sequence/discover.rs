use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{Raw2GifError, Raw2GifResult};
use crate::sequence::natural::natural_cmp;

/// Default glob pattern for simulator snapshots (`sim.0.dat`, `sim.1.dat`, ...).
pub const DEFAULT_PATTERN: &str = "sim.*";

/// List the files in `dir` matching the shell glob `pattern`, in natural file name order.
///
/// `pattern` is relative to `dir` and uses shell glob syntax (`*`, `?`, `[...]`). Directories
/// that happen to match are skipped. Returns [`Raw2GifError::NotFound`] when nothing matches.
#[tracing::instrument(level = "debug", skip_all, fields(dir = %dir.as_ref().display(), pattern = %pattern))]
pub fn discover_frames(dir: impl AsRef<Path>, pattern: &str) -> Raw2GifResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Raw2GifError::not_found(format!(
            "input directory '{}' does not exist or is not a directory",
            dir.display()
        )));
    }
    // Glob patterns are strings, so a directory without a UTF-8 path cannot be listed.
    let dir_str = dir.to_str().ok_or_else(|| {
        Raw2GifError::not_found(format!(
            "input directory '{}' cannot be listed: path is not valid UTF-8",
            dir.display()
        ))
    })?;

    let full = format!("{}/{pattern}", glob::Pattern::escape(dir_str));
    let opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let entries = glob::glob_with(&full, opts)
        .map_err(|e| Raw2GifError::validation(format!("invalid glob pattern '{pattern}': {e}")))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("list '{}'", dir.display()))?;
        if path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(Raw2GifError::not_found(format!(
            "no files matching '{pattern}' in '{}'",
            dir.display()
        )));
    }

    paths.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    tracing::debug!(count = paths.len(), "sorted frame files");
    Ok(paths)
}

fn file_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/discover.rs"]
mod tests;
