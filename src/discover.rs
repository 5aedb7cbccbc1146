//! Input discovery module
//!
//! Both batch jobs find their inputs by filename prefix inside a directory:
//! the renderer looks for `{prefix}*.html` decks, the merger for
//! `{prefix}*.pdf` rendered decks.

use glob::glob;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Find HTML slide decks under `dir` whose names start with `prefix`,
/// skipping any file whose name contains `exclude` (the compiled/aggregate
/// marker). Results are sorted lexicographically.
///
/// Returns [`Error::NoFilesMatched`] when nothing matches; the render batch
/// fails fast on an empty input set.
pub fn find_decks(dir: &Path, prefix: &str, exclude: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}*.html", dir.join(prefix).display());
    let mut decks = expand(&pattern)?;

    decks.retain(|path| {
        path.file_name()
            .map(|name| !name.to_string_lossy().contains(exclude))
            .unwrap_or(false)
    });

    if decks.is_empty() {
        return Err(Error::NoFilesMatched(pattern));
    }

    Ok(decks)
}

/// Find rendered PDFs under `dir` whose names start with `prefix`, sorted
/// lexicographically. An empty result is not an error here: the merge job
/// treats it as a no-op.
pub fn find_rendered(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}*.pdf", dir.join(prefix).display());
    expand(&pattern)
}

/// Compute the output path for a rendered deck: same base name with the
/// extension swapped to `.pdf`, placed under `out_dir`.
pub fn pdf_output_path(html_path: &Path, out_dir: &Path) -> PathBuf {
    let mut name = html_path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    name.push(".pdf");
    out_dir.join(name)
}

/// Expand a glob pattern into a sorted list of paths
fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob(pattern).map_err(|e| Error::InvalidGlob(e.to_string()))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}
