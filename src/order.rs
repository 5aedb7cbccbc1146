//! Slide-number ordering module
//!
//! Rendered decks are sequenced by an integer token embedded in their
//! filenames ("slides 1-12", "slide 131", ...). An optional manifest file
//! can override that order explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Sort key assigned to filenames with no parsable slide-number token.
/// Large enough to place them after every numbered deck.
pub const UNNUMBERED_KEY: u64 = 999_999;

/// Matches the first integer following a "slide" or "slides" token,
/// case-insensitively, anywhere in the filename.
static SLIDE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)slides?\s*(\d+)").unwrap());

/// Extract the starting slide number from a filename.
///
/// Supported shapes:
/// - `"DAY 3 slides 1-12.pdf"` → 1
/// - `"DAY 3 slides 20-27d.pdf"` → 20
/// - `"DAY 3 slide 131.pdf"` → 131
/// - `"DAY 3 recap.pdf"` → [`UNNUMBERED_KEY`]
pub fn sort_key(filename: &str) -> u64 {
    SLIDE_TOKEN
        .captures(filename)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(UNNUMBERED_KEY)
}

/// Sort paths ascending by the slide-number key of their file names.
///
/// The sort is stable: ties, including ties between unnumbered files,
/// keep the original enumeration order.
pub fn sort_by_slide_number(paths: &mut [PathBuf]) {
    paths.sort_by_key(|path| sort_key(&file_name(path)));
}

/// Read an ordering manifest: one filename per line, `#` comments and
/// blank lines ignored.
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Order paths by an explicit manifest, falling back to slide-number order.
///
/// Files named in the manifest come first, in manifest order. Files the
/// manifest doesn't mention follow, sorted by slide number. Manifest
/// entries with no matching file are ignored.
pub fn apply_manifest(paths: &mut Vec<PathBuf>, manifest: &[String]) {
    let mut listed: Vec<PathBuf> = Vec::new();
    let mut rest: Vec<PathBuf> = std::mem::take(paths);

    for entry in manifest {
        if let Some(pos) = rest.iter().position(|p| file_name(p) == *entry) {
            listed.push(rest.remove(pos));
        }
    }

    sort_by_slide_number(&mut rest);
    listed.extend(rest);
    *paths = listed;
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_range_token() {
        assert_eq!(sort_key("DAY 3 slides 1-12.pdf"), 1);
        assert_eq!(sort_key("DAY 3 slides 20-27d.pdf"), 20);
    }

    #[test]
    fn test_sort_key_single_token() {
        assert_eq!(sort_key("DAY 3 slide 131.pdf"), 131);
    }

    #[test]
    fn test_sort_key_case_insensitive() {
        assert_eq!(sort_key("DAY 3 SLIDES 42.pdf"), 42);
        assert_eq!(sort_key("day 3 Slide7.pdf"), 7);
    }

    #[test]
    fn test_sort_key_unnumbered_sentinel() {
        assert_eq!(sort_key("DAY 3 recap.pdf"), UNNUMBERED_KEY);
        assert_eq!(sort_key(""), UNNUMBERED_KEY);
    }

    #[test]
    fn test_sort_orders_ascending_regardless_of_discovery_order() {
        let mut paths = vec![
            PathBuf::from("DAY 3 slide 131.pdf"),
            PathBuf::from("DAY 3 slides 1-12.pdf"),
            PathBuf::from("DAY 3 slides 20-27d.pdf"),
        ];
        sort_by_slide_number(&mut paths);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("DAY 3 slides 1-12.pdf"),
                PathBuf::from("DAY 3 slides 20-27d.pdf"),
                PathBuf::from("DAY 3 slide 131.pdf"),
            ]
        );
    }

    #[test]
    fn test_unnumbered_sorts_last_preserving_discovery_order() {
        let mut paths = vec![
            PathBuf::from("notes B.pdf"),
            PathBuf::from("DAY 3 slides 5.pdf"),
            PathBuf::from("notes A.pdf"),
            PathBuf::from("DAY 3 slides 2.pdf"),
        ];
        sort_by_slide_number(&mut paths);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("DAY 3 slides 2.pdf"),
                PathBuf::from("DAY 3 slides 5.pdf"),
                // Unnumbered ties keep their original order
                PathBuf::from("notes B.pdf"),
                PathBuf::from("notes A.pdf"),
            ]
        );
    }

    #[test]
    fn test_manifest_overrides_slide_order() {
        let mut paths = vec![
            PathBuf::from("DAY 3 slides 1-12.pdf"),
            PathBuf::from("DAY 3 slides 13-19.pdf"),
            PathBuf::from("DAY 3 slide 131.pdf"),
        ];
        let manifest = vec![
            "DAY 3 slide 131.pdf".to_string(),
            "DAY 3 slides 1-12.pdf".to_string(),
        ];
        apply_manifest(&mut paths, &manifest);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("DAY 3 slide 131.pdf"),
                PathBuf::from("DAY 3 slides 1-12.pdf"),
                // Unlisted files follow in slide-number order
                PathBuf::from("DAY 3 slides 13-19.pdf"),
            ]
        );
    }

    #[test]
    fn test_manifest_unknown_entries_ignored() {
        let mut paths = vec![PathBuf::from("DAY 3 slides 5.pdf")];
        let manifest = vec!["missing.pdf".to_string()];
        apply_manifest(&mut paths, &manifest);
        assert_eq!(paths, vec![PathBuf::from("DAY 3 slides 5.pdf")]);
    }
}
