//! PDF concatenation using lopdf
//!
//! Rendered decks are merged in the caller-supplied order: objects from
//! each document are renumbered into one ID space, the page objects are
//! collected into a single page tree, and a fresh catalog is written on
//! top. Based on the lopdf merge example:
//! https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Options for merging rendered decks
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order their pages should appear
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path (overwritten if present)
    pub output_path: PathBuf,
    /// Skip inputs that fail to load instead of aborting the merge
    pub keep_going: bool,
}

/// Outcome of a merge: per-file page counts in merge order, inputs
/// skipped under `keep_going`, and the grand total.
#[derive(Debug)]
pub struct MergeReport {
    /// Each merged input with its page count, in output order
    pub merged: Vec<(PathBuf, usize)>,
    /// Inputs that failed to load, with the underlying error message
    pub skipped: Vec<(PathBuf, String)>,
    /// Sum of all merged inputs' page counts
    pub total_pages: usize,
}

/// Merge rendered deck PDFs into a single document
///
/// # Example
///
/// ```no_run
/// use deck2pdf::pdf::{MergeOptions, merge_decks};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("DAY 3 slides 1-12.pdf"),
///         PathBuf::from("DAY 3 slides 13-19.pdf"),
///     ],
///     output_path: PathBuf::from("DAY 3 - Complete Slides.pdf"),
///     keep_going: false,
/// };
///
/// let report = merge_decks(&options).expect("Failed to merge");
/// assert_eq!(report.total_pages, report.merged.iter().map(|(_, n)| n).sum::<usize>());
/// ```
pub fn merge_decks(options: &MergeOptions) -> Result<MergeReport> {
    if options.input_paths.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    // Load every input up front so ordering survives skips
    let mut documents: Vec<(PathBuf, Document)> = Vec::new();
    let mut skipped: Vec<(PathBuf, String)> = Vec::new();

    for path in &options.input_paths {
        match load_deck(path) {
            Ok(doc) => documents.push((path.clone(), doc)),
            Err(e) if options.keep_going => skipped.push((path.clone(), e.to_string())),
            Err(e) => return Err(e),
        }
    }

    if documents.is_empty() {
        return Err(Error::General(
            "No input file could be loaded".to_string(),
        ));
    }

    // Renumber each document into a shared object ID space and collect
    // its pages in order
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut merged: Vec<(PathBuf, usize)> = Vec::new();
    let mut total_pages = 0;

    for (path, mut doc) in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = doc.get_pages();
        let page_count = pages.len();
        total_pages += page_count;
        merged.push((path, page_count));

        page_ids.extend(pages.into_iter().map(|(_, id)| id));
        objects.extend(doc.objects);
    }

    let mut merged_doc = Document::with_version("1.5");
    merged_doc.objects.extend(objects);

    // new_object_id() must hand out IDs above everything just inserted,
    // or the catalog would collide with a source object
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();

    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged_doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    // Reparent every page onto the new page tree
    for &page_id in &page_ids {
        if let Ok(page_object) = merged_doc.get_object_mut(page_id) {
            if let Object::Dictionary(ref mut dict) = page_object {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    merged_doc.compress();
    merged_doc.save(&options.output_path)?;

    Ok(MergeReport {
        merged,
        skipped,
        total_pages,
    })
}

/// Load one input and reject documents with no pages
fn load_deck(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;

    if doc.get_pages().is_empty() {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_empty_input_list_is_error() {
        let options = MergeOptions {
            input_paths: vec![],
            output_path: PathBuf::from("merged.pdf"),
            keep_going: false,
        };

        let result = merge_decks(&options);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_strict_missing_file_is_error() {
        let options = MergeOptions {
            input_paths: vec![PathBuf::from("nonexistent.pdf")],
            output_path: PathBuf::from("merged.pdf"),
            keep_going: false,
        };

        let result = merge_decks(&options);
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    // End-to-end merges over real documents live in tests/integration.rs
}
