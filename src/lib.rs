//! Deck2pdf Library
//!
//! A library for batch-converting HTML slide decks to PDF and merging the
//! results into one document. This library provides functionality to:
//! - Discover slide-deck files by filename prefix
//! - Render HTML decks to fixed-size PDFs with a headless browser
//! - Order rendered decks by a slide-number token in their filenames
//! - Merge multiple PDF files page-accurately
//! - Count pages and report totals
//!
//! # Example
//!
//! ```no_run
//! use deck2pdf::pdf::{MergeOptions, merge_decks};
//! use std::path::PathBuf;
//!
//! let options = MergeOptions {
//!     input_paths: vec![
//!         PathBuf::from("DAY 3 slides 1-12.pdf"),
//!         PathBuf::from("DAY 3 slides 13-19.pdf"),
//!     ],
//!     output_path: PathBuf::from("DAY 3 - Complete Slides.pdf"),
//!     keep_going: false,
//! };
//!
//! let report = merge_decks(&options).expect("Failed to merge PDFs");
//! println!("Total pages: {}", report.total_pages);
//! ```

pub mod discover;
pub mod error;
pub mod order;
pub mod pdf;
pub mod render;

// Re-export commonly used items
pub use error::{Error, Result};
