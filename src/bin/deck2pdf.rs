//! Deck2pdf CLI tool
//!
//! A command-line tool for batch-converting HTML slide decks to PDF and
//! merging the results into one document, ordered by slide number.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use deck2pdf::discover::{find_decks, find_rendered, pdf_output_path};
use deck2pdf::order::{apply_manifest, read_manifest, sort_by_slide_number};
use deck2pdf::pdf::{merge_decks, MergeOptions, MergeReport};
use deck2pdf::render::Renderer;

/// Deck2pdf - Render HTML slide decks to PDF and merge them in slide order
#[derive(Parser)]
#[command(name = "deck2pdf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Render every deck in the current directory to pdf_output/
    deck2pdf render

    # Render decks from another course day
    deck2pdf render decks/ --prefix \"DAY 2 slide\"

    # Merge the rendered PDFs in slide-number order
    deck2pdf merge pdf_output

    # Merge in an explicit order instead of the filename order
    deck2pdf merge pdf_output --manifest order.txt

    # Render and merge in one run, aborting on the first failure
    deck2pdf build --strict")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render HTML slide decks to one PDF per deck
    Render {
        /// Directory containing the HTML decks
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Filename prefix of the decks to convert
        #[arg(long, default_value = "DAY 3 slide")]
        prefix: String,

        /// Skip files whose name contains this marker
        #[arg(long, default_value = "MEGA COMPILED")]
        exclude: String,

        /// Subdirectory (under DIR) for the rendered PDFs
        #[arg(long, default_value = "pdf_output")]
        out_dir: PathBuf,

        /// Abort on the first failed deck instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Merge rendered deck PDFs into one document
    Merge {
        /// Directory containing the rendered PDFs
        #[arg(default_value = "pdf_output")]
        dir: PathBuf,

        /// Filename prefix of the PDFs to merge
        #[arg(long, default_value = "DAY 3")]
        prefix: String,

        /// Output PDF path [default: "<prefix> - Complete Slides.pdf" next to DIR]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ordering manifest: one filename per line, # comments allowed.
        /// Unlisted files follow in slide-number order.
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Abort on the first unreadable PDF instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Render and merge in one step
    Build {
        /// Directory containing the HTML decks
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Filename prefix of the decks to convert
        #[arg(long, default_value = "DAY 3 slide")]
        prefix: String,

        /// Filename prefix of the PDFs to merge
        #[arg(long, default_value = "DAY 3")]
        merge_prefix: String,

        /// Skip files whose name contains this marker
        #[arg(long, default_value = "MEGA COMPILED")]
        exclude: String,

        /// Subdirectory (under DIR) for the rendered PDFs
        #[arg(long, default_value = "pdf_output")]
        out_dir: PathBuf,

        /// Output PDF path [default: "<merge-prefix> - Complete Slides.pdf" in DIR]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ordering manifest: one filename per line, # comments allowed
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Abort on the first failed file instead of skipping it
        #[arg(long)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render { dir, prefix, exclude, out_dir, strict } => {
            cmd_render(&dir, &prefix, &exclude, &out_dir, strict)
        }
        Commands::Merge { dir, prefix, output, manifest, strict } => {
            cmd_merge(&dir, &prefix, output, manifest.as_deref(), strict)
        }
        Commands::Build {
            dir, prefix, merge_prefix, exclude, out_dir, output, manifest, strict,
        } => {
            cmd_build(
                &dir, &prefix, &merge_prefix, &exclude, &out_dir, output,
                manifest.as_deref(), strict,
            )
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Render every matching deck under `dir` into `dir/out_dir`
fn cmd_render(
    dir: &Path,
    prefix: &str,
    exclude: &str,
    out_dir: &Path,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Zero matching decks is fatal for the render batch
    let decks = find_decks(dir, prefix, exclude)?;

    eprintln!("Found {} slide decks to convert:", decks.len());
    for deck in &decks {
        eprintln!("  - {}", display_name(deck));
    }
    eprintln!();

    let out_dir = dir.join(out_dir);
    fs::create_dir_all(&out_dir)?;

    // One browser for the whole batch; each deck gets its own tab
    let renderer = Renderer::new()?;

    let mut converted = 0;
    let mut total_slides = 0;

    for deck in &decks {
        let pdf_path = pdf_output_path(deck, &out_dir);
        eprintln!("Converting: {}", display_name(deck));

        match renderer.render(deck, &pdf_path) {
            Ok(slides) => {
                eprintln!("  {} slides -> {}", slides, display_name(&pdf_path));
                converted += 1;
                total_slides += slides;
            }
            Err(e) if strict => {
                return Err(format!("{}: {}", display_name(deck), e).into());
            }
            Err(e) => {
                eprintln!("  ERROR: {}", e);
            }
        }
    }

    eprintln!();
    eprintln!(
        "Conversion complete: {} of {} decks, {} slides total",
        converted,
        decks.len(),
        total_slides
    );
    eprintln!("PDF files saved to: {}", out_dir.display());

    if converted == 0 {
        return Err("every deck failed to convert".into());
    }

    Ok(())
}

/// Merge the rendered PDFs under `dir` into one document
fn cmd_merge(
    dir: &Path,
    prefix: &str,
    output: Option<PathBuf>,
    manifest: Option<&Path>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pdfs = find_rendered(dir, prefix)?;

    // Nothing to merge is a no-op, not an error
    if pdfs.is_empty() {
        eprintln!(
            "No {} PDF files found in {}",
            prefix,
            dir.display()
        );
        return Ok(());
    }

    match manifest {
        Some(manifest_path) => {
            let entries = read_manifest(manifest_path)?;
            apply_manifest(&mut pdfs, &entries);
        }
        None => sort_by_slide_number(&mut pdfs),
    }

    let output = output.unwrap_or_else(|| {
        dir.parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{} - Complete Slides.pdf", prefix))
    });

    eprintln!("Merging {} PDF files:", pdfs.len());

    let options = MergeOptions {
        input_paths: pdfs,
        output_path: output.clone(),
        keep_going: !strict,
    };

    let report = merge_decks(&options)?;
    print_merge_report(&report, &output);

    Ok(())
}

/// Render then merge in one run
#[allow(clippy::too_many_arguments)]
fn cmd_build(
    dir: &Path,
    prefix: &str,
    merge_prefix: &str,
    exclude: &str,
    out_dir: &Path,
    output: Option<PathBuf>,
    manifest: Option<&Path>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Step 1: Rendering decks...");
    cmd_render(dir, prefix, exclude, out_dir, strict)?;

    eprintln!();
    eprintln!("Step 2: Merging rendered PDFs...");
    let output = output.unwrap_or_else(|| {
        dir.join(format!("{} - Complete Slides.pdf", merge_prefix))
    });
    cmd_merge(&dir.join(out_dir), merge_prefix, Some(output), manifest, strict)
}

fn print_merge_report(report: &MergeReport, output: &Path) {
    for (path, pages) in &report.merged {
        eprintln!("  {} ({} pages)", display_name(path), pages);
    }
    for (path, message) in &report.skipped {
        eprintln!("  SKIPPED {}: {}", display_name(path), message);
    }

    eprintln!();
    eprintln!("Merged PDF created: {}", output.display());
    eprintln!("Total pages: {}", report.total_pages);
}
