//! Headless-browser rendering of HTML slide decks to PDF
//!
//! One Chrome process is launched per [`Renderer`] and each deck gets a
//! fresh tab, so no style or media state leaks between conversions. Decks
//! are captured under screen-media emulation (not print): many CSS
//! frameworks hide visual content behind print stylesheets, and the decks
//! are authored for a 1920x1080 screen.

use headless_chrome::protocol::cdp::Emulation;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Logical viewport for capture, in CSS pixels
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

// PDF page size matching the viewport: 1920x1080 px at 96 dpi
const PAGE_WIDTH_INCHES: f64 = 20.0;
const PAGE_HEIGHT_INCHES: f64 = 11.25;

// Upper bound on the document.fonts.ready wait
const FONT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

// Settle delay after fonts report ready, for late async paints
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Stylesheet injected before capture: kill shadow/filter effects, force
/// exact colors under print media, and break each `.slide` element onto
/// its own page. The last slide flows naturally so no trailing blank page
/// is emitted.
const FIDELITY_CSS: &str = "\
*,\n\
*::before,\n\
*::after {\n\
    box-shadow: none !important;\n\
    text-shadow: none !important;\n\
    filter: none !important;\n\
}\n\
\n\
@media print {\n\
    * {\n\
        -webkit-print-color-adjust: exact !important;\n\
        print-color-adjust: exact !important;\n\
        color-adjust: exact !important;\n\
    }\n\
\n\
    body {\n\
        -webkit-print-color-adjust: exact !important;\n\
        print-color-adjust: exact !important;\n\
    }\n\
\n\
    .slide {\n\
        page-break-after: always;\n\
        page-break-inside: avoid;\n\
        break-after: page;\n\
        break-inside: avoid;\n\
    }\n\
\n\
    .slide:last-child {\n\
        page-break-after: auto;\n\
    }\n\
}\n\
\n\
.slide {\n\
    page-break-after: always !important;\n\
    page-break-inside: avoid !important;\n\
}\n\
\n\
.slide:last-child {\n\
    page-break-after: auto !important;\n\
}\n";

/// A headless Chrome instance shared across one render batch.
///
/// # Example
///
/// ```no_run
/// use deck2pdf::render::Renderer;
/// use std::path::Path;
///
/// let renderer = Renderer::new().expect("Failed to launch browser");
/// let slides = renderer
///     .render(Path::new("DAY 3 slides 1-12.html"), Path::new("pdf_output/DAY 3 slides 1-12.pdf"))
///     .expect("Failed to render deck");
/// println!("Rendered {} slides", slides);
/// ```
pub struct Renderer {
    browser: Browser,
}

impl Renderer {
    /// Launch a headless browser configured for color-faithful capture:
    /// sRGB color profile, dark-mode and forced-colors features disabled,
    /// window sized to the capture viewport.
    pub fn new() -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((VIEWPORT_WIDTH, VIEWPORT_HEIGHT)))
            .args(vec![
                OsStr::new("--force-color-profile=srgb"),
                OsStr::new("--disable-features=ForcedColors,DarkMode,WebContentsForceDark"),
            ])
            .build()
            .map_err(|e| Error::Browser(e.to_string()))?;

        let browser = Browser::new(options)?;

        Ok(Renderer { browser })
    }

    /// Render one HTML deck to a PDF file, overwriting any existing file
    /// at `pdf_path`. Returns the number of `.slide` elements observed in
    /// the live document (operator feedback only).
    pub fn render(&self, html_path: &Path, pdf_path: &Path) -> Result<usize> {
        let html_path = html_path
            .canonicalize()
            .map_err(|_| Error::FileNotFound(html_path.to_path_buf()))?;
        let file_url = Url::from_file_path(&html_path)
            .map_err(|_| Error::General(format!("Not an absolute path: {}", html_path.display())))?;

        let tab = self.browser.new_tab()?;
        tab.set_default_timeout(FONT_WAIT_TIMEOUT);

        // Emulate screen media (NOT print) with a light color scheme so
        // the on-screen styles are what gets captured
        tab.call_method(Emulation::SetEmulatedMedia {
            media: Some("screen".to_string()),
            features: Some(vec![
                Emulation::MediaFeature {
                    name: "prefers-color-scheme".to_string(),
                    value: "light".to_string(),
                },
                Emulation::MediaFeature {
                    name: "forced-colors".to_string(),
                    value: "none".to_string(),
                },
            ]),
        })?;

        tab.navigate_to(file_url.as_str())?;
        tab.wait_until_navigated()?;

        // Wait for web fonts, bounded by the tab timeout. A page without
        // the Font Loading API (or a hung fetch) falls through to the
        // settle delay below rather than blocking the batch.
        let _ = tab.evaluate("document.fonts.ready.then(() => true)", true);
        std::thread::sleep(SETTLE_DELAY);

        let slide_count = self.inject_fidelity_styles(&tab)?;

        let pdf_bytes = tab.print_to_pdf(Some(PrintToPdfOptions {
            landscape: Some(false),
            display_header_footer: Some(false),
            print_background: Some(true),
            scale: Some(1.0),
            paper_width: Some(PAGE_WIDTH_INCHES),
            paper_height: Some(PAGE_HEIGHT_INCHES),
            margin_top: Some(0.0),
            margin_bottom: Some(0.0),
            margin_left: Some(0.0),
            margin_right: Some(0.0),
            prefer_css_page_size: Some(true),
            ..Default::default()
        }))?;

        fs::write(pdf_path, &pdf_bytes)?;

        // Tab teardown failures don't invalidate the written PDF
        let _ = tab.close(true);

        Ok(slide_count)
    }

    /// Append the fidelity stylesheet to the live document and return the
    /// number of slide-marked elements.
    fn inject_fidelity_styles(&self, tab: &headless_chrome::Tab) -> Result<usize> {
        let script = format!(
            "(() => {{\n\
                 const style = document.createElement('style');\n\
                 style.textContent = {FIDELITY_CSS:?};\n\
                 document.head.appendChild(style);\n\
                 return document.querySelectorAll('.slide').length;\n\
             }})()"
        );

        let result = tab.evaluate(&script, false)?;
        let slide_count = result
            .value
            .and_then(|value| value.as_u64())
            .unwrap_or(0);

        Ok(slide_count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_matches_viewport_at_96_dpi() {
        assert_eq!(PAGE_WIDTH_INCHES * 96.0, VIEWPORT_WIDTH as f64);
        assert_eq!(PAGE_HEIGHT_INCHES * 96.0, VIEWPORT_HEIGHT as f64);
    }

    #[test]
    fn test_fidelity_css_lets_last_slide_flow() {
        // Every .slide breaks onto its own page except the last, which
        // would otherwise leave a trailing blank page
        assert!(FIDELITY_CSS.contains("page-break-after: always !important"));
        assert!(FIDELITY_CSS.contains(".slide:last-child"));
        assert!(FIDELITY_CSS.contains("page-break-after: auto !important"));
    }
}
