//! Scanned-document extraction: rasterise pages via pdfium, recognise each
//! page's text with an [`OcrEngine`].
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which keeps thread-local
//! state and is not safe to call from async contexts; the tesseract engine
//! is a subprocess wait. Both run on the blocking pool so Tokio workers are
//! never stalled.
//!
//! ## Failure model
//!
//! Opening or rasterising the document fails the whole file: a missing
//! file, a non-PDF, a corrupt document, or an unbindable pdfium library all
//! propagate (logged first). A recognition failure on an individual page
//! does not — the page is logged and skipped, because a nine-page result is
//! worth more than none when page three is an illegible stamp.

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, OcrError, PageError};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Text recognition over a single rendered page image.
///
/// Implementations must be cheap to call repeatedly; the extractor invokes
/// them once per page, strictly in page order.
pub trait OcrEngine: Send + Sync {
    /// Recognise the text on one page image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// The default engine: shells out to the `tesseract` CLI.
///
/// Each page is written as a PNG into a scratch directory (removed on drop)
/// and fed to `tesseract <png> stdout -l <lang>`. Using the CLI rather than
/// linking libtesseract keeps the build free of native-library plumbing and
/// matches how the binary is deployed alongside the system package.
pub struct TesseractOcr {
    lang: String,
}

impl TesseractOcr {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    /// Whether the `tesseract` binary can be launched at all.
    ///
    /// Worth checking once at startup: without it every page of every
    /// scanned document will fail recognition and yield empty text.
    pub fn available() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let scratch = tempfile::tempdir().map_err(OcrError::Scratch)?;
        let png_path = scratch.path().join("page.png");
        image
            .save_with_format(&png_path, image::ImageFormat::Png)
            .map_err(OcrError::PageImage)?;

        let output = Command::new("tesseract")
            .arg(&png_path)
            .arg("stdout")
            .args(["-l", &self.lang])
            .output()
            .map_err(OcrError::Launch)?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extract the text of a scanned document, page by page.
///
/// Returns the concatenation of each page's recognised text separated by
/// newlines, trimmed. Pages whose recognition fails are logged and omitted;
/// everything else about the document failing is fatal.
pub async fn extract_text(
    path: &Path,
    engine: Arc<dyn OcrEngine>,
    config: &ExtractionConfig,
) -> Result<String, ExtractError> {
    validate_pdf(path).map_err(|e| {
        error!("cannot read scanned document {}: {e}", path.display());
        e
    })?;

    let pages = render_pages(path, config.max_render_pixels)
        .await
        .map_err(|e| {
            error!("failed to rasterise {}: {e}", path.display());
            e
        })?;

    let total = pages.len();
    let mut text = String::new();
    for (idx, page_image) in pages {
        let page_num = idx + 1;
        let engine = Arc::clone(&engine);
        let recognized = tokio::task::spawn_blocking(move || engine.recognize(&page_image))
            .await
            .map_err(|e| ExtractError::Internal(format!("OCR task panicked: {e}")))?;

        match recognized {
            Ok(page_text) => {
                debug!(
                    "recognised page {page_num}/{total} of {} ({} chars)",
                    path.display(),
                    page_text.len()
                );
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => {
                let page_err = PageError::OcrFailed {
                    page: page_num,
                    detail: e.to_string(),
                };
                warn!("{} in {}; continuing", page_err, path.display());
            }
        }
    }

    Ok(text.trim().to_string())
}

/// Validate existence, readability, and the `%PDF` magic bytes.
fn validate_pdf(path: &Path) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Rasterise every page of a PDF into images, in page order.
async fn render_pages(
    path: &Path,
    max_pixels: u32,
) -> Result<Vec<(usize, DynamicImage)>, ExtractError> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || render_pages_blocking(&owned, max_pixels))
        .await
        .map_err(|e| ExtractError::Internal(format!("render task panicked: {e}")))?
}

/// Blocking implementation of page rendering.
fn render_pages_blocking(
    path: &Path,
    max_pixels: u32,
) -> Result<Vec<(usize, DynamicImage)>, ExtractError> {
    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{e:?}")))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| ExtractError::CorruptPdf {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    let mut results = Vec::with_capacity(total_pages);
    for idx in 0..total_pages {
        let page = pages
            .get(idx as u16)
            .map_err(|e| ExtractError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ExtractError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?;
        let page_image = bitmap.as_image();
        debug!(
            "rendered page {} of {} → {}x{} px",
            idx + 1,
            path.display(),
            page_image.width(),
            page_image.height()
        );
        results.push((idx, page_image));
    }

    Ok(results)
}
