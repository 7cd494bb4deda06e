//! Error types for the shipdoc-extract library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the request cannot proceed at all
//!   (missing file, corrupt workbook, provider not configured, LLM
//!   transport failure). Returned as `Err(ExtractError)` from the
//!   top-level `process_*` functions; the whole batch fails.
//!
//! * [`PageError`] — **Non-fatal**: recognition failed on a single page of
//!   a scanned document. Logged and skipped so one unreadable page does
//!   not lose the rest of the document.
//!
//! A malformed model reply is deliberately *not* an error at all — it is
//! represented in-band as the fallback [`crate::output::ExtractedFields`]
//! record, so callers always receive the full field set.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the shipdoc-extract library.
///
/// Per-page OCR failures use [`PageError`] and are logged rather than
/// propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("file is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt or unreadable: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The workbook container could not be opened or a sheet range read.
    #[error("workbook '{path}' could not be read: {detail}")]
    WorkbookRead { path: PathBuf, detail: String },

    /// pdfium returned an error while rendering a specific page.
    #[error("rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No provider could be resolved (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The text-generation API failed (transport, quota, auth). Not retried.
    #[error("LLM API error: {message}")]
    Llm { message: String },

    /// The model call exceeded the configured deadline.
    #[error("LLM call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\
         Install pdfium or point PDFIUM_DYNAMIC_LIB_PATH at an existing copy."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal recognition failure for a single page of a scanned document.
///
/// Logged by the extractor; the page's text is omitted and processing
/// continues with the next page.
#[derive(Debug, Clone, Error)]
pub enum PageError {
    /// The OCR engine failed on this page.
    #[error("page {page}: text recognition failed: {detail}")]
    OcrFailed { page: usize, detail: String },
}

/// Failures inside an [`crate::pipeline::ocr::OcrEngine`] invocation.
///
/// Wrapped into a [`PageError`] with the page number by the extractor.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine process could not be started (binary missing, etc.).
    #[error("failed to launch OCR engine: {0}")]
    Launch(#[source] std::io::Error),

    /// The engine ran but reported failure.
    #[error("OCR engine exited with {status}: {stderr}")]
    Engine { status: String, stderr: String },

    /// The page image could not be written for the engine to read.
    #[error("failed to encode page image: {0}")]
    PageImage(#[source] image::ImageError),

    /// Scratch-space setup failed.
    #[error("failed to create OCR scratch directory: {0}")]
    Scratch(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = ExtractError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("/tmp/missing.pdf"));
    }

    #[test]
    fn api_timeout_display() {
        let e = ExtractError::ApiTimeout { secs: 60 };
        assert!(e.to_string().contains("60s"));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::OcrFailed {
            page: 3,
            detail: "empty output".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("empty output"));
    }

    #[test]
    fn workbook_read_display() {
        let e = ExtractError::WorkbookRead {
            path: PathBuf::from("manifest.xlsx"),
            detail: "Zip error".into(),
        };
        assert!(e.to_string().contains("manifest.xlsx"));
    }
}
