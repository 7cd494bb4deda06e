//! # shipdoc-extract
//!
//! Extract structured logistics fields from shipping documents (bills of
//! lading, packing lists, commercial invoices) using OCR and a single
//! LLM call.
//!
//! ## Why this crate?
//!
//! Shipping paperwork arrives as scanned PDFs and ad-hoc spreadsheets whose
//! layouts differ per carrier and per forwarder. Template-based parsers
//! break on every new layout; instead this crate recovers the raw content
//! (OCR for scans, cell grids for workbooks), hands all of it to a language
//! model in one prompt, and normalises the reply into a fixed-shape record
//! a downstream system can rely on — every field key always present, `null`
//! where nothing was found.
//!
//! ## Pipeline Overview
//!
//! ```text
//! files
//!  │
//!  ├─ 1. Route    classify each path by kind (.xlsx / .pdf / other)
//!  ├─ 2. Extract  workbook cell grids via calamine;
//!  │              PDF pages rasterised via pdfium + OCR per page
//!  ├─ 3. Prompt   all raw content serialised into one instruction prompt
//!  ├─ 4. LLM      one bounded call to the configured provider
//!  ├─ 5. Parse    tolerant unwrap (fences stripped) → field record
//!  └─ 6. Derive   average gross weight per package, unit-normalised
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shipdoc_extract::{process_and_extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let config = ExtractionConfig::default();
//!     let paths = vec!["manifest.xlsx".to_string(), "bol_scan.pdf".to_string()];
//!     let envelope = process_and_extract(&paths, &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&envelope)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the `shipdoc-server` binary (axum + clap + tracing-subscriber) |
//!
//! Disable `server` when using only the library to avoid pulling in the
//! HTTP-boundary deps:
//! ```toml
//! shipdoc-extract = { version = "0.1", default-features = false }
//! ```
//!
//! ## External tools
//!
//! Scanned-document support needs the `tesseract` CLI on `PATH` and a
//! loadable pdfium library. Both are consumed as black boxes; see
//! [`pipeline::ocr`] for how per-page failures are tolerated.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod units;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_MODEL};
pub use error::{ExtractError, OcrError, PageError};
pub use extract::{process_and_extract, process_documents};
pub use output::{DocumentContent, ExtractedFields, RawDocumentData, ResponseEnvelope, SheetRows};
pub use pipeline::ocr::{OcrEngine, TesseractOcr};
pub use pipeline::parse::{parse_reply, PARSE_ERROR_MESSAGE};
pub use pipeline::router::DocumentKind;
pub use units::average_weight_per_package;
