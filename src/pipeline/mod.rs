//! Pipeline stages for document-to-fields extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. a different OCR engine) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! router ──▶ spreadsheet / ocr ──▶ llm ──▶ parse
//! (by kind)   (raw content)        (one    (tolerant JSON
//!                                  call)    → field record)
//! ```
//!
//! 1. [`router`]      — classify each path once into a document kind
//! 2. [`spreadsheet`] — workbook → sheet-name → rows of string cells
//! 3. [`ocr`]         — rasterise pages via pdfium (`spawn_blocking`, the
//!    library is not async-safe) and recognise each page's text
//! 4. [`llm`]         — build the prompt and drive the single model call;
//!    the only stage with network I/O
//! 5. [`parse`]       — tolerant unwrap of the model reply into the
//!    fixed-shape field record

pub mod llm;
pub mod ocr;
pub mod parse;
pub mod router;
pub mod spreadsheet;
