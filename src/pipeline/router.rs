//! Document classification: resolve each input path to a kind, once.
//!
//! Dispatch used to be a chain of `ends_with` string tests repeated at every
//! call site; resolving a [`DocumentKind`] a single time at ingestion keeps
//! the suffix knowledge in one place and lets `match` exhaustiveness catch a
//! forgotten branch when a new kind is added.

use std::ffi::OsStr;
use std::path::Path;

/// What the pipeline knows how to do with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A tabular workbook (`.xlsx`) — cell-grid extraction.
    Spreadsheet,
    /// A paginated scanned document (`.pdf`) — rasterise and recognise.
    Scanned,
    /// Anything else. Skipped without an entry in the output; callers that
    /// want stricter behaviour must reject these before ingestion.
    Unrecognized,
}

impl DocumentKind {
    /// Classify a path by its extension, ASCII case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => DocumentKind::Spreadsheet,
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => DocumentKind::Scanned,
            _ => DocumentKind::Unrecognized,
        }
    }

    /// True for kinds that produce an extraction entry.
    pub fn is_recognized(self) -> bool {
        !matches!(self, DocumentKind::Unrecognized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension() {
        assert_eq!(
            DocumentKind::from_path(Path::new("/tmp/a.xlsx")),
            DocumentKind::Spreadsheet
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("/tmp/b.pdf")),
            DocumentKind::Scanned
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("/tmp/c.txt")),
            DocumentKind::Unrecognized
        );
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_path(Path::new("SCAN.PDF")),
            DocumentKind::Scanned
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("Manifest.XLSX")),
            DocumentKind::Spreadsheet
        );
    }

    #[test]
    fn oddball_paths_are_unrecognized() {
        assert_eq!(
            DocumentKind::from_path(Path::new("no_extension")),
            DocumentKind::Unrecognized
        );
        assert_eq!(
            DocumentKind::from_path(Path::new(".pdf")),
            DocumentKind::Unrecognized
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("archive.xlsx.bak")),
            DocumentKind::Unrecognized
        );
        assert!(!DocumentKind::Unrecognized.is_recognized());
        assert!(DocumentKind::Scanned.is_recognized());
    }
}
