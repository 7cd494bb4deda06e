//! Integration tests for the document-reading half of the pipeline.
//!
//! These run fully offline: workbook fixtures are generated on the fly with
//! `rust_xlsxwriter` (the same round trip the upload boundary performs, minus
//! HTTP), and nothing here touches pdfium, tesseract, or a model provider.
//! Live end-to-end coverage lives in `tests/e2e.rs` behind `E2E_ENABLED`.

use shipdoc_extract::{
    process_documents, DocumentContent, ExtractError, ExtractionConfig,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Build a two-sheet workbook that mimics a packing list: a header row, data
/// rows with numeric cells, a fully blank row in the middle, and a sparse row.
fn write_sample_workbook(dir: &Path) -> PathBuf {
    use rust_xlsxwriter::Workbook;

    let path = dir.join("manifest.xlsx");
    let mut workbook = Workbook::new();

    let sheet1 = workbook.add_worksheet();
    sheet1.set_name("Packing List").unwrap();
    sheet1.write_string(0, 0, "Item").unwrap();
    sheet1.write_string(0, 1, "Packages").unwrap();
    sheet1.write_string(0, 2, "Weight").unwrap();
    sheet1.write_string(1, 0, "Product A").unwrap();
    sheet1.write_number(1, 1, 10.0).unwrap();
    sheet1.write_string(1, 2, "6500 KGS").unwrap();
    // A row of nothing but empty strings; must be filtered out.
    sheet1.write_string(2, 0, "").unwrap();
    sheet1.write_string(2, 1, "  ").unwrap();
    sheet1.write_string(2, 2, "").unwrap();
    // Sparse row: only columns A and C populated.
    sheet1.write_string(3, 0, "Product B").unwrap();
    sheet1.write_string(3, 2, "9750 KGS").unwrap();

    let sheet2 = workbook.add_worksheet();
    sheet2.set_name("Pricing").unwrap();
    sheet2.write_string(0, 0, "Product").unwrap();
    sheet2.write_string(0, 1, "Price").unwrap();
    sheet2.write_string(1, 0, "Product A").unwrap();
    sheet2.write_number(1, 1, 999.99).unwrap();
    sheet2.write_string(2, 0, "Product B").unwrap();
    sheet2.write_number(2, 1, 25.5).unwrap();

    workbook.save(&path).unwrap();
    path
}

// ── Spreadsheet extraction ───────────────────────────────────────────────────

#[tokio::test]
async fn workbook_sheets_come_back_in_order_with_text_cells() {
    let dir = TempDir::new().unwrap();
    let xlsx = write_sample_workbook(dir.path());
    let config = ExtractionConfig::default();

    let paths = vec![xlsx.to_string_lossy().into_owned()];
    let data = process_documents(&paths, &config).await.unwrap();

    let content = data.get(paths[0].as_str()).expect("workbook entry");
    let sheets = match content {
        DocumentContent::Sheets(sheets) => sheets,
        other => panic!("expected sheet data, got {other:?}"),
    };

    // Workbook order preserved.
    let names: Vec<&str> = sheets.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Packing List", "Pricing"]);

    let packing = &sheets["Packing List"];
    assert_eq!(packing[0], vec!["Item", "Packages", "Weight"]);
    // Numbers arrive as text.
    assert_eq!(packing[1], vec!["Product A", "10", "6500 KGS"]);
    // The sparse row keeps an empty cell for the gap.
    assert_eq!(packing[2], vec!["Product B", "", "9750 KGS"]);

    let pricing = &sheets["Pricing"];
    assert_eq!(pricing[1], vec!["Product A", "999.99"]);
    assert_eq!(pricing[2], vec!["Product B", "25.5"]);
}

#[tokio::test]
async fn blank_rows_never_appear_in_output() {
    let dir = TempDir::new().unwrap();
    let xlsx = write_sample_workbook(dir.path());
    let config = ExtractionConfig::default();

    let paths = vec![xlsx.to_string_lossy().into_owned()];
    let data = process_documents(&paths, &config).await.unwrap();

    let DocumentContent::Sheets(sheets) = &data[paths[0].as_str()] else {
        panic!("expected sheet data");
    };
    for (name, rows) in sheets {
        for (i, row) in rows.iter().enumerate() {
            assert!(
                row.iter().any(|cell| !cell.trim().is_empty()),
                "sheet '{name}' row {i} is fully blank: {row:?}"
            );
        }
    }
    // The all-empty-strings row was dropped: header + 2 data rows remain.
    assert_eq!(sheets["Packing List"].len(), 3);
}

#[tokio::test]
async fn missing_workbook_fails_the_batch() {
    let config = ExtractionConfig::default();
    let paths = vec!["/nonexistent/manifest.xlsx".to_string()];
    let err = process_documents(&paths, &config).await.unwrap_err();
    assert!(matches!(err, ExtractError::FileNotFound { .. }), "got {err}");
}

#[tokio::test]
async fn corrupt_workbook_fails_the_batch() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("broken.xlsx");
    std::fs::write(&bogus, b"this is not a zip container").unwrap();

    let config = ExtractionConfig::default();
    let paths = vec![bogus.to_string_lossy().into_owned()];
    let err = process_documents(&paths, &config).await.unwrap_err();
    assert!(matches!(err, ExtractError::WorkbookRead { .. }), "got {err}");
}

// ── Routing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unrecognised_extensions_are_silently_skipped() {
    let dir = TempDir::new().unwrap();
    let xlsx = write_sample_workbook(dir.path());
    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, "free-form notes the pipeline ignores").unwrap();

    let config = ExtractionConfig::default();
    let paths = vec![
        xlsx.to_string_lossy().into_owned(),
        txt.to_string_lossy().into_owned(),
    ];
    let data = process_documents(&paths, &config).await.unwrap();

    assert_eq!(data.len(), 1, "only the workbook should produce an entry");
    assert!(data.contains_key(paths[0].as_str()));
    assert!(!data.contains_key(paths[1].as_str()));
}

#[tokio::test]
async fn empty_batch_produces_empty_data() {
    let config = ExtractionConfig::default();
    let data = process_documents(&[], &config).await.unwrap();
    assert!(data.is_empty());
}
