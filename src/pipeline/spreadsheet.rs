//! Workbook extraction: `.xlsx` → sheet name → rows of string cells.
//!
//! calamine reads the whole sheet range up front, so the workbook handle
//! lives only for the duration of [`read_workbook`] and is closed by scope
//! no matter how far extraction got. Reads are synchronous zip/XML work and
//! run under `spawn_blocking`.
//!
//! ## Blank-row policy
//!
//! Real manifests carry formatting on thousands of rows past the data, which
//! calamine dutifully reports as empty cells. A row is kept only when at
//! least one cell still has content after trimming, so trailing blank rows
//! never reach the prompt.

use crate::error::ExtractError;
use crate::output::SheetRows;
use calamine::{open_workbook, Reader, Xlsx};
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// Extract every sheet of a workbook, in workbook order.
///
/// # Errors
/// [`ExtractError::FileNotFound`] when the path does not exist;
/// [`ExtractError::WorkbookRead`] when the container is corrupt or a sheet
/// range cannot be read. Both are fatal for the batch.
pub async fn extract_sheets(path: &Path) -> Result<IndexMap<String, SheetRows>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || read_workbook(&owned))
        .await
        .map_err(|e| ExtractError::Internal(format!("workbook task panicked: {e}")))?
}

/// Blocking implementation of workbook extraction.
fn read_workbook(path: &Path) -> Result<IndexMap<String, SheetRows>, ExtractError> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| ExtractError::WorkbookRead {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    let mut sheets = IndexMap::new();
    for name in workbook.sheet_names().to_vec() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ExtractError::WorkbookRead {
                path: path.to_path_buf(),
                detail: format!("sheet '{name}': {e}"),
            })?;

        let rows: SheetRows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
            .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
            .collect();

        debug!(
            "workbook {}: sheet '{}' → {} rows",
            path.display(),
            name,
            rows.len()
        );
        sheets.insert(name, rows);
    }

    Ok(sheets)
}
