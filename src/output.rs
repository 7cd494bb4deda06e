//! Output types: raw per-document content, the extracted field record, and
//! the response envelope callers receive.
//!
//! ## The fixed-shape contract
//!
//! [`ExtractedFields`] always serialises every declared field key, using
//! `null` for anything the model could not determine. Downstream consumers
//! (spreadsheet importers, customs software) index into the record by key and
//! break on missing keys, so "unknown" must be an explicit `null`, never an
//! omission. The diagnostic `error`/`raw_response` pair appears only when the
//! model reply could not be parsed at all.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered rows of string cells for one worksheet.
pub type SheetRows = Vec<Vec<String>>;

/// Raw content recovered from a single document.
///
/// Serialises untagged: a scanned document becomes a plain JSON string, a
/// workbook becomes a `{sheet: [[cell, ...], ...]}` object — the shape the
/// wire contract promises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentContent {
    /// Concatenated recognised text of a scanned document.
    Text(String),
    /// Worksheet name → retained rows, in workbook order.
    Sheets(IndexMap<String, SheetRows>),
}

/// Raw extraction results keyed by file path, in input order.
///
/// Built once per request and never mutated afterwards; unrecognised files
/// contribute no entry.
pub type RawDocumentData = IndexMap<String, DocumentContent>;

/// The structured logistics record produced from one batch of documents.
///
/// Every field is a string-or-null exactly as the model reported it (the
/// model is instructed to echo values verbatim, units included);
/// `average_gross_weight` is the one exception — it is recomputed from
/// `gross_weight` and `package_count` after parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default)]
    pub bill_of_lading_number: Option<String>,
    #[serde(default)]
    pub container_number: Option<String>,
    #[serde(default)]
    pub consignee_name: Option<String>,
    #[serde(default)]
    pub consignee_address: Option<String>,
    #[serde(default)]
    pub date_of_export: Option<String>,
    #[serde(default)]
    pub line_items_count: Option<String>,
    #[serde(default)]
    pub package_count: Option<String>,
    #[serde(default)]
    pub gross_weight: Option<String>,
    /// Derived: gross weight (kilograms) ÷ package count.
    #[serde(default)]
    pub average_gross_weight: Option<String>,
    #[serde(default)]
    pub average_price: Option<String>,

    // ── Diagnostics, present only on the fallback path ───────────────────
    /// Fixed diagnostic message set when the model reply was unparsable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The untouched model reply, kept for debugging alongside `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl ExtractedFields {
    /// The fallback record: every declared field null, plus diagnostics.
    pub fn unparsed(message: &str, raw_reply: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            raw_response: Some(raw_reply.to_string()),
            ..Self::default()
        }
    }

    /// True when this record came from the unparsable-reply fallback.
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything returned for one processed upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Per-file raw content, keyed by path, recognised files only.
    pub raw_document_data: RawDocumentData,
    /// The structured record distilled from all documents together.
    pub extracted_fields: ExtractedFields,
    /// The input path list, echoed verbatim (unrecognised entries included).
    pub processed_files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_declared_keys_serialise_even_when_null() {
        let value = serde_json::to_value(ExtractedFields::default()).unwrap();
        let map = value.as_object().unwrap();
        for key in [
            "bill_of_lading_number",
            "container_number",
            "consignee_name",
            "consignee_address",
            "date_of_export",
            "line_items_count",
            "package_count",
            "gross_weight",
            "average_gross_weight",
            "average_price",
        ] {
            assert!(map.contains_key(key), "missing declared key {key}");
            assert!(map[key].is_null(), "{key} should default to null");
        }
        // Diagnostics stay off the wire unless set.
        assert!(!map.contains_key("error"));
        assert!(!map.contains_key("raw_response"));
    }

    #[test]
    fn fallback_record_carries_diagnostics() {
        let fields = ExtractedFields::unparsed("bad reply", "not json");
        assert!(fields.is_fallback());
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["error"], json!("bad reply"));
        assert_eq!(value["raw_response"], json!("not json"));
    }

    #[test]
    fn document_content_serialises_untagged() {
        let text = DocumentContent::Text("BILL OF LADING".into());
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("BILL OF LADING"));

        let mut sheets = IndexMap::new();
        sheets.insert("Sheet1".to_string(), vec![vec!["a".to_string(), "b".to_string()]]);
        let value = serde_json::to_value(DocumentContent::Sheets(sheets)).unwrap();
        assert_eq!(value, json!({"Sheet1": [["a", "b"]]}));
    }

    #[test]
    fn envelope_wire_shape() {
        let mut raw = RawDocumentData::new();
        raw.insert("/tmp/a.pdf".into(), DocumentContent::Text("cargo".into()));
        let envelope = ResponseEnvelope {
            raw_document_data: raw,
            extracted_fields: ExtractedFields::default(),
            processed_files: vec!["/tmp/a.pdf".into(), "/tmp/c.txt".into()],
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["raw_document_data"]["/tmp/a.pdf"], json!("cargo"));
        assert_eq!(value["processed_files"], json!(["/tmp/a.pdf", "/tmp/c.txt"]));
        assert!(value["extracted_fields"].is_object());
    }
}
