//! The field-extraction prompt sent to the text-generation service.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — adding a field or tightening an
//!    instruction is an edit in exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt without
//!    spinning up a real provider, making prompt regressions easy to catch.
//!
//! Callers can override the instruction block via
//! [`crate::config::ExtractionConfig::instructions`]; the constant here is
//! used only when no override is provided.

use crate::error::ExtractError;
use crate::output::RawDocumentData;

/// Default instruction template for logistics-field extraction.
///
/// The literal `{document_data}` placeholder is replaced with the serialised
/// raw document content. The model is told twice not to wrap its reply in
/// fences; it sometimes does anyway, which is why
/// [`crate::pipeline::parse::parse_reply`] tolerates fenced output.
pub const DEFAULT_INSTRUCTIONS: &str = r#"Extract the following specific fields from the provided document data and return them in JSON format.

Required fields to extract:
- Bill of lading number
- Container Number
- Consignee Name
- Consignee Address
- Date of export
- Line Items Count
- Package Count
- Gross Weight
- Average Price

Document data:
{document_data}

IMPORTANT: Return ONLY the raw JSON object without any markdown formatting, code blocks, or additional text. Do not wrap the response in ```json or any other formatting. Keep values exactly as they appear in the documents, including unit suffixes. Use null for any fields that cannot be found or determined.

Return exactly this format (raw JSON only):
{
    "bill_of_lading_number": "value or null",
    "container_number": "value or null",
    "consignee_name": "value or null",
    "consignee_address": "value or null",
    "date_of_export": "value or null",
    "line_items_count": "value or null",
    "package_count": "value or null",
    "gross_weight": "value or null",
    "average_price": "value or null"
}"#;

/// Assemble the full extraction prompt for one batch of documents.
///
/// The raw document data is embedded verbatim as pretty-printed JSON so the
/// model sees sheet structure (nested arrays) and scanned text side by side.
pub fn field_extraction_prompt(
    document_data: &RawDocumentData,
    instructions: Option<&str>,
) -> Result<String, ExtractError> {
    let payload = serde_json::to_string_pretty(document_data)
        .map_err(|e| ExtractError::Internal(format!("failed to serialise document data: {e}")))?;
    let template = instructions.unwrap_or(DEFAULT_INSTRUCTIONS);
    Ok(template.replace("{document_data}", &payload))
}
