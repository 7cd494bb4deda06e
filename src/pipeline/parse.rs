//! Tolerant parsing of the model reply into the fixed-shape field record.
//!
//! Models are told to return a raw JSON object and occasionally disobey,
//! wrapping the object in a fenced block anyway. Rather than nested
//! prefix/suffix conditionals, [`parse_reply`] runs three ordered attempts —
//! json-labelled fence, generic fence, raw text — and takes the first that
//! yields a JSON object. When none does, the caller still gets the full
//! declared field set (all null) plus `error` and `raw_response`
//! diagnostics, so a misbehaving model can never change the response shape.

use crate::output::ExtractedFields;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::debug;

/// Diagnostic message carried by the fallback record.
pub const PARSE_ERROR_MESSAGE: &str = "Failed to parse LLM response as JSON";

static RE_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```json\s*(.*?)\s*```\s*$").unwrap());

/// A generic fence: strip the first line (```` ```lang ````) and the last.
static RE_ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[^\n]*\n(.*)\n```\s*$").unwrap());

/// Parse a model reply into an [`ExtractedFields`] record.
///
/// Never fails: an unparsable reply produces the fallback record instead.
pub fn parse_reply(reply: &str) -> ExtractedFields {
    let trimmed = reply.trim();

    for candidate in candidates(trimmed) {
        if let Some(fields) = try_parse_object(&candidate) {
            return fields;
        }
    }

    debug!("model reply was not parsable as JSON ({} bytes)", trimmed.len());
    ExtractedFields::unparsed(PARSE_ERROR_MESSAGE, trimmed)
}

/// The ordered parse attempts for a reply.
fn candidates(trimmed: &str) -> Vec<Cow<'_, str>> {
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(3);
    if let Some(caps) = RE_JSON_FENCE.captures(trimmed) {
        out.push(Cow::Owned(caps[1].trim().to_string()));
    }
    if let Some(caps) = RE_ANY_FENCE.captures(trimmed) {
        out.push(Cow::Owned(caps[1].trim().to_string()));
    }
    out.push(Cow::Borrowed(trimmed));
    out
}

/// Parse one candidate as a JSON object and lift the declared fields out.
///
/// Anything that is valid JSON but not an object (a bare string, an array)
/// is rejected so the fallback path can report it instead.
fn try_parse_object(candidate: &str) -> Option<ExtractedFields> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let map = value.as_object()?;

    Some(ExtractedFields {
        bill_of_lading_number: scalar(map, "bill_of_lading_number"),
        container_number: scalar(map, "container_number"),
        consignee_name: scalar(map, "consignee_name"),
        consignee_address: scalar(map, "consignee_address"),
        date_of_export: scalar(map, "date_of_export"),
        line_items_count: scalar(map, "line_items_count"),
        package_count: scalar(map, "package_count"),
        gross_weight: scalar(map, "gross_weight"),
        average_gross_weight: scalar(map, "average_gross_weight"),
        average_price: scalar(map, "average_price"),
        error: None,
        raw_response: None,
    })
}

/// Read one declared field, coercing scalars to text.
///
/// Models asked for `"value or null"` still sometimes emit bare numbers
/// (`"line_items_count": 5`); rendering them to text preserves the value
/// instead of failing the whole parse.
fn scalar(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    }
}
