//! Model interaction: build the extraction prompt and drive the provider.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] and all reply handling in
//! [`crate::pipeline::parse`], so either can change without touching the
//! call plumbing here.
//!
//! One call, no retries: extraction is a single-shot request and a failed
//! or rate-limited call fails the whole batch. The call *is* bounded by a
//! deadline — a hung provider must not block the request forever.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{ExtractedFields, RawDocumentData};
use crate::pipeline::parse;
use crate::prompts;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Ask the model for the structured field record.
///
/// # Errors
/// [`ExtractError::Llm`] on any provider failure (transport, quota, auth)
/// and [`ExtractError::ApiTimeout`] when the configured deadline elapses.
/// A *malformed reply* is not an error — it comes back as the fallback
/// record from [`parse::parse_reply`].
pub async fn request_fields(
    provider: &Arc<dyn LLMProvider>,
    document_data: &RawDocumentData,
    config: &ExtractionConfig,
) -> Result<ExtractedFields, ExtractError> {
    let prompt = prompts::field_extraction_prompt(document_data, config.instructions.as_deref())?;
    let messages = vec![ChatMessage::user(prompt)];
    let options = build_options(config);

    let start = Instant::now();
    let response = timeout(
        Duration::from_secs(config.api_timeout_secs),
        provider.chat(&messages, Some(&options)),
    )
    .await
    .map_err(|_| ExtractError::ApiTimeout {
        secs: config.api_timeout_secs,
    })?
    .map_err(|e| ExtractError::Llm {
        message: format!("{e}"),
    })?;

    debug!(
        "field extraction: {} input tokens, {} output tokens, {:?}",
        response.prompt_tokens,
        response.completion_tokens,
        start.elapsed()
    );

    Ok(parse::parse_reply(&response.content))
}

/// Build `CompletionOptions` from the extraction config.
fn build_options(config: &ExtractionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
