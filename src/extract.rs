//! Top-level entry points: route documents to extractors, run the model
//! call, assemble the response envelope.
//!
//! Everything here is strictly sequential. The prompt embeds the raw
//! content of *all* documents, so no model call can start before the last
//! file is read, and the extractors themselves process files and pages one
//! at a time — the first fatal error aborts the batch with no partial
//! envelope.

use crate::config::{ExtractionConfig, DEFAULT_MODEL};
use crate::error::ExtractError;
use crate::output::{DocumentContent, RawDocumentData, ResponseEnvelope};
use crate::pipeline::router::DocumentKind;
use crate::pipeline::{llm, ocr, spreadsheet};
use crate::units;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Read every recognised document into raw content, keyed by path.
///
/// Files are processed one at a time in input order. Paths with an
/// unrecognised extension are skipped without an entry — long-standing
/// caller-visible leniency; see DESIGN.md. A failure on any file aborts
/// the rest of the batch.
pub async fn process_documents(
    file_paths: &[String],
    config: &ExtractionConfig,
) -> Result<RawDocumentData, ExtractError> {
    let mut extracted = RawDocumentData::new();

    for path_str in file_paths {
        let path = Path::new(path_str);
        match DocumentKind::from_path(path) {
            DocumentKind::Spreadsheet => {
                let sheets = spreadsheet::extract_sheets(path).await?;
                extracted.insert(path_str.clone(), DocumentContent::Sheets(sheets));
            }
            DocumentKind::Scanned => {
                let text = ocr::extract_text(path, config.ocr_engine(), config).await?;
                extracted.insert(path_str.clone(), DocumentContent::Text(text));
            }
            DocumentKind::Unrecognized => {
                debug!("skipping '{path_str}': unrecognised file extension");
            }
        }
    }

    Ok(extracted)
}

/// Process a batch of documents and extract the structured logistics record.
///
/// This is the primary entry point for the library: router → prompt engine
/// → derived-field computation, wrapped into one [`ResponseEnvelope`].
///
/// # Errors
/// Any input error (missing/corrupt file), provider-resolution failure,
/// model transport error, or timeout fails the whole request. A malformed
/// model reply does *not* — it yields the fallback record inside an
/// otherwise successful envelope.
pub async fn process_and_extract(
    file_paths: &[String],
    config: &ExtractionConfig,
) -> Result<ResponseEnvelope, ExtractError> {
    info!("processing batch of {} file(s)", file_paths.len());

    // Resolve the provider before touching any file so a misconfigured
    // environment fails fast instead of after minutes of OCR.
    let provider = resolve_provider(config)?;

    let raw_document_data = process_documents(file_paths, config).await?;
    let mut extracted_fields = llm::request_fields(&provider, &raw_document_data, config).await?;
    units::apply_derived_fields(&mut extracted_fields);

    info!(
        "batch complete: {} document(s) extracted, fallback={}",
        raw_document_data.len(),
        extracted_fields.is_fallback()
    );

    Ok(ResponseEnvelope {
        raw_document_data,
        extracted_fields,
        processed_files: file_paths.to_vec(),
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — constructed by the
///    caller; used as-is. This is the substitution point for tests and for
///    embedders that need custom middleware.
///
/// 2. **Named provider + model** (`config.provider_name`) — the factory
///    reads the corresponding API key (`OPENAI_API_KEY`, etc.) from the
///    environment.
///
/// 3. **Environment pair** (`SHIPDOC_LLM_PROVIDER` + `SHIPDOC_MODEL`) —
///    both set means the deployment chose at the environment level;
///    honoured before full auto-detection so the model choice wins even
///    when several API keys are present.
///
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — scans known
///    API-key variables and picks the first available provider.
fn resolve_provider(config: &ExtractionConfig) -> Result<Arc<dyn LLMProvider>, ExtractError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("SHIPDOC_LLM_PROVIDER"),
        std::env::var("SHIPDOC_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ExtractError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from the environment.\n\
                 Set OPENAI_API_KEY or ANTHROPIC_API_KEY, or name a provider explicitly.\n\
                 Error: {e}"
            ),
        })?;

    Ok(provider)
}

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, ExtractError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ExtractError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
