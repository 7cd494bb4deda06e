//! HTTP boundary for shipdoc-extract.
//!
//! A thin shim over the library crate: accept a multipart upload, stage the
//! files in a scratch directory, run the pipeline, return the JSON
//! envelope. Staged files live inside a `TempDir` owned by the request
//! handler, so they are deleted when the handler returns — success, error,
//! or panic-unwind alike.

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use shipdoc_extract::{process_and_extract, ExtractError, ExtractionConfig, TesseractOcr};
use std::io;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Extract structured logistics fields from uploaded shipping documents.
#[derive(Parser, Debug)]
#[command(
    name = "shipdoc-server",
    version,
    about = "HTTP service extracting logistics fields from shipping documents",
    long_about = "Accepts PDF and XLSX uploads on POST /process-documents and returns the raw \
document content plus a structured logistics field record (bill of lading number, container \
number, consignee, weights, pricing) extracted by a language model."
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "SHIPDOC_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "SHIPDOC_PORT", default_value_t = 8080)]
    port: u16,

    /// LLM model ID (e.g. gpt-4.1-nano, claude-sonnet-4-20250514).
    #[arg(long, env = "SHIPDOC_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    /// Auto-detected from API-key env vars if not set.
    #[arg(long, env = "SHIPDOC_PROVIDER")]
    provider: Option<String>,

    /// OCR language code passed to tesseract.
    #[arg(long, env = "SHIPDOC_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// Deadline for the model call in seconds.
    #[arg(long, env = "SHIPDOC_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Maximum accepted upload body size in megabytes.
    #[arg(long, env = "SHIPDOC_MAX_UPLOAD_MB", default_value_t = 50)]
    max_upload_mb: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SHIPDOC_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (development); real deployments set env directly.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if !TesseractOcr::available() {
        tracing::warn!(
            "`tesseract` was not found on PATH; scanned documents will yield empty text"
        );
    }

    let mut config = ExtractionConfig::builder()
        .ocr_lang(&cli.ocr_lang)
        .api_timeout_secs(cli.api_timeout)
        .build()
        .context("Invalid configuration")?;
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();

    let app = Router::new()
        .route("/health", get(health))
        .route("/process-documents", post(process_documents_endpoint))
        .layer(DefaultBodyLimit::max(cli.max_upload_mb * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(config));

    let addr = format!("{}:{}", cli.host, cli.port);
    tracing::info!("shipdoc-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

/// `POST /process-documents` — multipart upload in, envelope out.
async fn process_documents_endpoint(
    State(config): State<Arc<ExtractionConfig>>,
    mut multipart: Multipart,
) -> Response {
    // All staged uploads live under this directory; dropping it at the end
    // of the handler removes them on every exit path.
    let staging = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("failed to create staging directory: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to stage uploads".to_string(),
            )
                .into_response();
        }
    };

    let mut file_paths: Vec<String> = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("malformed multipart body: {e}"),
                )
                    .into_response();
            }
        };

        // Keep the original filename (sanitised) so the extension-based
        // router sees the same suffix the client sent.
        let original_name = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_else(|| format!("upload-{}", file_paths.len()));

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("failed to read upload '{original_name}': {e}"),
                )
                    .into_response();
            }
        };

        let dest = staging.path().join(format!("{:02}-{original_name}", file_paths.len()));
        if let Err(e) = tokio::fs::write(&dest, &bytes).await {
            tracing::error!("failed to stage '{original_name}': {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to stage uploads".to_string(),
            )
                .into_response();
        }
        file_paths.push(dest.to_string_lossy().into_owned());
    }

    if file_paths.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "no files in upload".to_string(),
        )
            .into_response();
    }

    match process_and_extract(&file_paths, &config).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => {
            tracing::error!("pipeline failed: {e}");
            (status_for(&e), e.to_string()).into_response()
        }
    }
    // `staging` dropped here: uploaded temp files are always removed.
}

/// Strip path separators and control characters from a client filename.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map pipeline errors to HTTP statuses: bad input is the client's problem,
/// a slow model is the gateway's, everything else is ours.
fn status_for(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::FileNotFound { .. }
        | ExtractError::PermissionDenied { .. }
        | ExtractError::NotAPdf { .. }
        | ExtractError::CorruptPdf { .. }
        | ExtractError::WorkbookRead { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ExtractError::ApiTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_extension_and_drops_separators() {
        assert_eq!(sanitize_filename("manifest.xlsx"), "manifest.xlsx");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd"); // no traversal
        assert_eq!(sanitize_filename("bol scan.pdf"), "bol scan.pdf");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn input_errors_map_to_unprocessable() {
        let err = ExtractError::FileNotFound {
            path: "/tmp/x.pdf".into(),
        };
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(&ExtractError::ApiTimeout { secs: 60 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&ExtractError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
