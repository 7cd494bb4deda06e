//! Configuration for the document-to-fields pipeline.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across requests (it is `Clone`, and the two
//! injected handles are `Arc`s) and to diff two runs to understand why their
//! outputs differ.
//!
//! # Design choice: injected handles over globals
//! The LLM provider and OCR engine are explicit fields rather than
//! module-level singletons, so tests and embedders can substitute their own
//! without touching process state.

use crate::error::ExtractError;
use crate::pipeline::ocr::{OcrEngine, TesseractOcr};
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Model used when a provider is named but no model is given.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Configuration for one extraction pipeline instance.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use shipdoc_extract::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .ocr_lang("eng")
///     .api_timeout_secs(90)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// A safety cap on rasterisation: an A0-sized page at full resolution
    /// could produce a five-figure-pixel bitmap and exhaust memory. Either
    /// dimension is capped, the other scales proportionally.
    pub max_render_pixels: u32,

    /// Language hint passed to the OCR engine. Default: "eng".
    pub ocr_lang: String,

    /// Pre-constructed OCR engine. Takes precedence over `ocr_lang`-driven
    /// default construction.
    pub ocr: Option<Arc<dyn OcrEngine>>,

    /// LLM model identifier, e.g. "gpt-4.1-nano", "claude-sonnet-4-20250514".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, auto-detects from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for the completion. Default: 0.1.
    ///
    /// Near-zero keeps the model faithful to what the documents actually
    /// say — field extraction wants transcription, not creativity.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 500.
    ///
    /// The reply is one small JSON object; 500 tokens covers it with room
    /// for long consignee addresses.
    pub max_tokens: usize,

    /// Deadline for the model call in seconds. Default: 60.
    ///
    /// The model call is the only unbounded-latency operation in the
    /// pipeline; without a deadline a hung provider blocks the whole
    /// request indefinitely.
    pub api_timeout_secs: u64,

    /// Custom instruction template for the extraction prompt. If None, uses
    /// the built-in default.
    pub instructions: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_render_pixels: 2000,
            ocr_lang: "eng".to_string(),
            ocr: None,
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 500,
            api_timeout_secs: 60,
            instructions: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("max_render_pixels", &self.max_render_pixels)
            .field("ocr_lang", &self.ocr_lang)
            .field("ocr", &self.ocr.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The OCR engine to use: the injected one, or a tesseract engine for
    /// the configured language.
    pub fn ocr_engine(&self) -> Arc<dyn OcrEngine> {
        match &self.ocr {
            Some(engine) => Arc::clone(engine),
            None => Arc::new(TesseractOcr::new(&self.ocr_lang)),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn max_render_pixels(mut self, px: u32) -> Self {
        self.config.max_render_pixels = px.max(100);
        self
    }

    pub fn ocr_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_lang = lang.into();
        self
    }

    pub fn ocr(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr = Some(engine);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn instructions(mut self, template: impl Into<String>) -> Self {
        self.config.instructions = Some(template.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(ExtractError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.ocr_lang.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "ocr_lang must be a non-empty language code".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
