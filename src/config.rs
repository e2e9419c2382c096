//! Configuration for the resume-ingestion pipeline.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across calls, log it, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A twelve-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::ExtractError;
use crate::pipeline::llm::ChatClient;
use crate::pipeline::ocr::OcrEngine;
use crate::prompts::RESUME_TEXT_PLACEHOLDER;
use std::fmt;
use std::sync::Arc;

/// Configuration for text and information extraction.
///
/// Built via [`ExtractionConfig::builder()`] or
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use resume_extract::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .model("qwen2.5:3b")
///     .ocr_language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    // ── OCR ──────────────────────────────────────────────────────────────
    /// Tesseract executable name or path. Default: "tesseract".
    pub tesseract_path: String,

    /// OCR language code passed to tesseract's `-l` flag. Default: "eng".
    pub ocr_language: String,

    /// Time budget for one OCR subprocess call, in seconds. Default: 120.
    ///
    /// A wedged OCR binary would otherwise block the pipeline forever; the
    /// subprocess is killed when the budget runs out.
    pub ocr_timeout_secs: u64,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// A safety cap on rasterisation. Text stays sharp enough for reliable
    /// recognition while memory per page remains bounded regardless of the
    /// document's physical page size.
    pub max_rendered_pixels: u32,

    // ── Model ────────────────────────────────────────────────────────────
    /// Base URL of the Ollama server. Default: "http://localhost:11434".
    pub base_url: String,

    /// Model identifier. Default: "qwen2.5:3b".
    pub model: String,

    /// Sampling temperature. Default: 0.0.
    ///
    /// Zero means the model always picks the highest-probability
    /// continuation — the right setting for field extraction, where the
    /// answer is on the page and creativity only hurts.
    pub temperature: f32,

    /// Maximum tokens the model may generate per reply. Default: 1024.
    ///
    /// A long tech stack can push the JSON past 500 tokens; 1024 leaves
    /// headroom without letting a runaway reply burn unbounded time.
    pub max_reply_tokens: u32,

    /// Per-request timeout for the chat call, in seconds. Default: 120.
    pub request_timeout_secs: u64,

    /// Custom prompt template. If None, uses the built-in default.
    ///
    /// Must contain the `{resume_text}` placeholder.
    pub prompt_template: Option<String>,

    // ── Collaborators ────────────────────────────────────────────────────
    /// Pre-constructed OCR engine. Takes precedence over the tesseract
    /// settings above. Used by tests to substitute an in-process fake.
    pub ocr: Option<Arc<dyn OcrEngine>>,

    /// Pre-constructed chat client. Takes precedence over `base_url`.
    pub chat: Option<Arc<dyn ChatClient>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            ocr_timeout_secs: 120,
            max_rendered_pixels: 2000,
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:3b".to_string(),
            temperature: 0.0,
            max_reply_tokens: 1024,
            request_timeout_secs: 120,
            prompt_template: None,
            ocr: None,
            chat: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("tesseract_path", &self.tesseract_path)
            .field("ocr_language", &self.ocr_language)
            .field("ocr_timeout_secs", &self.ocr_timeout_secs)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_reply_tokens", &self.max_reply_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("prompt_template", &self.prompt_template.as_ref().map(|_| "<custom>"))
            .field("ocr", &self.ocr.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("chat", &self.chat.as_ref().map(|_| "<dyn ChatClient>"))
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
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn tesseract_path(mut self, path: impl Into<String>) -> Self {
        self.config.tesseract_path = path.into();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout_secs = secs.max(1);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_reply_tokens(mut self, n: u32) -> Self {
        self.config.max_reply_tokens = n.max(1);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn ocr(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr = Some(engine);
        self
    }

    pub fn chat(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.config.chat = Some(client);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(ExtractError::InvalidConfig("Model id must not be empty".into()));
        }
        if c.base_url.is_empty() {
            return Err(ExtractError::InvalidConfig("Base URL must not be empty".into()));
        }
        if let Some(ref template) = c.prompt_template {
            if !template.contains(RESUME_TEXT_PLACEHOLDER) {
                return Err(ExtractError::InvalidConfig(format!(
                    "Prompt template must contain the {RESUME_TEXT_PLACEHOLDER} placeholder"
                )));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_contract() {
        let c = ExtractionConfig::default();
        assert_eq!(c.model, "qwen2.5:3b");
        assert_eq!(c.base_url, "http://localhost:11434");
        assert_eq!(c.temperature, 0.0);
        assert_eq!(c.max_reply_tokens, 1024);
        assert_eq!(c.ocr_language, "eng");
    }

    #[test]
    fn temperature_is_clamped() {
        let c = ExtractionConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = ExtractionConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = ExtractionConfig::builder().model("").build().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = ExtractionConfig::builder()
            .prompt_template("extract the fields, please")
            .build()
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfig(_)));
    }

    #[test]
    fn template_with_placeholder_is_accepted() {
        let c = ExtractionConfig::builder()
            .prompt_template("Fields from: {resume_text}")
            .build()
            .unwrap();
        assert!(c.prompt_template.is_some());
    }

    #[test]
    fn debug_elides_collaborators() {
        let rendered = format!("{:?}", ExtractionConfig::default());
        assert!(rendered.contains("qwen2.5:3b"));
        assert!(!rendered.contains("OllamaClient"));
    }
}
