//! # resume-extract
//!
//! Extract structured candidate data from resume documents using OCR and a
//! locally hosted language model.
//!
//! ## Why this crate?
//!
//! Resume PDFs are frequently scans or export artefacts with no usable text
//! layer, and the interesting fields (name, contact details, tech stack)
//! are scattered across free-form prose. This crate rasterises each page,
//! lets an OCR engine read it, and then asks a local chat model to project
//! the text onto a fixed five-key record — no cloud API, no per-document
//! cost.
//!
//! ## Pipeline Overview
//!
//! ```text
//! resume.pdf / scan.png
//!  │
//!  ├─ 1. Input    validate path, classify PDF vs image
//!  ├─ 2. Render   rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. OCR      recognise text lines per page (tesseract subprocess)
//!  │                └─▶ extracted_<stem>.txt
//!  └─ 4. Model    one deterministic chat call → 5-key JSON record
//!                   └─▶ ResumeRecord
//! ```
//!
//! The two stages are independently invocable: text extraction writes a
//! sibling `.txt` file, and information extraction consumes any plaintext —
//! typically that file, or a whole directory of them in batch mode.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_extract::{extract_resume_info, extract_text, save_extracted_text, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!
//!     // Stage 1: document → text
//!     let text = extract_text("resume.pdf", &config).await?;
//!     let saved = save_extracted_text(&text, "resume.pdf").await?;
//!     eprintln!("text saved to {}", saved.display());
//!
//!     // Stage 2: text → record (never fails; check record.error)
//!     let record = extract_resume_info(&text, &config).await;
//!     println!("{}", serde_json::to_string_pretty(&record)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resumex` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! resume-extract = { version = "0.2", default-features = false }
//! ```
//!
//! ## Error model
//!
//! Text extraction returns `Result` — a missing document or broken OCR
//! install must be fixed by the operator. Information extraction returns a
//! plain [`ResumeRecord`] whose `error` field marks degraded results, so a
//! batch keeps one output shape no matter how many documents failed.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::{
    extract_resume_info, extract_text, list_resume_texts, process_directory,
    process_resume_file, save_extracted_text, save_record, save_records,
};
pub use pipeline::llm::{ChatClient, CompletionOptions, OllamaClient};
pub use pipeline::ocr::{OcrEngine, TesseractOcr};
pub use record::{ResumeRecord, EXTRACTION_FAILED};
