//! Error types for the resume-extract library.
//!
//! The two pipeline stages have opposite propagation policies:
//!
//! * **Text extraction** surfaces every failure to its caller as an
//!   `Err(ExtractError)` — a missing document, a corrupt PDF, or a broken
//!   OCR install is something the operator must fix before re-running.
//!
//! * **Information extraction** never returns an error. Model and parse
//!   failures are logged and degrade to a well-formed default
//!   [`crate::record::ResumeRecord`] carrying an `error` marker, so a batch
//!   over a directory of resumes keeps a uniform output shape no matter how
//!   many individual documents fail.
//!
//! The variants below are the shared vocabulary for both policies; the
//! degrading side catches them internally rather than using a second type.

use std::path::PathBuf;
use thiserror::Error;

/// All errors surfaced by the resume-extract library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Resume file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Rasterisation errors ──────────────────────────────────────────────
    /// pdfium could not open the document or render a page.
    #[error("Failed to rasterise '{path}': {detail}")]
    ConversionFailed { path: PathBuf, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine failed to recognise an image.
    #[error("Text recognition failed: {detail}")]
    RecognitionFailed { detail: String },

    /// The OCR subprocess exceeded its time budget and was killed.
    #[error("OCR timed out after {secs}s on '{path}'\nIncrease --ocr-timeout, or check the tesseract install.")]
    RecognitionTimeout { path: PathBuf, secs: u64 },

    // ── Model errors ──────────────────────────────────────────────────────
    /// The chat service could not be reached or returned a non-success status.
    #[error("Model call to '{model}' failed: {detail}\nIs the Ollama server running at the configured URL?")]
    ModelCall { model: String, detail: String },

    /// The model reply contained no parseable JSON object.
    #[error("Model reply contained no parseable JSON object: {detail}")]
    ResponseParse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display_names_path() {
        let e = ExtractError::FileNotFound {
            path: PathBuf::from("/resumes/jane.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/resumes/jane.pdf"), "got: {msg}");
    }

    #[test]
    fn model_call_display_names_model() {
        let e = ExtractError::ModelCall {
            model: "qwen2.5:3b".into(),
            detail: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("qwen2.5:3b"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn recognition_timeout_display() {
        let e = ExtractError::RecognitionTimeout {
            path: PathBuf::from("scan.png"),
            secs: 120,
        };
        assert!(e.to_string().contains("120s"));
    }

    #[test]
    fn output_write_failed_carries_source() {
        use std::error::Error as _;
        let e = ExtractError::OutputWriteFailed {
            path: PathBuf::from("out.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(e.source().is_some());
    }
}
