//! Pipeline stages for resume ingestion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different OCR backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ ocr ──▶ llm
//! (path)   (pdfium)   (lines)  (record JSON)
//! ```
//!
//! 1. [`input`]  — validate the document path and classify PDF vs image
//! 2. [`render`] — rasterise PDF pages; runs in `spawn_blocking` because
//!    pdfium is not async-safe
//! 3. [`ocr`]    — recognise text lines per page image via the OCR engine
//! 4. [`llm`]    — drive the chat-model call and recover the JSON object
//!    from its reply; the only stage with network I/O

pub mod input;
pub mod llm;
pub mod ocr;
pub mod render;
