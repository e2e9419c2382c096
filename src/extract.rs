//! Top-level pipeline operations.
//!
//! Two independently invocable stages, chained by the operator:
//!
//! 1. [`extract_text`] / [`save_extracted_text`] — document → OCR text blob,
//!    optionally persisted next to the original. Every failure propagates.
//! 2. [`extract_resume_info`] and friends — text blob → [`ResumeRecord`].
//!    Failures never propagate; they degrade to a default record with an
//!    `error` marker so batch output keeps a uniform shape.
//!
//! Execution is sequential throughout: one page is recognised before the
//! next is encoded, and one file is fully processed before a batch moves on.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::llm::{self, ChatClient, CompletionOptions, OllamaClient};
use crate::pipeline::ocr::{OcrEngine, TesseractOcr};
use crate::pipeline::{input, render};
use crate::prompts;
use crate::record::{ResumeRecord, EXTRACTION_FAILED};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// ── Text extraction ──────────────────────────────────────────────────────

/// Extract raw text from a resume document.
///
/// A path with a `.pdf` extension is rasterised page by page and each page
/// image is recognised independently, in page order; any other path is
/// handed to the OCR engine directly as a single image. All recognised
/// lines are flattened into one newline-joined string — per-page and
/// per-region boundaries are discarded.
///
/// # Errors
/// * [`ExtractError::FileNotFound`] / [`ExtractError::PermissionDenied`] —
///   the document is missing or unreadable.
/// * [`ExtractError::ConversionFailed`] — rasterisation failed.
/// * [`ExtractError::RecognitionFailed`] / [`ExtractError::RecognitionTimeout`]
///   — the OCR engine failed.
pub async fn extract_text(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<String, ExtractError> {
    let path = path.as_ref();
    info!("Extracting text from {}", path.display());
    input::resolve_local(path)?;

    let engine = resolve_ocr(config);
    let mut lines: Vec<String> = Vec::new();

    if input::is_pdf(path) {
        let pages = render::render_pdf_pages(path, config.max_rendered_pixels).await?;

        // Page images only exist on disk for the duration of the OCR calls.
        let scratch = tempfile::Builder::new()
            .prefix("resume-extract-")
            .tempdir()
            .map_err(|e| ExtractError::Internal(format!("scratch dir: {e}")))?;

        for (idx, page) in pages.iter().enumerate() {
            let page_path = scratch.path().join(format!("page-{:03}.png", idx + 1));
            page.save(&page_path)
                .map_err(|e| ExtractError::ConversionFailed {
                    path: path.to_path_buf(),
                    detail: format!("PNG encode for page {} failed: {e}", idx + 1),
                })?;

            let page_lines = engine.recognize(&page_path).await?;
            debug!("Page {}: {} recognised lines", idx + 1, page_lines.len());
            lines.extend(page_lines);
        }
    } else {
        lines = engine.recognize(path).await?;
    }

    info!("Recognised {} lines total", lines.len());
    Ok(lines.join("\n"))
}

/// Persist extracted text next to the original document.
///
/// The output path is `extracted_<stem>.txt` in the original's directory;
/// an existing file of that name is overwritten without warning. Returns
/// the written path.
pub async fn save_extracted_text(
    text: &str,
    original_path: impl AsRef<Path>,
) -> Result<PathBuf, ExtractError> {
    let output = input::sibling_text_path(original_path.as_ref());

    tokio::fs::write(&output, text)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: output.clone(),
            source: e,
        })?;

    info!("Extracted text saved to {}", output.display());
    Ok(output)
}

// ── Information extraction ───────────────────────────────────────────────

/// Extract a structured record from resume plaintext.
///
/// Infallible by design: any model or parse failure is logged and converted
/// into the default record (all scalars null, empty tech stack, `error`
/// marker set). Callers receive a uniformly shaped result either way.
pub async fn extract_resume_info(
    resume_text: &str,
    config: &ExtractionConfig,
) -> ResumeRecord {
    match try_extract_resume_info(resume_text, config).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Extraction degraded to default record: {e}");
            ResumeRecord::failed(EXTRACTION_FAILED)
        }
    }
}

/// The fallible inner path of [`extract_resume_info`].
async fn try_extract_resume_info(
    resume_text: &str,
    config: &ExtractionConfig,
) -> Result<ResumeRecord, ExtractError> {
    let client = resolve_chat(config)?;

    let template = config
        .prompt_template
        .as_deref()
        .unwrap_or(prompts::EXTRACTION_PROMPT_TEMPLATE);
    let prompt = prompts::build_prompt(template, resume_text);

    let options = CompletionOptions {
        model: config.model.clone(),
        temperature: config.temperature,
        max_reply_tokens: config.max_reply_tokens,
    };

    let reply = client.complete(&prompt, &options).await?;

    let candidate =
        llm::extract_json_object(&reply).ok_or_else(|| ExtractError::ResponseParse {
            detail: "no '{'..'}' delimited object in reply".into(),
        })?;

    let value: serde_json::Value =
        serde_json::from_str(candidate).map_err(|e| ExtractError::ResponseParse {
            detail: e.to_string(),
        })?;

    Ok(ResumeRecord::from_model_value(&value))
}

/// Process a single resume plaintext file.
///
/// A read failure degrades to a default record carrying the I/O error, so
/// batch callers never have to special-case unreadable files.
pub async fn process_resume_file(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> ResumeRecord {
    let path = path.as_ref();
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            return ResumeRecord::failed(format!("Failed to read '{}': {e}", path.display()));
        }
    };

    extract_resume_info(&text, config).await
}

/// List the plaintext resumes in a directory, in file-name order.
///
/// Non-recursive; only `.txt` files are picked up. The sort makes batch
/// output deterministic across platforms.
pub async fn list_resume_texts(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExtractError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(ExtractError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ExtractError::Internal(format!("read_dir '{}': {e}", dir.display())))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ExtractError::Internal(format!("read_dir '{}': {e}", dir.display())))?
    {
        let path = entry.path();
        if path.is_file() && input::is_plaintext(&path) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Process every plaintext resume in a directory.
///
/// Files are processed independently, one at a time, in file-name order;
/// each record is tagged with its source file name. One file's failure
/// never aborts the batch — its record simply carries an `error` marker.
pub async fn process_directory(
    dir: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Vec<ResumeRecord>, ExtractError> {
    let paths = list_resume_texts(dir).await?;
    let mut records = Vec::with_capacity(paths.len());

    for path in paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Processing: {file_name}");

        let record = process_resume_file(&path, config).await;
        records.push(record.with_file_name(file_name));
    }

    Ok(records)
}

// ── Output ───────────────────────────────────────────────────────────────

/// Write one record as pretty-printed JSON.
pub async fn save_record(
    record: &ResumeRecord,
    path: impl AsRef<Path>,
) -> Result<(), ExtractError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| ExtractError::Internal(format!("serialise record: {e}")))?;
    write_atomic(path.as_ref(), &json).await
}

/// Write a record sequence as a pretty-printed JSON array.
pub async fn save_records(
    records: &[ResumeRecord],
    path: impl AsRef<Path>,
) -> Result<(), ExtractError> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| ExtractError::Internal(format!("serialise records: {e}")))?;
    write_atomic(path.as_ref(), &json).await
}

/// Atomic write: temp file + rename, so readers never see a partial file.
async fn write_atomic(path: &Path, contents: &str) -> Result<(), ExtractError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExtractError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Results saved to {}", path.display());
    Ok(())
}

// ── Collaborator resolution ──────────────────────────────────────────────

/// Use the pre-built OCR engine if one was supplied, else spawn tesseract.
fn resolve_ocr(config: &ExtractionConfig) -> Arc<dyn OcrEngine> {
    match config.ocr {
        Some(ref engine) => Arc::clone(engine),
        None => Arc::new(TesseractOcr::from_config(config)),
    }
}

/// Use the pre-built chat client if one was supplied, else talk to Ollama.
fn resolve_chat(config: &ExtractionConfig) -> Result<Arc<dyn ChatClient>, ExtractError> {
    match config.chat {
        Some(ref client) => Ok(Arc::clone(client)),
        None => Ok(Arc::new(OllamaClient::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?)),
    }
}
