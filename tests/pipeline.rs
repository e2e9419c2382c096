//! Integration tests for the two pipeline stages.
//!
//! No tesseract install, Ollama server, or pdfium library is required: the
//! OCR and chat collaborators are replaced with in-process fakes through the
//! config's pre-built-instance slots. What is under test is everything this
//! crate owns — routing, naming, prompt assembly, JSON recovery, projection,
//! batch ordering, and the degrade-to-default policy.

use async_trait::async_trait;
use resume_extract::{
    extract_resume_info, extract_text, process_directory, process_resume_file,
    save_extracted_text, save_records, ChatClient, CompletionOptions, ExtractError,
    ExtractionConfig, OcrEngine, ResumeRecord, EXTRACTION_FAILED,
};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

// ── Fake collaborators ───────────────────────────────────────────────────────

/// OCR engine that returns a fixed set of lines for any image.
struct FixedOcr {
    lines: Vec<String>,
}

impl FixedOcr {
    fn new(lines: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
        })
    }
}

#[async_trait]
impl OcrEngine for FixedOcr {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn recognize(&self, _image_path: &Path) -> Result<Vec<String>, ExtractError> {
        Ok(self.lines.clone())
    }
}

enum Reply {
    Text(String),
    Fail(String),
}

/// Chat client that pops scripted replies and records the prompts it saw.
struct ScriptedChat {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn with_reply(reply: &str) -> Arc<Self> {
        Self::new(vec![Reply::Text(reply.to_string())])
    }

    fn seen_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ExtractError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(detail)) => Err(ExtractError::ModelCall {
                model: options.model.clone(),
                detail,
            }),
            None => panic!("ScriptedChat ran out of replies"),
        }
    }
}

fn config_with(ocr: Arc<dyn OcrEngine>, chat: Arc<dyn ChatClient>) -> ExtractionConfig {
    ExtractionConfig::builder()
        .ocr(ocr)
        .chat(chat)
        .build()
        .expect("test config should build")
}

fn ocr_only_config(ocr: Arc<dyn OcrEngine>) -> ExtractionConfig {
    ExtractionConfig::builder()
        .ocr(ocr)
        .build()
        .expect("test config should build")
}

// ── Stage 1: text extraction ─────────────────────────────────────────────────

#[tokio::test]
async fn missing_input_fails_with_not_found_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let ghost = dir.path().join("ghost.pdf");

    let config = ocr_only_config(FixedOcr::new(&["should never be seen"]));
    let err = extract_text(&ghost, &config).await.unwrap_err();
    assert!(matches!(err, ExtractError::FileNotFound { .. }), "got: {err}");

    // No partial write of any kind.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[tokio::test]
async fn image_input_goes_straight_to_the_ocr_engine() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("scan.png");
    std::fs::write(&scan, b"not really a png").unwrap();

    let config = ocr_only_config(FixedOcr::new(&["Jane Doe", "jane@x.com", "Skills: Python"]));
    let text = extract_text(&scan, &config).await.unwrap();
    assert_eq!(text, "Jane Doe\njane@x.com\nSkills: Python");
}

#[tokio::test]
async fn empty_recognition_yields_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("blank.jpg");
    std::fs::write(&scan, b"blank").unwrap();

    let config = ocr_only_config(FixedOcr::new(&[]));
    let text = extract_text(&scan, &config).await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn saved_text_uses_sibling_naming_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("jane-doe.png");
    std::fs::write(&original, b"img").unwrap();

    let first = save_extracted_text("first pass", &original).await.unwrap();
    assert_eq!(first, dir.path().join("extracted_jane-doe.txt"));
    assert_eq!(std::fs::read_to_string(&first).unwrap(), "first pass");

    // Re-running overwrites the same deterministic path without warning.
    let second = save_extracted_text("second pass", &original).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "second pass");
}

// ── Stage 2: information extraction ──────────────────────────────────────────

#[tokio::test]
async fn prose_wrapped_reply_is_recovered() {
    let chat = ScriptedChat::with_reply(
        "Sure! Here is the extracted data:\n```json\n{\"full_name\": \"Jane Doe\", \
         \"email\": \"jane@x.com\", \"tech_stack\": [\"Python\", \"AWS\"], \
         \"confidence\": 0.9}\n```\nLet me know if you need anything else.",
    );
    let config = config_with(FixedOcr::new(&[]), chat);

    let record = extract_resume_info("resume text", &config).await;
    assert_eq!(record.full_name.as_deref(), Some("Jane Doe"));
    assert_eq!(record.email.as_deref(), Some("jane@x.com"));
    assert_eq!(record.tech_stack, vec!["Python", "AWS"]);
    assert_eq!(record.phone_number, None, "missing key must default to null");
    assert!(!record.is_failed());

    // The invented "confidence" key must not leak into the output.
    let serialised = serde_json::to_value(&record).unwrap();
    assert!(serialised.get("confidence").is_none());
}

#[tokio::test]
async fn unparseable_reply_degrades_to_default() {
    let chat = ScriptedChat::with_reply("I could not find any structured data, sorry.");
    let config = config_with(FixedOcr::new(&[]), chat);

    let record = extract_resume_info("resume text", &config).await;
    assert_eq!(record.error.as_deref(), Some(EXTRACTION_FAILED));
    assert_eq!(record.full_name, None);
    assert_eq!(record.phone_number, None);
    assert_eq!(record.email, None);
    assert_eq!(record.location, None);
    assert!(record.tech_stack.is_empty());
}

#[tokio::test]
async fn model_failure_degrades_to_default() {
    let chat = ScriptedChat::new(vec![Reply::Fail("connection refused".into())]);
    let config = config_with(FixedOcr::new(&[]), chat);

    let record = extract_resume_info("resume text", &config).await;
    assert_eq!(record.error.as_deref(), Some(EXTRACTION_FAILED));
}

#[tokio::test]
async fn worked_example_yields_the_record_unmodified() {
    let resume_text = "Jane Doe, jane@x.com, Skills: Python, AWS";
    let chat = ScriptedChat::with_reply(
        "{\"full_name\":\"Jane Doe\",\"phone_number\":null,\"email\":\"jane@x.com\",\
         \"location\":null,\"tech_stack\":[\"Python\",\"AWS\"]}",
    );
    let config = config_with(FixedOcr::new(&[]), chat.clone());

    let record = extract_resume_info(resume_text, &config).await;
    assert_eq!(
        record,
        ResumeRecord {
            full_name: Some("Jane Doe".into()),
            phone_number: None,
            email: Some("jane@x.com".into()),
            location: None,
            tech_stack: vec!["Python".into(), "AWS".into()],
            error: None,
            file_name: None,
        }
    );

    // The resume text must have been embedded into the prompt verbatim.
    let prompts = chat.seen_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(resume_text));
    assert!(prompts[0].contains("tech_stack"));
}

#[tokio::test]
async fn unreadable_file_degrades_with_read_error() {
    let config = config_with(
        FixedOcr::new(&[]),
        ScriptedChat::new(vec![]), // must never be called
    );
    let record = process_resume_file("/definitely/not/a/real/resume.txt", &config).await;
    assert!(record.is_failed());
    assert!(
        record.error.as_deref().unwrap().contains("Failed to read"),
        "got: {:?}",
        record.error
    );
}

// ── Batch mode ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_produces_one_record_per_file_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    // Created out of order on purpose; processing must sort by file name.
    std::fs::write(dir.path().join("b.txt"), "Bob's resume").unwrap();
    std::fs::write(dir.path().join("a.txt"), "Alice's resume").unwrap();
    std::fs::write(dir.path().join("c.txt"), "Carol's resume").unwrap();
    std::fs::write(dir.path().join("notes.md"), "not a resume").unwrap();

    let chat = ScriptedChat::new(vec![
        Reply::Text("{\"full_name\": \"Alice\"}".into()),
        Reply::Fail("model went away".into()),
        Reply::Text("{\"full_name\": \"Carol\"}".into()),
    ]);
    let config = config_with(FixedOcr::new(&[]), chat);

    let records = process_directory(dir.path(), &config).await.unwrap();
    assert_eq!(records.len(), 3, "exactly one record per .txt file");

    assert_eq!(records[0].file_name.as_deref(), Some("a.txt"));
    assert_eq!(records[0].full_name.as_deref(), Some("Alice"));
    assert!(!records[0].is_failed());

    // The middle file failed; the batch carried on regardless.
    assert_eq!(records[1].file_name.as_deref(), Some("b.txt"));
    assert!(records[1].is_failed());

    assert_eq!(records[2].file_name.as_deref(), Some("c.txt"));
    assert_eq!(records[2].full_name.as_deref(), Some("Carol"));
}

#[tokio::test]
async fn missing_batch_directory_is_an_error() {
    let config = config_with(FixedOcr::new(&[]), ScriptedChat::new(vec![]));
    let err = process_directory("/definitely/not/a/dir", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::FileNotFound { .. }));
}

#[tokio::test]
async fn saved_records_roundtrip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("records.json");

    let records = vec![
        ResumeRecord {
            full_name: Some("Jane Doe".into()),
            email: Some("jane@x.com".into()),
            tech_stack: vec!["Rust".into(), "Python".into(), "AWS".into()],
            file_name: Some("jane.txt".into()),
            ..ResumeRecord::default()
        },
        ResumeRecord::failed(EXTRACTION_FAILED).with_file_name("bob.txt"),
    ];

    save_records(&records, &out).await.unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let back: Vec<ResumeRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, records);

    // Pretty-printed with 2-space indent, and no stray temp file left behind.
    assert!(text.starts_with("[\n  {"), "unexpected formatting: {text:.20}");
    assert!(!dir.path().join("records.json.tmp").exists());
}
