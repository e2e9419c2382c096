//! CLI binary for resume-extract.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use resume_extract::{
    extract_text, list_resume_texts, process_resume_file, save_extracted_text, save_record,
    save_records, ExtractionConfig, ResumeRecord,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Stage 1: OCR a resume (writes extracted_resume.txt next to the input)
  resumex text resume.pdf

  # Stage 1 with an explicit output path
  resumex text scan.png -o resume.txt

  # Stage 2: structured record from the extracted text (stdout)
  resumex info extracted_resume.txt

  # Stage 2 to a file
  resumex info extracted_resume.txt -o resume.json

  # Batch: every .txt in a directory, one record per file
  resumex batch ./resumes -o records.json

  # A different local model
  resumex info resume.txt --model llama3.2:3b

SETUP:
  1. Install tesseract:   apt install tesseract-ocr   (or brew install tesseract)
  2. Start Ollama:        ollama serve && ollama pull qwen2.5:3b
  3. Run:                 resumex text resume.pdf && resumex info extracted_resume.txt

ENVIRONMENT VARIABLES:
  RESUMEX_MODEL            Model id (default: qwen2.5:3b)
  RESUMEX_BASE_URL         Ollama base URL (default: http://localhost:11434)
  RESUMEX_TESSERACT        Tesseract executable (default: tesseract)
  RESUMEX_OCR_LANG         OCR language code (default: eng)
  PDFIUM_LIB_PATH          Path to an existing libpdfium
"#;

/// Extract text and structured records from resume documents.
#[derive(Parser, Debug)]
#[command(
    name = "resumex",
    version,
    about = "Extract structured candidate data from resume PDFs and images",
    long_about = "Two-stage resume ingestion: OCR a PDF or image into plaintext, then ask a \
locally hosted chat model (Ollama) to project the text onto a fixed record \
(full name, phone, email, location, tech stack).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Model id served by Ollama.
    #[arg(long, global = true, env = "RESUMEX_MODEL", default_value = "qwen2.5:3b")]
    model: String,

    /// Base URL of the Ollama server.
    #[arg(
        long,
        global = true,
        env = "RESUMEX_BASE_URL",
        default_value = "http://localhost:11434"
    )]
    base_url: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, global = true, env = "RESUMEX_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Max model reply tokens.
    #[arg(
        long,
        global = true,
        env = "RESUMEX_MAX_REPLY_TOKENS",
        default_value_t = 1024
    )]
    max_reply_tokens: u32,

    /// Per-request model timeout in seconds.
    #[arg(
        long,
        global = true,
        env = "RESUMEX_REQUEST_TIMEOUT",
        default_value_t = 120
    )]
    request_timeout: u64,

    /// Tesseract executable name or path.
    #[arg(long, global = true, env = "RESUMEX_TESSERACT", default_value = "tesseract")]
    tesseract: String,

    /// OCR language code (tesseract -l).
    #[arg(long, global = true, env = "RESUMEX_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// OCR subprocess timeout in seconds.
    #[arg(long, global = true, env = "RESUMEX_OCR_TIMEOUT", default_value_t = 120)]
    ocr_timeout: u64,

    /// Path to a text file containing a custom prompt template
    /// (must contain the {resume_text} placeholder).
    #[arg(long, global = true, env = "RESUMEX_PROMPT")]
    prompt: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "RESUMEX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "RESUMEX_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract raw text from a resume PDF or image via OCR.
    Text {
        /// Resume document (PDF or image).
        input: PathBuf,

        /// Write the text here instead of the extracted_<stem>.txt sibling.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract a structured record from resume plaintext.
    Info {
        /// Resume plaintext file (typically the output of `resumex text`).
        input: PathBuf,

        /// Write the record here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Process every .txt resume in a directory into one JSON array.
    Batch {
        /// Directory containing resume .txt files.
        dir: PathBuf,

        /// Output JSON file.
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The batch progress bar provides all the feedback that matters, so
    // INFO-level library logs are suppressed while it is active.
    let show_progress = matches!(cli.command, Command::Batch { .. }) && !cli.quiet;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;

    match cli.command {
        Command::Text { ref input, ref output } => run_text(input, output.as_deref(), &config, cli.quiet).await,
        Command::Info { ref input, ref output } => run_info(input, output.as_deref(), &config, cli.quiet).await,
        Command::Batch { ref dir, ref output } => {
            run_batch(dir, output, &config, cli.quiet, show_progress).await
        }
    }
}

async fn run_text(
    input: &std::path::Path,
    output: Option<&std::path::Path>,
    config: &ExtractionConfig,
    quiet: bool,
) -> Result<()> {
    let text = extract_text(input, config)
        .await
        .context("Text extraction failed")?;

    let written = match output {
        Some(path) => {
            tokio::fs::write(path, &text)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path.to_path_buf()
        }
        None => save_extracted_text(&text, input)
            .await
            .context("Failed to save extracted text")?,
    };

    if !quiet {
        eprintln!(
            "{} {}  {}",
            green("✔"),
            bold(&written.display().to_string()),
            dim(&format!("{} chars", text.len())),
        );
    }
    Ok(())
}

async fn run_info(
    input: &std::path::Path,
    output: Option<&std::path::Path>,
    config: &ExtractionConfig,
    quiet: bool,
) -> Result<()> {
    let record = process_resume_file(input, config).await;

    if let Some(path) = output {
        save_record(&record, path)
            .await
            .context("Failed to write record")?;
        if !quiet {
            eprintln!(
                "{} {}",
                status_mark(&record),
                bold(&path.display().to_string())
            );
        }
    } else {
        let json = serde_json::to_string_pretty(&record).context("Failed to serialise record")?;
        println!("{json}");
    }

    if record.is_failed() && !quiet {
        eprintln!(
            "{} extraction degraded — see the record's error field",
            cyan("⚠")
        );
    }
    Ok(())
}

async fn run_batch(
    dir: &std::path::Path,
    output: &std::path::Path,
    config: &ExtractionConfig,
    quiet: bool,
    show_progress: bool,
) -> Result<()> {
    let paths = list_resume_texts(dir)
        .await
        .with_context(|| format!("Failed to list resumes in {}", dir.display()))?;

    if paths.is_empty() {
        anyhow::bail!("No .txt resumes found in {}", dir.display());
    }

    let bar = if show_progress {
        let bar = ProgressBar::new(paths.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} resumes  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let mut records: Vec<ResumeRecord> = Vec::with_capacity(paths.len());
    let mut failed = 0usize;

    for path in &paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(ref bar) = bar {
            bar.set_message(file_name.clone());
        }

        let record = process_resume_file(path, config).await;

        if let Some(ref bar) = bar {
            if record.is_failed() {
                bar.println(format!("  {} {}", red("✗"), file_name));
            } else {
                bar.println(format!("  {} {}", green("✓"), file_name));
            }
            bar.inc(1);
        }
        if record.is_failed() {
            failed += 1;
        }

        records.push(record.with_file_name(file_name));
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    save_records(&records, output)
        .await
        .context("Failed to write batch output")?;

    if !quiet {
        let total = records.len();
        eprintln!(
            "{} {}/{} resumes extracted  →  {}",
            if failed == 0 { green("✔") } else { cyan("⚠") },
            bold(&(total - failed).to_string()),
            total,
            bold(&output.display().to_string()),
        );
        if failed > 0 {
            eprintln!("   {} records carry an error marker", red(&failed.to_string()));
        }
    }

    Ok(())
}

fn status_mark(record: &ResumeRecord) -> String {
    if record.is_failed() {
        cyan("⚠")
    } else {
        green("✔")
    }
}

/// Map CLI args to `ExtractionConfig`.
async fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .model(&cli.model)
        .base_url(&cli.base_url)
        .temperature(cli.temperature)
        .max_reply_tokens(cli.max_reply_tokens)
        .request_timeout_secs(cli.request_timeout)
        .tesseract_path(&cli.tesseract)
        .ocr_language(&cli.ocr_lang)
        .ocr_timeout_secs(cli.ocr_timeout);

    if let Some(ref path) = cli.prompt {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read prompt template from {:?}", path))?;
        builder = builder.prompt_template(template);
    }

    builder.build().context("Invalid configuration")
}
