//! Text recognition: a raster image in, recognised lines out.
//!
//! The OCR engine is a collaborator, not part of this crate's logic, so it
//! sits behind the [`OcrEngine`] trait. The shipped implementation drives
//! the Tesseract CLI as a subprocess — no C library linkage, no model files
//! to manage, and the binary is available from every package manager. Tests
//! substitute an in-process fake through the same seam.
//!
//! The engine returns the recognised lines in the engine's own reading
//! order; this crate does not reinterpret layout, bounding boxes, or
//! confidence scores.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// A text-recognition backend.
///
/// `recognize` consumes an image file on disk and returns one string per
/// detected text region, in the backend's reading order. An image with no
/// detectable text yields an empty vector, not an error.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine identifier used in logs (e.g. "tesseract").
    fn name(&self) -> &'static str;

    /// Recognise all text regions in the image at `image_path`.
    async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// OCR via the Tesseract command-line binary.
///
/// Invokes `tesseract <image> stdout -l <lang>` and splits its stdout into
/// lines. The subprocess is killed if it exceeds the configured timeout.
pub struct TesseractOcr {
    executable: String,
    language: String,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(
        executable: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            executable: executable.into(),
            language: language.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            &config.tesseract_path,
            &config.ocr_language,
            Duration::from_secs(config.ocr_timeout_secs),
        )
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, ExtractError> {
        let mut command = Command::new(&self.executable);
        command
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| ExtractError::RecognitionFailed {
                detail: format!("failed to launch '{}': {e}", self.executable),
            })?,
            Err(_) => {
                return Err(ExtractError::RecognitionTimeout {
                    path: image_path.to_path_buf(),
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(ExtractError::RecognitionFailed {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|line| line.trim_end().to_string())
            .filter(|line| !line.trim().is_empty())
            .collect();

        debug!(
            "{}: recognised {} lines from {}",
            self.name(),
            lines.len(),
            image_path.display()
        );

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tesseract_engine_reports_its_name() {
        let engine = TesseractOcr::new("tesseract", "eng", Duration::from_secs(5));
        assert_eq!(engine.name(), "tesseract");
    }

    #[tokio::test]
    async fn missing_binary_surfaces_recognition_failure() {
        let engine = TesseractOcr::new(
            "/definitely/not/a/real/tesseract",
            "eng",
            Duration::from_secs(5),
        );
        let err = engine.recognize(Path::new("scan.png")).await.unwrap_err();
        assert!(matches!(err, ExtractError::RecognitionFailed { .. }));
    }
}
