//! Input resolution: validate a document path and classify it.
//!
//! Routing is by file extension, not content sniffing: a `.pdf` suffix
//! (any case) goes through the rasteriser, anything else is handed to the
//! OCR engine as a single image. Existence and readability are checked up
//! front so callers get a [`ExtractError::FileNotFound`] or
//! [`ExtractError::PermissionDenied`] instead of a confusing collaborator
//! error further down the pipeline.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check that the document exists and is readable.
pub fn resolve_local(path: &Path) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(_) => {
            debug!("Resolved local document: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// True when the path carries a `.pdf` extension (case-insensitive).
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// True when the path carries a `.txt` extension (case-insensitive).
///
/// Directory batch processing picks up exactly these files.
pub fn is_plaintext(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

/// Deterministic sibling path for the persisted text blob:
/// `extracted_<stem>.txt` in the original document's directory.
pub fn sibling_text_path(original: &Path) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = original.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("extracted_{stem}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detection_is_case_insensitive() {
        assert!(is_pdf(Path::new("resume.pdf")));
        assert!(is_pdf(Path::new("resume.PDF")));
        assert!(!is_pdf(Path::new("resume.png")));
        assert!(!is_pdf(Path::new("resume")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn plaintext_detection() {
        assert!(is_plaintext(Path::new("extracted_resume.txt")));
        assert!(is_plaintext(Path::new("RESUME.TXT")));
        assert!(!is_plaintext(Path::new("resume.pdf")));
    }

    #[test]
    fn sibling_path_is_derived_from_the_stem() {
        assert_eq!(
            sibling_text_path(Path::new("/tmp/resumes/jane-doe.pdf")),
            PathBuf::from("/tmp/resumes/extracted_jane-doe.txt")
        );
        assert_eq!(
            sibling_text_path(Path::new("scan.jpeg")),
            PathBuf::from("extracted_scan.txt")
        );
    }

    #[test]
    fn missing_file_resolves_to_not_found() {
        let err = resolve_local(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }
}
