//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, keeping the runtime responsive
//! during CPU-heavy rendering.
//!
//! ## Why cap pixels?
//!
//! Page sizes vary: an A3 resume rendered naively could produce an image far
//! larger than the OCR engine needs. `max_pixels` caps the longest edge so
//! pdfium never allocates more than roughly `max_pixels²` bytes of pixels,
//! while keeping text sharp enough for reliable recognition.

use crate::error::ExtractError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rasterise all pages of a PDF into images, in page order.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
pub async fn render_pdf_pages(
    pdf_path: &Path,
    max_pixels: u32,
) -> Result<Vec<DynamicImage>, ExtractError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || render_pdf_pages_blocking(&path, max_pixels))
        .await
        .map_err(|e| ExtractError::Internal(format!("Render task panicked: {e}")))?
}

/// Blocking implementation of page rendering.
fn render_pdf_pages_blocking(
    pdf_path: &Path,
    max_pixels: u32,
) -> Result<Vec<DynamicImage>, ExtractError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ExtractError::ConversionFailed {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut images = Vec::with_capacity(total_pages);

    for idx in 0..total_pages {
        let page = pages
            .get(idx as u16)
            .map_err(|e| ExtractError::ConversionFailed {
                path: pdf_path.to_path_buf(),
                detail: format!("page {}: {e:?}", idx + 1),
            })?;

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ExtractError::ConversionFailed {
                    path: pdf_path.to_path_buf(),
                    detail: format!("page {}: {e:?}", idx + 1),
                })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        images.push(image);
    }

    Ok(images)
}
