//! Address relocation - moving a captured region to a new spot on the page
//!
//! This module orchestrates the region processing pipeline:
//! 1. Parse the original document and pick the target page
//! 2. Capture the source region from a supersampled raster as PNG
//! 3. White out the source (padded) and the optional cover region
//! 4. Embed the capture and draw it at the destination, at source size
//! 5. Serialize the edited document
//!
//! White-out is always queued before the paste so overlapping source and
//! destination regions still show the pasted address on top.

mod batch;
mod io;

pub use batch::{BatchFailure, BatchInput, BatchReport, relocate_batch};
pub use io::{load_pdf_bytes, output_file_name, output_path_for, save_pdf_bytes};

use crate::options::RelocateOptions;
use crate::render::{PageRasterizer, capture_region};
use crate::types::*;
use crate::writer::EditableDocument;
use std::sync::Arc;

/// Relocate the source region of `options` within `original`
///
/// The rasterizer must render the same document as `original`; it is the
/// "preview" side of the pipeline that produces the pixels to paste.
pub async fn relocate(
    original: Vec<u8>,
    options: &RelocateOptions,
    rasterizer: Arc<dyn PageRasterizer>,
) -> Result<Vec<u8>> {
    options.validate()?;

    let options = options.clone();

    tokio::task::spawn_blocking(move || relocate_sync(&original, &options, rasterizer.as_ref()))
        .await?
}

/// Blocking version of [`relocate`]
pub fn relocate_sync(
    original: &[u8],
    options: &RelocateOptions,
    rasterizer: &dyn PageRasterizer,
) -> Result<Vec<u8>> {
    // Reject bad regions before touching either collaborator
    options.validate()?;

    let mut document = EditableDocument::load(original)?;
    let mut page = document.page(options.page_number)?;
    let page_height = page.height_pt();

    let captured = capture_region(
        rasterizer,
        original,
        options.page_number - 1,
        &options.source,
    )?;
    log::debug!(
        "Captured {:?} mm as {} bytes of PNG",
        options.source,
        captured.len()
    );

    let source_pt = options.source.to_pt(page_height);
    page.fill_white(source_pt.expand(options.source_padding_pt));

    if let Some(cover) = &options.cover {
        page.fill_white(cover.to_pt(page_height));
    }

    let image = page.embed_png(&captured)?;
    let destination_pt = options.destination_rect().to_pt(page_height);
    page.draw_image(&image, destination_pt);
    page.finish()?;

    log::info!(
        "Moved {:.1}x{:.1} mm region from ({:.1}, {:.1}) to ({:.1}, {:.1}) on page {}",
        options.source.width,
        options.source.height,
        options.source.x,
        options.source.y,
        options.destination.x,
        options.destination.y,
        options.page_number
    );

    document.save()
}
