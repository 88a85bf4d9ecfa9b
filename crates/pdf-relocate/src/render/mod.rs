//! Page rasterization
//!
//! The region processor only needs one thing from a renderer: a full-page
//! RGBA raster at a given scale. That seam is the [`PageRasterizer`] trait;
//! the pdfium-backed implementation lives behind the `pdfium` feature.

mod capture;
#[cfg(feature = "pdfium")]
mod pdfium;

pub use capture::{capture_region, crop_region, encode_png};
#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumRasterizer, init_pdfium};

use crate::types::Result;
use image::RgbaImage;

/// A page rendered to pixels, plus its native size
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub image: RgbaImage,
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Renders document pages to RGBA rasters
///
/// Implementations are blocking; async callers run them on the blocking pool.
pub trait PageRasterizer: Send + Sync {
    /// Number of pages in the document
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize>;

    /// Render one page (0-indexed) at `scale` pixels per point
    fn render_page(&self, pdf_bytes: &[u8], page_index: usize, scale: f64)
    -> Result<RenderedPage>;

    /// Native page size in points (width, height)
    fn page_size(&self, pdf_bytes: &[u8], page_index: usize) -> Result<(f64, f64)>;
}
