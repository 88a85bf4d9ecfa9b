use super::{PageRasterizer, RenderedPage};
use crate::types::*;
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// Initialize Pdfium, trying the vendored library first, then falling back to system
pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    // When running from cargo, the working directory is the workspace root
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Rasterizer backed by the Pdfium library
///
/// Pdfium is bound per call, so the rasterizer itself is freely shareable
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    library_dir: Option<PathBuf>,
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the Pdfium library in `dir` instead of the default search
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium> {
        let pdfium = match &self.library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .map(Pdfium::new),
            None => init_pdfium(),
        };
        pdfium.map_err(|e| RelocateError::Processing(format!("Failed to bind Pdfium: {}", e)))
    }
}

fn file_load_error(e: PdfiumError) -> RelocateError {
    RelocateError::FileLoad(e.to_string())
}

fn processing_error(e: PdfiumError) -> RelocateError {
    RelocateError::Processing(e.to_string())
}

/// Validate a 0-indexed page against the document and convert it for Pdfium
fn checked_page_index(document: &PdfDocument, page_index: usize) -> Result<u16> {
    let page_count = document.pages().len() as usize;
    if page_index >= page_count {
        return Err(RelocateError::PageIndexOutOfRange {
            page: page_index + 1,
            page_count,
        });
    }
    Ok(page_index as u16)
}

impl PageRasterizer for PdfiumRasterizer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(file_load_error)?;
        Ok(document.pages().len() as usize)
    }

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        scale: f64,
    ) -> Result<RenderedPage> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(file_load_error)?;
        let page = document
            .pages()
            .get(checked_page_index(&document, page_index)?)
            .map_err(processing_error)?;

        let width_pt = page.width().value as f64;
        let height_pt = page.height().value as f64;

        let config = PdfRenderConfig::new()
            .scale_page_by_factor(scale as f32)
            .set_clear_color(PdfColor::WHITE);
        let bitmap = page.render_with_config(&config).map_err(processing_error)?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let image = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec())
            .ok_or_else(|| {
                RelocateError::Processing(format!(
                    "Rendered bitmap does not match its {}x{} size",
                    width, height
                ))
            })?;

        Ok(RenderedPage {
            image,
            width_pt,
            height_pt,
        })
    }

    fn page_size(&self, pdf_bytes: &[u8], page_index: usize) -> Result<(f64, f64)> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(file_load_error)?;
        let page = document
            .pages()
            .get(checked_page_index(&document, page_index)?)
            .map_err(processing_error)?;
        Ok((page.width().value as f64, page.height().value as f64))
    }
}
