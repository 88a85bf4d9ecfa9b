//! Cropping the captured address out of a page raster

use super::PageRasterizer;
use crate::constants::CAPTURE_SCALE;
use crate::geometry::{PixelRect, RectMm, pt_to_mm};
use crate::types::*;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Render `page_index` at the capture scale and return the source region as PNG bytes
pub fn capture_region(
    rasterizer: &dyn PageRasterizer,
    pdf_bytes: &[u8],
    page_index: usize,
    source: &RectMm,
) -> Result<Vec<u8>> {
    let rendered = rasterizer.render_page(pdf_bytes, page_index, CAPTURE_SCALE)?;
    log::debug!(
        "Capture raster {}x{} px for page {}",
        rendered.image.width(),
        rendered.image.height(),
        page_index + 1
    );

    let mut bounds = source.to_pixels(CAPTURE_SCALE);
    // Rasters are a whole number of pixels; an edge drawn on the page edge may round past it
    if lies_on_page(source, rendered.width_pt, rendered.height_pt) {
        bounds = bounds.clamp_to(rendered.image.width(), rendered.image.height());
    }
    let cropped = crop_region(&rendered.image, bounds)?;
    encode_png(&cropped)
}

/// Allowed overshoot past the page edge, in mm
const PAGE_EDGE_TOLERANCE_MM: f64 = 0.01;

fn lies_on_page(rect: &RectMm, page_width_pt: f64, page_height_pt: f64) -> bool {
    rect.x >= 0.0
        && rect.y >= 0.0
        && rect.right() <= pt_to_mm(page_width_pt) + PAGE_EDGE_TOLERANCE_MM
        && rect.bottom() <= pt_to_mm(page_height_pt) + PAGE_EDGE_TOLERANCE_MM
}

/// Copy `bounds` out of `raster` into a new image of exactly that size
pub fn crop_region(raster: &RgbaImage, bounds: PixelRect) -> Result<RgbaImage> {
    if !bounds.fits_within(raster.width(), raster.height()) {
        return Err(RelocateError::InvalidRegion(format!(
            "crop {}x{} at ({}, {}) px falls outside the {}x{} px page raster",
            bounds.width,
            bounds.height,
            bounds.left,
            bounds.top,
            raster.width(),
            raster.height()
        )));
    }

    let view = image::imageops::crop_imm(
        raster,
        bounds.left as u32,
        bounds.top as u32,
        bounds.width as u32,
        bounds.height as u32,
    );
    Ok(view.to_image())
}

/// Lossless encode for embedding
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn striped(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| {
            if x % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_crop_exact_size() {
        let raster = striped(100, 80);
        let bounds = PixelRect {
            left: 10,
            top: 20,
            width: 30,
            height: 40,
        };
        let cropped = crop_region(&raster, bounds).unwrap();
        assert_eq!(cropped.dimensions(), (30, 40));
        // Column 10 of the raster is black, so column 0 of the crop is too
        assert_eq!(cropped.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(cropped.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_crop_touching_edge_is_allowed() {
        let raster = striped(100, 80);
        let bounds = PixelRect {
            left: 70,
            top: 40,
            width: 30,
            height: 40,
        };
        assert!(crop_region(&raster, bounds).is_ok());
    }

    #[test]
    fn test_crop_partially_outside_fails() {
        let raster = striped(100, 80);
        let bounds = PixelRect {
            left: 71,
            top: 40,
            width: 30,
            height: 40,
        };
        assert!(matches!(
            crop_region(&raster, bounds),
            Err(RelocateError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_huge_crop_is_rejected() {
        let raster = striped(100, 80);
        let bounds = RectMm::new(1e18, 10.0, 1e17, 15.0).to_pixels(CAPTURE_SCALE);
        assert!(matches!(
            crop_region(&raster, bounds),
            Err(RelocateError::InvalidRegion(_))
        ));

        let bounds = PixelRect {
            left: i64::MAX - 1,
            top: 0,
            width: 10,
            height: 10,
        };
        assert!(!bounds.fits_within(100, 80));
    }

    #[test]
    fn test_page_edge_selection_is_clamped() {
        // 841.89 pt at 4x is 3367.56 px; a whole-pixel raster holds 3367
        assert!(lies_on_page(
            &RectMm::new(0.0, 280.0, 210.0, 17.0),
            595.2756,
            841.8898
        ));
        let bounds = RectMm::new(0.0, 280.0, 210.0, 17.0).to_pixels(CAPTURE_SCALE);
        assert_eq!(bounds.top + bounds.height, 3368);
        let clamped = bounds.clamp_to(2381, 3367);
        assert_eq!(clamped.top + clamped.height, 3367);
        assert!(clamped.fits_within(2381, 3367));

        assert!(!lies_on_page(
            &RectMm::new(200.0, 10.0, 40.0, 15.0),
            595.2756,
            841.8898
        ));
    }

    #[test]
    fn test_png_roundtrip_keeps_pixels() {
        let raster = striped(8, 4);
        let png = encode_png(&raster).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, raster);
    }
}
