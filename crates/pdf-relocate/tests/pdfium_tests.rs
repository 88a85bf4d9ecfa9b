//! End-to-end checks against the real Pdfium renderer
//!
//! These need the Pdfium shared library (in `vendor/pdfium/lib` or on the
//! system search path), so they are ignored by default:
//! `cargo test -p pdf-relocate -- --ignored`

#![cfg(feature = "pdfium")]

mod common;

use common::*;
use pdf_relocate::*;
use std::sync::Arc;

fn rasterizer() -> PdfiumRasterizer {
    let vendor = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../vendor/pdfium/lib");
    if vendor.exists() {
        PdfiumRasterizer::with_library_dir(vendor)
    } else {
        PdfiumRasterizer::new()
    }
}

fn is_blue(pixel: &image::Rgba<u8>) -> bool {
    pixel[2] > 200 && pixel[0] < 60 && pixel[1] < 60
}

fn is_white(pixel: &image::Rgba<u8>) -> bool {
    pixel[0] > 245 && pixel[1] > 245 && pixel[2] > 245
}

#[test]
#[ignore = "requires the Pdfium shared library"]
fn test_pdfium_reports_pages_and_size() {
    let rasterizer = rasterizer();
    let bytes = test_pdf_bytes(2);

    assert_eq!(rasterizer.page_count(&bytes).unwrap(), 2);
    let (width, height) = rasterizer.page_size(&bytes, 1).unwrap();
    assert_close(width, A4_WIDTH_PT as f64, "page width");
    assert_close(height, A4_HEIGHT_PT as f64, "page height");

    assert!(matches!(
        rasterizer.page_size(&bytes, 2),
        Err(RelocateError::PageIndexOutOfRange { .. })
    ));
    assert!(rasterizer.page_count(b"not a pdf").is_err());
}

#[test]
#[ignore = "requires the Pdfium shared library"]
fn test_pdfium_renders_at_scale() {
    let rasterizer = rasterizer();
    let bytes = test_pdf_bytes(1);

    let page = rasterizer.render_page(&bytes, 0, 2.0).unwrap();
    let expected_width = A4_WIDTH_PT as f64 * 2.0;
    assert!((page.image.width() as f64 - expected_width).abs() <= 1.0);

    // The fixture paints a blue square at (50, 50)-(150, 150) pt, bottom-left origin
    let y = ((A4_HEIGHT_PT as f64 - 100.0) * 2.0) as u32;
    assert!(is_blue(page.image.get_pixel(200, y)));
    assert!(is_white(page.image.get_pixel(600, 200)));
}

#[tokio::test]
#[ignore = "requires the Pdfium shared library"]
async fn test_relocated_square_renders_at_destination() {
    let rasterizer = Arc::new(rasterizer());
    let bytes = test_pdf_bytes(1);

    // Square spans 17.6..52.9 mm across and 244.1..279.4 mm down
    let options = RelocateOptions::new(
        RectMm::new(17.0, 243.0, 37.0, 37.0),
        PointMm::new(100.0, 20.0),
    );
    let output = relocate(bytes, &options, rasterizer.clone()).await.unwrap();

    let page = rasterizer.render_page(&output, 0, 1.0).unwrap();
    let px = |mm: f64| mm_to_px(mm, 1.0) as u32;

    assert!(is_blue(page.image.get_pixel(px(110.0), px(30.0))));
    assert!(is_white(page.image.get_pixel(px(35.0), px(262.0))));
}
