#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_relocate::{EditableDocument, PageRasterizer, RelocateError, RenderedPage};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A4 in points
pub const A4_WIDTH_PT: f32 = 595.2756;
pub const A4_HEIGHT_PT: f32 = 841.8898;

pub fn media_box(llx: f32, lly: f32, urx: f32, ury: f32) -> Object {
    Object::Array(vec![
        Object::Real(llx),
        Object::Real(lly),
        Object::Real(urx),
        Object::Real(ury),
    ])
}

/// Build an in-memory PDF with `num_pages` pages of the given MediaBox
pub fn create_test_pdf_with_box(num_pages: usize, page_box: Object) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"0 0 1 rg 50 50 100 100 re f".to_vec(),
        ));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", page_box.clone()),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// A4 document with `num_pages` pages
pub fn create_test_pdf(num_pages: usize) -> Document {
    create_test_pdf_with_box(num_pages, media_box(0.0, 0.0, A4_WIDTH_PT, A4_HEIGHT_PT))
}

/// A4 document whose MediaBox and Resources live on the page tree root only
pub fn create_inherited_pdf() -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
        ("MediaBox", media_box(0.0, 0.0, A4_WIDTH_PT, A4_HEIGHT_PT)),
        ("Resources", Object::Dictionary(Dictionary::new())),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

pub fn test_pdf_bytes(num_pages: usize) -> Vec<u8> {
    to_bytes(create_test_pdf(num_pages))
}

/// Rasterizer that paints every page a solid color at the page's real size
///
/// Raster sizes are truncated to whole pixels, as Pdfium sizes its bitmaps.
/// Page geometry comes from lopdf so malformed input still fails. Calls are
/// counted so tests can assert the rasterizer was never reached.
pub struct SolidRasterizer {
    pub color: Rgba<u8>,
    pub calls: AtomicUsize,
}

impl SolidRasterizer {
    pub fn new() -> Self {
        Self::with_color(Rgba([200, 30, 30, 255]))
    }

    pub fn with_color(color: Rgba<u8>) -> Self {
        Self {
            color,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageRasterizer for SolidRasterizer {
    fn page_count(&self, pdf_bytes: &[u8]) -> pdf_relocate::Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let doc = EditableDocument::load(pdf_bytes)
            .map_err(|e| RelocateError::FileLoad(e.to_string()))?;
        Ok(doc.page_count())
    }

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        scale: f64,
    ) -> pdf_relocate::Result<RenderedPage> {
        let (width_pt, height_pt) = self.page_size(pdf_bytes, page_index)?;
        let image = RgbaImage::from_pixel(
            (width_pt * scale) as u32,
            (height_pt * scale) as u32,
            self.color,
        );
        Ok(RenderedPage {
            image,
            width_pt,
            height_pt,
        })
    }

    fn page_size(&self, pdf_bytes: &[u8], page_index: usize) -> pdf_relocate::Result<(f64, f64)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let doc = EditableDocument::load(pdf_bytes)
            .map_err(|e| RelocateError::FileLoad(e.to_string()))?;
        doc.page_size(page_index + 1)
    }
}

/// Decoded operations of the stream appended last to page 1
pub fn appended_operations(pdf: &[u8]) -> Vec<Operation> {
    let doc = Document::load_mem(pdf).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let contents = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Contents")
        .unwrap()
        .as_array()
        .unwrap()
        .clone();
    let last = contents.last().unwrap().as_reference().unwrap();
    let stream = doc.get_object(last).unwrap().as_stream().unwrap();
    Content::decode(&stream.content).unwrap().operations
}

pub fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("not a number: {:?}", other),
    }
}

/// Operands of every operation named `operator`
pub fn operands_of(ops: &[Operation], operator: &str) -> Vec<Vec<f64>> {
    ops.iter()
        .filter(|op| op.operator == operator)
        .map(|op| op.operands.iter().map(number).collect())
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
