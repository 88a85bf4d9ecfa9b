//! Editable document backed by lopdf
//!
//! This is the mutation side of the pipeline:
//! - Parse the original bytes and look up a page (1-indexed)
//! - Resolve the page box, including values inherited from the page tree
//! - Queue white fills and image placements on the page
//! - Serialize the result
//!
//! Queued drawing is appended as a new content stream after the original
//! content, which is wrapped in `q ... Q` so its graphics state cannot leak.

mod content;
mod xobject;

pub use xobject::EmbeddedImage;

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::geometry::PtRect;
use crate::types::*;
use content::ContentBuilder;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Maximum depth followed when looking up inherited page attributes
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A parsed document open for editing
#[derive(Debug)]
pub struct EditableDocument {
    doc: Document,
}

impl EditableDocument {
    /// Parse PDF bytes
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| RelocateError::MalformedDocument(e.to_string()))?;
        if doc.get_pages().is_empty() {
            return Err(RelocateError::MalformedDocument(
                "document has no pages".to_string(),
            ));
        }
        Ok(Self { doc })
    }

    /// Wrap an already parsed document
    pub fn from_document(doc: Document) -> Self {
        Self { doc }
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Open page `page_number` (1-indexed) for drawing
    pub fn page(&mut self, page_number: usize) -> Result<PageEditor<'_>> {
        let page_count = self.page_count();
        let page_id = self
            .doc
            .get_pages()
            .get(&(page_number as u32))
            .copied()
            .ok_or(RelocateError::PageIndexOutOfRange {
                page: page_number,
                page_count,
            })?;

        let page_box = page_box(&self.doc, page_id)?;
        Ok(PageEditor {
            doc: &mut self.doc,
            page_id,
            page_box,
            content: ContentBuilder::new(),
        })
    }

    /// Size (width, height) in points of page `page_number`
    pub fn page_size(&self, page_number: usize) -> Result<(f64, f64)> {
        let page_id = self
            .doc
            .get_pages()
            .get(&(page_number as u32))
            .copied()
            .ok_or(RelocateError::PageIndexOutOfRange {
                page: page_number,
                page_count: self.page_count(),
            })?;
        let page_box = page_box(&self.doc, page_id)?;
        Ok((page_box.width, page_box.height))
    }

    /// Serialize to PDF bytes
    pub fn save(mut self) -> Result<Vec<u8>> {
        let mut writer = Vec::new();
        self.doc.save_to(&mut writer)?;
        Ok(writer)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }
}

/// Visible page area in default user space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f64,
    pub lly: f64,
    pub width: f64,
    pub height: f64,
}

/// Drawing access to one page
///
/// Rectangles passed in are page-relative points (origin at the page box's
/// lower-left corner). Nothing is written until [`PageEditor::finish`].
pub struct PageEditor<'a> {
    doc: &'a mut Document,
    page_id: ObjectId,
    page_box: PageBox,
    content: ContentBuilder,
}

impl PageEditor<'_> {
    pub fn height_pt(&self) -> f64 {
        self.page_box.height
    }

    pub fn width_pt(&self) -> f64 {
        self.page_box.width
    }

    pub fn page_box(&self) -> PageBox {
        self.page_box
    }

    /// Queue an opaque white rectangle
    pub fn fill_white(&mut self, rect: PtRect) {
        let rect = rect.offset(self.page_box.llx, self.page_box.lly);
        self.content.fill_rect(&rect, (1.0, 1.0, 1.0));
    }

    /// Add a PNG to the document and the page's resources
    pub fn embed_png(&mut self, png: &[u8]) -> Result<EmbeddedImage> {
        xobject::embed_png(self.doc, self.page_id, png)
    }

    /// Queue drawing an embedded image stretched over `rect`
    pub fn draw_image(&mut self, image: &EmbeddedImage, rect: PtRect) {
        let rect = rect.offset(self.page_box.llx, self.page_box.lly);
        self.content.draw_xobject(&image.name, &rect);
    }

    /// Write queued drawing into the page
    pub fn finish(self) -> Result<()> {
        if self.content.is_empty() {
            return Ok(());
        }
        content::append_isolated(self.doc, self.page_id, self.content.into_bytes())
    }
}

// =============================================================================
// Page Attributes
// =============================================================================

/// Resolve one level of indirection
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Look up a page attribute, walking up the page tree for inheritable keys
pub(crate) fn inherited_attribute(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Object>> {
    let mut node: &Dictionary = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(resolve(doc, value)?.clone()));
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Get the page box from the (possibly inherited) MediaBox
pub fn page_box(doc: &Document, page_id: ObjectId) -> Result<PageBox> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?;

    let numbers: Option<Vec<f64>> = media_box.as_ref().and_then(|obj| {
        let arr = obj.as_array().ok()?;
        if arr.len() != 4 {
            return None;
        }
        arr.iter()
            .map(|item| resolve(doc, item).ok().and_then(extract_number))
            .collect()
    });

    match numbers.as_deref() {
        Some([x0, y0, x1, y1]) => Ok(PageBox {
            llx: x0.min(*x1),
            lly: y0.min(*y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }),
        _ => {
            log::warn!(
                "Page {:?} has no usable MediaBox, assuming {:?} pt",
                page_id,
                DEFAULT_PAGE_DIMENSIONS
            );
            Ok(PageBox {
                llx: 0.0,
                lly: 0.0,
                width: DEFAULT_PAGE_DIMENSIONS.0,
                height: DEFAULT_PAGE_DIMENSIONS.1,
            })
        }
    }
}

/// Extract numeric value from a PDF object
pub(crate) fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
