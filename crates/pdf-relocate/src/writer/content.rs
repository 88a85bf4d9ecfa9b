//! Content stream generation and page content splicing

use crate::geometry::PtRect;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Accumulates drawing operators for one page
#[derive(Debug, Default)]
pub(crate) struct ContentBuilder {
    ops: String,
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Opaque filled rectangle in an RGB color (components 0..=1)
    pub fn fill_rect(&mut self, rect: &PtRect, (r, g, b): (f64, f64, f64)) {
        self.ops.push_str(&format!(
            "q {} {} {} rg {} {} {} {} re f Q\n",
            num(r),
            num(g),
            num(b),
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height)
        ));
    }

    /// Paint an XObject scaled to fill `rect`
    ///
    /// Image XObjects occupy the unit square, so the CTM scale is the target size.
    pub fn draw_xobject(&mut self, name: &str, rect: &PtRect) {
        self.ops.push_str(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            num(rect.width),
            num(rect.height),
            num(rect.x),
            num(rect.y),
            name
        ));
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.ops.into_bytes()
    }
}

/// Format a number for a content stream (fixed point, no exponent)
fn num(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Append `ops` to a page, wrapping the existing content in `q ... Q`
pub(crate) fn append_isolated(doc: &mut Document, page_id: ObjectId, ops: Vec<u8>) -> Result<()> {
    let existing = existing_content_refs(doc, page_id)?;

    let mut contents = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let restore_id = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        contents.push(Object::Reference(restore_id));
    }
    let ops_id = doc.add_object(Stream::new(Dictionary::new(), ops));
    contents.push(Object::Reference(ops_id));

    let page = doc.get_dictionary_mut(page_id)?;
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// The page's content streams as a flat list of references
fn existing_content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    let contents = match page.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            // An indirect array of streams
            Object::Array(arr) => Ok(arr.clone()),
            _ => Ok(vec![Object::Reference(*id)]),
        },
        Object::Array(arr) => Ok(arr.clone()),
        _ => Ok(Vec::new()),
    }
}
