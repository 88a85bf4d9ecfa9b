//! Image XObject creation and resource registration

use crate::constants::IMAGE_RESOURCE_PREFIX;
use crate::types::*;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::ImageFormat;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::io::Write;

use super::{inherited_attribute, resolve};

/// An image XObject registered on a page
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    /// Resource name used by the `Do` operator
    pub name: String,
    pub object_id: ObjectId,
    pub width_px: u32,
    pub height_px: u32,
}

/// Decode a PNG, store it as a Flate-compressed image XObject and register it on the page
pub(crate) fn embed_png(doc: &mut Document, page_id: ObjectId, png: &[u8]) -> Result<EmbeddedImage> {
    let rgba = image::load_from_memory_with_format(png, ImageFormat::Png)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    // Rendered pages are opaque; only translucent captures need a soft mask
    if alpha.iter().any(|&a| a != u8::MAX) {
        let smask = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        )
        .with_compression(false);
        let smask_id = doc.add_object(smask);
        image_dict.set("SMask", Object::Reference(smask_id));
    }

    let image_id = doc.add_object(Stream::new(image_dict, deflate(&rgb)?).with_compression(false));
    let name = register_xobject(doc, page_id, image_id)?;
    log::debug!(
        "Embedded {}x{} px image as /{} ({:?})",
        width,
        height,
        name,
        image_id
    );

    Ok(EmbeddedImage {
        name,
        object_id: image_id,
        width_px: width,
        height_px: height,
    })
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Add `image_id` to the page's XObject resources under a fresh name
fn register_xobject(doc: &mut Document, page_id: ObjectId, image_id: ObjectId) -> Result<String> {
    let resources_id = ensure_resources_object(doc, page_id)?;
    let xobjects_id = ensure_xobject_object(doc, resources_id)?;

    let xobjects = doc.get_dictionary_mut(xobjects_id)?;
    let name = (1..)
        .map(|n| format!("{}{}", IMAGE_RESOURCE_PREFIX, n))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| IMAGE_RESOURCE_PREFIX.to_string());
    xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));
    Ok(name)
}

/// Give the page its own indirect Resources dictionary and return its ID
///
/// The page's current resources (inline, referenced or inherited) are copied
/// into a new object, so pages sharing them are not affected.
fn ensure_resources_object(doc: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
    let resources_dict = match inherited_attribute(doc, page_id, b"Resources")? {
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    };

    let resources_id = doc.add_object(resources_dict);
    doc.get_dictionary_mut(page_id)?
        .set("Resources", Object::Reference(resources_id));
    Ok(resources_id)
}

/// Give the Resources dictionary its own indirect XObject dictionary and return its ID
fn ensure_xobject_object(doc: &mut Document, resources_id: ObjectId) -> Result<ObjectId> {
    let xobject_dict = match doc.get_dictionary(resources_id)?.get(b"XObject") {
        Ok(value) => match resolve(doc, value)? {
            Object::Dictionary(dict) => dict.clone(),
            _ => Dictionary::new(),
        },
        Err(_) => Dictionary::new(),
    };

    let xobjects_id = doc.add_object(xobject_dict);
    doc.get_dictionary_mut(resources_id)?
        .set("XObject", Object::Reference(xobjects_id));
    Ok(xobjects_id)
}
