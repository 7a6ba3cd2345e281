//! Reading back a produced PDF
//!
//! Used to report on a finished conversion and to verify page order and page
//! geometry in tests.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};

use crate::error::{Error, Result};

/// One page of a produced PDF
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    /// MediaBox width in points
    pub width: f32,
    /// MediaBox height in points
    pub height: f32,
    /// Pixel size of the page's image, if it has one
    pub image_size: Option<(i64, i64)>,
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages according to the page tree root
    pub page_count: usize,
    /// Pages in document order
    pub pages: Vec<PageInfo>,
    /// Document title (if present)
    pub title: Option<String>,
    /// Producing application (if present)
    pub producer: Option<String>,
}

/// Count pages by reading the Count field from the Pages dictionary
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog = resolve(doc, doc.trailer.get(b"Root")?)?.as_dict()?;
    let pages = resolve(doc, catalog.get(b"Pages")?)?.as_dict()?;
    let count = pages.get(b"Count")?.as_i64()?;
    usize::try_from(count).map_err(|_| Error::InvalidPageCount(count))
}

/// Follow a reference to the object it names
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn page_info(doc: &Document, page: &Dictionary) -> Result<PageInfo> {
    let media_box = resolve(doc, page.get(b"MediaBox")?)?.as_array()?;
    let corner = |i: usize| {
        media_box
            .get(i)
            .and_then(|value| value.as_float().ok())
            .unwrap_or(0.0)
    };
    let width = corner(2) - corner(0);
    let height = corner(3) - corner(1);

    let image_size = first_image_size(doc, page).ok().flatten();

    Ok(PageInfo { width, height, image_size })
}

fn first_image_size(doc: &Document, page: &Dictionary) -> Result<Option<(i64, i64)>> {
    let resources = resolve(doc, page.get(b"Resources")?)?.as_dict()?;
    let xobjects = resolve(doc, resources.get(b"XObject")?)?.as_dict()?;

    for (_, value) in xobjects.iter() {
        if let Object::Stream(stream) = resolve(doc, value)? {
            if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Image".as_slice()) {
                let width = stream.dict.get(b"Width")?.as_i64()?;
                let height = stream.dict.get(b"Height")?.as_i64()?;
                return Ok(Some((width, height)));
            }
        }
    }

    Ok(None)
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = resolve(doc, doc.trailer.get(b"Info").ok()?).ok()?.as_dict().ok()?;
    let bytes = info.get(key).ok()?.as_str().ok()?;
    decode_text_string(bytes)
}

/// Decode a PDF text string written as UTF-16BE (with BOM) or plain bytes
fn decode_text_string(bytes: &[u8]) -> Option<String> {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        None => String::from_utf8(bytes.to_vec()).ok(),
    }
}

/// Extract metadata from PDF bytes held in memory
pub fn extract_metadata_from_bytes(bytes: &[u8]) -> Result<PdfMetadata> {
    let doc = Document::load_mem(bytes)?;
    metadata_of(&doc)
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::ReadFailed {
            path: path.to_path_buf(),
            source: std::io::ErrorKind::NotFound.into(),
        });
    }

    let doc = Document::load(path)?;
    metadata_of(&doc)
}

fn metadata_of(doc: &Document) -> Result<PdfMetadata> {
    let page_count = count_pages_from_catalog(doc)?;

    let mut pages = Vec::with_capacity(page_count);
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_object(page_id)?.as_dict()?;
        pages.push(page_info(doc, page)?);
    }

    Ok(PdfMetadata {
        page_count,
        pages,
        title: info_string(doc, b"Title"),
        producer: info_string(doc, b"Producer"),
    })
}
