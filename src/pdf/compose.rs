//! Page composition: one image per page, using lopdf
//!
//! The document is built object by object (catalog, page tree, one page,
//! content stream and image XObject per asset) and serialized to memory in a
//! single pass. Any asset that fails to decode aborts the whole call.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Offset, TimeZone};
use log::{debug, info};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat};

use crate::error::{Error, Result};
use crate::layout::{LayoutPolicy, Placement};
use crate::pdf::xobject::{encode_asset, EncodedImage};
use crate::source::ImageAsset;

/// Value written to the Info dictionary's Producer entry
pub const PRODUCER: &str = concat!("images-to-pdf ", env!("CARGO_PKG_VERSION"));

/// Resource name of the page's image
const IMAGE_RESOURCE: &[u8] = b"Im0";

/// Options for composing a document
#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    /// Page size and image placement
    pub layout: LayoutPolicy,
    /// Document title for the Info dictionary
    pub title: Option<String>,
}

/// How [`Document::write_to`] treats an existing destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Overwrite whatever is there
    #[default]
    Replace,
    /// Fail if the destination already exists
    CreateNew,
}

/// A finished PDF held in memory
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    bytes: Vec<u8>,
    sources: Vec<PathBuf>,
}

impl Document {
    /// Serialized PDF
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of pages, one per placed image
    pub fn page_count(&self) -> usize {
        self.sources.len()
    }

    /// Paths of the images that became pages, in page order
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Persist the document at `path`.
    ///
    /// The document is only borrowed, so the bytes remain available to retry
    /// elsewhere when writing fails.
    pub fn write_to(&self, path: &Path, mode: WriteMode) -> Result<()> {
        let result = match mode {
            WriteMode::Replace => fs::write(path, &self.bytes),
            WriteMode::CreateNew => OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .and_then(|mut file| file.write_all(&self.bytes)),
        };

        result.map_err(|source| Error::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.bytes.len())
            .field("sources", &self.sources)
            .finish()
    }
}

/// Compose the assets into a PDF with one page per non-empty asset.
///
/// Pages follow the order of `assets`. Zero-length assets are skipped; an
/// asset that does not decode fails the whole call and no document is
/// produced.
///
/// # Example
///
/// ```no_run
/// use images_to_pdf::pdf::{compose, ComposeOptions};
/// use images_to_pdf::source::{list_images, read_assets};
/// use std::path::Path;
///
/// let entries = list_images(Path::new("photos")).expect("listing");
/// let assets = read_assets(&entries).expect("reading");
/// let document = compose(&assets, &ComposeOptions::default()).expect("composing");
/// println!("{} pages", document.page_count());
/// ```
pub fn compose(assets: &[ImageAsset], options: &ComposeOptions) -> Result<Document> {
    let mut doc = lopdf::Document::with_version("1.5");

    // Reserved first so every page can point at its parent
    let pages_id = doc.new_object_id();

    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut sources: Vec<PathBuf> = Vec::new();

    for asset in assets {
        if asset.is_empty() {
            debug!("Skipping empty image {}", asset.path.display());
            continue;
        }

        let encoded = encode_asset(asset)?;
        let placement = options.layout.place(&encoded.geometry);
        debug!(
            "Page {}: {} ({}x{} px) on {:.1}x{:.1} pt",
            page_ids.len() + 1,
            asset.path.display(),
            encoded.geometry.width_px,
            encoded.geometry.height_px,
            placement.page_width,
            placement.page_height,
        );

        let page_id = add_image_page(&mut doc, pages_id, encoded, &placement)?;
        page_ids.push(page_id);
        sources.push(asset.path.clone());
    }

    if page_ids.is_empty() {
        return Err(Error::NothingToCompose);
    }

    // Create Kids array with all page references
    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_object));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(info_dictionary(options.title.as_deref(), &Local::now()));
    doc.trailer.set("Info", Object::Reference(info_id));

    // Compress content streams and save
    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(Error::Serialize)?;

    info!("Composed {} pages ({} bytes)", page_ids.len(), bytes.len());
    Ok(Document { bytes, sources })
}

/// Add one page showing `encoded` at `placement`, returning the page id
fn add_image_page(
    doc: &mut lopdf::Document,
    pages_id: ObjectId,
    encoded: EncodedImage,
    placement: &Placement,
) -> Result<ObjectId> {
    let EncodedImage { mut image, soft_mask, .. } = encoded;
    if let Some(mask) = soft_mask {
        let mask_id = doc.add_object(mask);
        image.dict.set("SMask", Object::Reference(mask_id));
    }
    let image_id = doc.add_object(image);

    let rect = placement.image;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(rect.width),
                    real(0.0),
                    real(0.0),
                    real(rect.height),
                    real(rect.x),
                    real(rect.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let mut xobjects = Dictionary::new();
    xobjects.set(IMAGE_RESOURCE.to_vec(), Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            real(placement.page_width),
            real(placement.page_height),
        ]),
    );
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Reference(content_id));

    Ok(doc.add_object(page))
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn info_dictionary<Tz: TimeZone>(title: Option<&str>, now: &DateTime<Tz>) -> Dictionary
where
    Tz::Offset: fmt::Display,
{
    let mut info = Dictionary::new();
    info.set("Producer", Object::string_literal(PRODUCER));
    info.set("CreationDate", Object::string_literal(pdf_date(now)));
    if let Some(title) = title {
        info.set("Title", text_string(title));
    }
    info
}

/// PDF text string: literal when ASCII, UTF-16BE with a byte order mark otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSS+HH'mm'`)
fn pdf_date<Tz: TimeZone>(when: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    let offset = when.offset().fix().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!(
        "D:{}{}{:02}'{:02}'",
        when.format("%Y%m%d%H%M%S"),
        sign,
        offset / 3600,
        offset % 3600 / 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use tempfile::TempDir;

    #[test]
    fn test_pdf_date_with_offsets() {
        let east = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let when = east.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(pdf_date(&when), "D:20240301090507+05'30'");

        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        let when = west.with_ymd_and_hms(2023, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(pdf_date(&when), "D:20231231235900-08'00'");
    }

    #[test]
    fn test_info_dictionary_title() {
        let when = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let info = info_dictionary(Some("Holiday"), &when);
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Holiday");
        assert!(info.get(b"Producer").is_ok());

        let accented = info_dictionary(Some("Été"), &when);
        assert_eq!(
            accented.get(b"Title").unwrap().as_str().unwrap(),
            [0xFE, 0xFF, 0x00, 0xC9, 0x00, 0x74, 0x00, 0xE9]
        );

        let untitled = info_dictionary(None, &when);
        assert!(untitled.get(b"Title").is_err());
    }

    #[test]
    fn test_only_empty_assets_is_an_error() {
        let assets = vec![
            ImageAsset::from_bytes("a.png", Vec::new()).unwrap(),
            ImageAsset::from_bytes("b.jpg", Vec::new()).unwrap(),
        ];
        let result = compose(&assets, &ComposeOptions::default());
        assert!(matches!(result, Err(Error::NothingToCompose)));
        assert!(matches!(
            compose(&[], &ComposeOptions::default()),
            Err(Error::NothingToCompose)
        ));
    }

    #[test]
    fn test_compose_serializes_to_pdf_bytes() {
        let mut png = Vec::new();
        image::DynamicImage::new_rgb8(6, 4)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let assets = vec![ImageAsset::from_bytes("only.png", png).unwrap()];

        let document = compose(&assets, &ComposeOptions::default()).unwrap();
        assert!(document.bytes().starts_with(b"%PDF-"));
        assert_eq!(document.page_count(), 1);
        assert_eq!(document.sources(), [PathBuf::from("only.png")]);
    }

    #[test]
    fn test_serialize_error_keeps_io_source() {
        let err = Error::Serialize(std::io::ErrorKind::WriteZero.into());
        assert!(err.to_string().starts_with("Failed to serialize PDF"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_write_modes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.pdf");
        let document = Document {
            bytes: b"%PDF-1.5 stub".to_vec(),
            sources: vec![PathBuf::from("a.png")],
        };

        document.write_to(&path, WriteMode::CreateNew).unwrap();
        assert_eq!(fs::read(&path).unwrap(), document.bytes());

        let again = document.write_to(&path, WriteMode::CreateNew);
        assert!(matches!(again, Err(Error::WriteFailed { .. })));

        document.write_to(&path, WriteMode::Replace).unwrap();
        assert_eq!(document.page_count(), 1);
    }

    #[test]
    fn test_write_to_missing_directory_keeps_bytes() {
        let dir = TempDir::new().unwrap();
        let document = Document {
            bytes: b"%PDF".to_vec(),
            sources: Vec::new(),
        };
        let result = document.write_to(&dir.path().join("nope").join("out.pdf"), WriteMode::Replace);
        assert!(matches!(result, Err(Error::WriteFailed { .. })));
        assert_eq!(document.into_bytes(), b"%PDF");
    }
}
