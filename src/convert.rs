//! One-call conversion of a directory into a PDF
//!
//! [`convert_directory`] is the entry point front ends use: it lists,
//! orders, reads and composes the images, writes the document and optionally
//! archives the sources, returning either a report or the first error.

use std::path::PathBuf;

use log::info;

use crate::archive::archive_images;
use crate::error::{Error, Result};
use crate::layout::LayoutPolicy;
use crate::pdf::{compose, ComposeOptions, WriteMode};
use crate::source::{list_images, read_assets};

/// Options for converting a directory
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory holding the images
    pub source_dir: PathBuf,
    /// Where the PDF is written
    pub output_path: PathBuf,
    /// Move converted images into `<source_dir>/archive` afterwards
    pub archive: bool,
    /// Page size and image placement
    pub layout: LayoutPolicy,
    /// Document title
    pub title: Option<String>,
    /// Overwrite behaviour for `output_path`
    pub write_mode: WriteMode,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_path: PathBuf::from("out.pdf"),
            archive: false,
            layout: LayoutPolicy::default(),
            title: None,
            write_mode: WriteMode::default(),
        }
    }
}

/// Result of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// The written PDF
    pub output: PathBuf,
    /// Number of pages in it
    pub pages: usize,
    /// Archived locations of the source images (empty unless archiving)
    pub archived: Vec<PathBuf>,
}

/// Convert every image in `options.source_dir` into a single PDF.
///
/// The archive step only runs after the document has been written.
///
/// # Example
///
/// ```no_run
/// use images_to_pdf::convert::{convert_directory, ConvertOptions};
/// use std::path::PathBuf;
///
/// let options = ConvertOptions {
///     source_dir: PathBuf::from("scans"),
///     output_path: PathBuf::from("scans.pdf"),
///     archive: true,
///     ..Default::default()
/// };
///
/// let report = convert_directory(&options).expect("Failed to convert");
/// println!("{} pages written to {}", report.pages, report.output.display());
/// ```
pub fn convert_directory(options: &ConvertOptions) -> Result<ConversionReport> {
    let entries = list_images(&options.source_dir)?;
    if entries.is_empty() {
        return Err(Error::NoImages(options.source_dir.clone()));
    }
    info!("Found {} images in {}", entries.len(), options.source_dir.display());

    let assets = read_assets(&entries)?;

    let compose_options = ComposeOptions {
        layout: options.layout,
        title: options.title.clone(),
    };
    let document = compose(&assets, &compose_options)?;
    // Release the source bytes before writing
    drop(assets);

    document.write_to(&options.output_path, options.write_mode)?;
    info!(
        "Wrote {} pages to {}",
        document.page_count(),
        options.output_path.display()
    );

    let archived = if options.archive {
        archive_images(&options.source_dir, document.sources())?.moved
    } else {
        Vec::new()
    };

    Ok(ConversionReport {
        output: options.output_path.clone(),
        pages: document.page_count(),
        archived,
    })
}
