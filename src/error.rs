//! Error types for the images-to-pdf library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the images-to-pdf library
#[derive(Error, Debug)]
pub enum Error {
    /// The source directory could not be listed
    #[error("Cannot read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No jpg/jpeg/png/gif files in the source directory
    #[error("No images found in {}", .0.display())]
    NoImages(PathBuf),

    /// An image file could not be read
    #[error("Cannot read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path extension is not one of the accepted image formats
    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Image bytes could not be interpreted as their declared format
    #[error("Failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Decoded pixels could not be compressed into a PDF image stream
    #[error("Failed to encode image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every asset handed to the compositor was empty
    #[error("No non-empty images to place in the document")]
    NothingToCompose,

    /// The composed document could not be serialized
    #[error("Failed to serialize PDF: {0}")]
    Serialize(#[source] std::io::Error),

    /// lopdf rejected a document or object
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// A page tree declares a page count that cannot be a length
    #[error("Invalid page count in PDF: {0}")]
    InvalidPageCount(i64),

    /// The finished document could not be written
    #[error("Cannot write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archive step called without any images
    #[error("No images provided for archiving")]
    NothingToArchive,

    /// The archive folder could not be created
    #[error("Failed to create archive folder {}: {source}", .path.display())]
    ArchiveFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single image could not be moved into the archive folder
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    ArchiveMove {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
