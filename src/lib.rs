//! Images to PDF Library
//!
//! Turns a folder of images into a single multi-page PDF.
//! This library provides functionality to:
//! - List the jpg/jpeg/png/gif files of a directory in page order
//! - Compose images into a PDF, one image per page
//! - Choose between pages sized to each image and fixed, centred pages
//! - Move converted images into an archive folder
//!
//! # Example
//!
//! ```no_run
//! use images_to_pdf::convert::{convert_directory, ConvertOptions};
//! use std::path::PathBuf;
//!
//! let options = ConvertOptions {
//!     source_dir: PathBuf::from("photos"),
//!     output_path: PathBuf::from("photos.pdf"),
//!     ..Default::default()
//! };
//!
//! convert_directory(&options).expect("Failed to convert images");
//! ```

pub mod archive;
pub mod convert;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod sequence;
pub mod source;

// Re-export commonly used items
pub use convert::{convert_directory, ConversionReport, ConvertOptions};
pub use error::{Error, Result};
pub use layout::{LayoutPolicy, PageDimensions};
