//! PDF production module

pub mod compose;
pub mod metadata;
pub mod probe;
pub mod xobject;

// Re-export commonly used items
pub use compose::{compose, ComposeOptions, Document, WriteMode};
pub use metadata::{extract_metadata, extract_metadata_from_bytes, PageInfo, PdfMetadata};
