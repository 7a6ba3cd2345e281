//! Image discovery and loading
//!
//! [`list_images`] finds the convertible files in a directory and returns them
//! in page order; [`read_assets`] loads their bytes into [`ImageAsset`]s for
//! the compositor.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::sequence::sort_by_filename;

/// Raster formats accepted as pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Map a file extension (without the dot, any case) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Format of `path`, judged by the text after its last period
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Matching format of the `image` crate decoder
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Gif => image::ImageFormat::Gif,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        };
        f.write_str(name)
    }
}

/// A convertible file found by [`list_images`], not yet read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Full path to the file
    pub path: PathBuf,
    /// File name used for ordering
    pub name: String,
    /// Format from the extension
    pub format: ImageFormat,
}

/// One source image held in memory for the duration of a conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Where the bytes came from
    pub path: PathBuf,
    /// Format from the extension
    pub format: ImageFormat,
    /// Raw file contents
    pub contents: Vec<u8>,
}

impl ImageAsset {
    /// Build an asset from bytes already in memory, taking the format from `path`
    pub fn from_bytes(path: impl Into<PathBuf>, contents: Vec<u8>) -> Result<Self> {
        let path = path.into();
        let format = ImageFormat::from_path(&path)
            .ok_or_else(|| Error::UnsupportedFormat(path.clone()))?;
        Ok(Self { path, format, contents })
    }

    /// Zero-length assets produce no page
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// List the images in `dir`, in page order.
///
/// Only regular files with a jpg, jpeg, png or gif extension (any case) are
/// returned; subdirectories such as `archive/` are skipped.
pub fn list_images(dir: &Path) -> Result<Vec<ImageEntry>> {
    let unreadable = |source: std::io::Error| Error::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(format) = ImageFormat::from_path(&path) else {
            debug!("Skipping {}: not an image", path.display());
            continue;
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        debug!("Found {} ({})", name, format);
        entries.push(ImageEntry { path, name, format });
    }

    sort_by_filename(&mut entries, |e| e.name.as_str());
    Ok(entries)
}

/// Read one listed file into memory
pub fn read_asset(entry: &ImageEntry) -> Result<ImageAsset> {
    let contents = fs::read(&entry.path).map_err(|source| Error::ReadFailed {
        path: entry.path.clone(),
        source,
    })?;

    Ok(ImageAsset {
        path: entry.path.clone(),
        format: entry.format,
        contents,
    })
}

/// Read every listed file, stopping at the first failure
pub fn read_assets(entries: &[ImageEntry]) -> Result<Vec<ImageAsset>> {
    entries.iter().map(read_asset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension_any_case() {
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("Png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("GIF"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
        assert_eq!(ImageFormat::from_extension(""), None);
    }

    #[test]
    fn test_format_uses_last_period() {
        assert_eq!(ImageFormat::from_path(Path::new("my.photo.JPG")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path(Path::new("dir.png/scan.tar")), None);
        assert_eq!(ImageFormat::from_path(Path::new("noext")), None);
        assert_eq!(ImageFormat::from_path(Path::new(".png")), None);
    }

    #[test]
    fn test_asset_from_bytes_rejects_unknown_format() {
        let result = ImageAsset::from_bytes("notes.txt", vec![1, 2, 3]);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));

        let asset = ImageAsset::from_bytes("a.gif", Vec::new()).unwrap();
        assert_eq!(asset.format, ImageFormat::Gif);
        assert!(asset.is_empty());
    }

    #[test]
    fn test_list_images_filters_and_orders() {
        let dir = TempDir::new().unwrap();
        for name in ["photo10.png", "photo2.PNG", "notes.txt", "Image.jpg", "Image (2).jpg", "noext"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("archive.png")).unwrap();

        let names: Vec<String> = list_images(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, ["Image.jpg", "Image (2).jpg", "photo2.PNG", "photo10.png"]);
    }

    #[test]
    fn test_list_images_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = list_images(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::DirectoryUnreadable { .. })));
    }

    #[test]
    fn test_read_assets_keeps_order_and_bytes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b2.gif"), b"second").unwrap();
        fs::write(dir.path().join("a1.gif"), b"first").unwrap();

        let assets = read_assets(&list_images(dir.path()).unwrap()).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].contents, b"first");
        assert_eq!(assets[1].contents, b"second");
    }

    #[test]
    fn test_read_asset_missing_file() {
        let entry = ImageEntry {
            path: PathBuf::from("does-not-exist.png"),
            name: "does-not-exist.png".to_string(),
            format: ImageFormat::Png,
        };
        assert!(matches!(read_asset(&entry), Err(Error::ReadFailed { .. })));
    }
}
