//! Moving converted images out of the way
//!
//! After a document has been written, its source images can be moved into an
//! `archive` subfolder of the source directory. Moves are not rolled back: if
//! one fails, the files moved before it stay in the archive.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};

/// Name of the subfolder images are moved into
pub const ARCHIVE_DIR_NAME: &str = "archive";

/// Outcome of a completed archive step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    /// The archive folder
    pub folder: PathBuf,
    /// New locations of the moved files, in the order they were moved
    pub moved: Vec<PathBuf>,
}

/// Move `images` into `<dir>/archive`, creating the folder if needed.
///
/// Each file keeps its base name. A file already in the archive under the
/// same name is never replaced. Fails on the first move that does not
/// succeed, leaving earlier moves in place.
pub fn archive_images<P: AsRef<Path>>(dir: &Path, images: &[P]) -> Result<ArchiveReport> {
    if images.is_empty() {
        return Err(Error::NothingToArchive);
    }

    let folder = dir.join(ARCHIVE_DIR_NAME);
    if !folder.is_dir() {
        fs::create_dir(&folder).map_err(|source| Error::ArchiveFolder {
            path: folder.clone(),
            source,
        })?;
        debug!("Created {}", folder.display());
    }

    let mut moved = Vec::with_capacity(images.len());
    for image in images {
        let from = image.as_ref();
        let to = match from.file_name() {
            Some(name) => folder.join(name),
            None => {
                return Err(Error::ArchiveMove {
                    from: from.to_path_buf(),
                    to: folder.clone(),
                    source: std::io::ErrorKind::InvalidInput.into(),
                })
            }
        };

        // Never replace a file archived by an earlier run
        if to.symlink_metadata().is_ok() {
            return Err(Error::ArchiveMove {
                from: from.to_path_buf(),
                to,
                source: std::io::ErrorKind::AlreadyExists.into(),
            });
        }

        fs::rename(from, &to).map_err(|source| Error::ArchiveMove {
            from: from.to_path_buf(),
            to: to.clone(),
            source,
        })?;
        debug!("Archived {} -> {}", from.display(), to.display());
        moved.push(to);
    }

    info!("Archived {} images into {}", moved.len(), folder.display());
    Ok(ArchiveReport { folder, moved })
}
