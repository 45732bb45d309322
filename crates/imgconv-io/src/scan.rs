use std::path::{Path, PathBuf};

use crate::{error::IoError, functional::FileKind};

/// List the image files of a directory.
///
/// Only regular files whose extension is `jpg`, `jpeg`, `png` or `data`, in any case,
/// are kept. Subdirectories are not visited.
///
/// # Arguments
///
/// * `dir` - The directory to scan.
///
/// # Returns
///
/// The paths of the image files, sorted.
pub fn list_image_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(IoError::FileDoesNotExist(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if FileKind::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();

    log::debug!("found {} image files in {}", files.len(), dir.display());
    Ok(files)
}
