//! Writing extracted images to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::LayoutDocument;

/// Write every image of a document into `dir` as PNG files.
///
/// File names match the links produced by the Markdown renderer. The
/// directory is created if needed. Returns the written paths in block order.
pub fn write_images(doc: &LayoutDocument, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::new();

    for image in doc.images() {
        if written.is_empty() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(image.file_name());
        fs::write(&path, &image.data)?;
        written.push(path);
    }

    log::debug!("Wrote {} images to {}", written.len(), dir.display());
    Ok(written)
}
