//! Image database enumeration and decoding.

use cbir_core::{Error, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::debug;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// List raster image files directly under `dir`, sorted lexicographically.
///
/// Only regular files with a `.jpg`, `.jpeg`, `.png` or `.bmp` extension
/// (case-insensitive) are returned. The sort fixes the iteration order, so
/// ranking tie-breaks are deterministic across runs.
pub fn list_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    debug!(count = files.len(), dir = %dir.as_ref().display(), "listed image files");
    Ok(files)
}

/// Decode an image from disk into an 8-bit RGB bitmap.
///
/// Fails with [`Error::ImageDecode`] when the file is missing, unreadable
/// or not a supported raster format.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|e| Error::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(decoded.to_rgb8())
}

/// Basename of a path, used as the stable identifier for embedding lookups.
#[must_use]
pub fn basename(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
