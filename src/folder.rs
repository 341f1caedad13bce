//! Folder import: turn a selected directory into a list of photo paths.
//!
//! Every file under the directory is considered. Only files whose extension
//! maps to an `image/*` media type are kept. Each kept file is named the way a
//! browser folder picker names it (`<folder>/<sub>/<file>`), then the folder's
//! own name is stripped, so picking `holiday/` yields `beach/1.jpg` rather than
//! `holiday/beach/1.jpg`. An optional prefix is put back in front, for folders
//! that do not sit at the gallery root:
//!
//! ```text
//! gallery/photos/holiday/beach/1.jpg
//!
//! collect_folder("gallery/photos/holiday", "")                → beach/1.jpg
//! collect_folder("gallery/photos/holiday", "photos/holiday/") → photos/holiday/beach/1.jpg
//! ```
//!
//! Paths always use `/` separators and come back in file-name order.

use image::ImageFormat;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum FolderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read folder: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Drop the first segment of a `/`-separated relative path. Input without a
/// separator (a bare file name) is returned unchanged.
pub fn relative_photo_path(rel: &str) -> &str {
    match rel.split_once('/') {
        Some((_, rest)) => rest,
        None => rel,
    }
}

/// Media type guessed from the file extension. SVG is not an `ImageFormat`
/// but browsers show it like any other image.
pub fn media_type(path: &Path) -> Option<&'static str> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        return Some("image/svg+xml");
    }
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type())
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Walk `dir` and return the photo paths to import, `prefix` prepended.
pub fn collect_folder(dir: &Path, prefix: &str) -> Result<Vec<String>, FolderError> {
    if !dir.is_dir() {
        return Err(FolderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        )));
    }
    let folder_name = dir
        .canonicalize()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut collected = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = media_type(entry.path()) else {
            log::debug!("skipping {}: unknown media type", entry.path().display());
            continue;
        };
        if !is_image_media_type(kind) {
            continue;
        }
        let Ok(inner) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let inner: Vec<String> = inner
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let picked = format!("{folder_name}/{}", inner.join("/"));
        collected.push(format!("{prefix}{}", relative_photo_path(&picked)));
    }
    log::debug!("collected {} photos from {}", collected.len(), dir.display());
    Ok(collected)
}
