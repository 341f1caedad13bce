//! Shared test utilities for the photo-shelf test suite.
//!
//! Provides fixture writers (real, decodable image files) and small
//! constructors that keep test bodies short.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_png(tmp.path(), "photos/cat.png", 8, 6);
//! let probe = FileProbe::new(tmp.path(), false);
//! assert!(probe.probe(&path("photos/cat.png")).is_loaded());
//! ```

use image::{Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::types::PhotoPath;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a `width`×`height` PNG at `dir/rel`, creating parent directories.
/// Returns the full path of the written file.
pub fn write_png(dir: &Path, rel: &str, width: u32, height: u32) -> PathBuf {
    let target = dir.join(rel);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 37 % 256) as u8, (y * 53 % 256) as u8, 128])
    });
    img.save_with_format(&target, image::ImageFormat::Png)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", target.display()));
    target
}

/// Write a `width`×`height` AVIF at `dir/rel` (speed 6, quality 85).
pub fn write_avif(dir: &Path, rel: &str, width: u32, height: u32) -> PathBuf {
    let target = dir.join(rel);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let writer = BufWriter::new(File::create(&target).unwrap());
    let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(writer, 6, 85);
    img.write_with_encoder(encoder)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", target.display()));
    target
}

// =========================================================================
// Constructors and extractors
// =========================================================================

/// Parse a path, panicking on blank input.
pub fn path(raw: &str) -> PhotoPath {
    PhotoPath::parse(raw).unwrap_or_else(|_| panic!("blank test path: {raw:?}"))
}

/// Parse a list of paths.
pub fn paths(raw: &[&str]) -> Vec<PhotoPath> {
    raw.iter().map(|r| path(r)).collect()
}

/// Path strings in order, for compact `assert_eq!`s.
pub fn strs<'a>(paths: impl IntoIterator<Item = &'a PhotoPath>) -> Vec<&'a str> {
    paths.into_iter().map(|p| p.as_str()).collect()
}
