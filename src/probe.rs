//! Image load probing.
//!
//! A path is only worth showing (and, for fresh submissions, only worth
//! keeping) if it actually loads as an image. The [`ImageProbe`] trait is the
//! seam: [`FileProbe`] checks the filesystem, tests use a mock.
//!
//! ## Resolution rules ([`FileProbe`])
//!
//! | Path | Checked as |
//! |---|---|
//! | `photos/cat.jpg` | `<root>/photos/cat.jpg` |
//! | `/srv/img/cat.jpg` | as-is |
//! | `file:///srv/img/cat.jpg` | `/srv/img/cat.jpg` |
//! | `https://…`, `data:…` | not checkable locally; `trust_remote` decides |
//!
//! "Loads" means the file is a recognised image format whose header reads
//! cleanly:
//!
//! - AVIF: container metadata via `avif-parse`.
//! - SVG (by extension): readable text containing an `<svg` element; no
//!   dimensions.
//! - Formats `image` recognises but has no decoder compiled in for: loaded
//!   with unknown dimensions.
//! - Everything else: the `image` crate header reader.
//!
//! Unrecognised or truncated files fail.
//!
//! ## Parallel probing
//!
//! [`probe_all`] runs one independent probe per path on the rayon pool.
//! Outcomes come back in input order so each card gets its own result;
//! progress events are sent as probes finish, in whatever order that is.
//! There is no timeout: a probe that never returns holds up its batch.

use crate::types::{Dimensions, PhotoPath};
use image::{ImageError, ImageFormat, ImageReader};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Result of trying to load one path as an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The path resolved to a displayable image. Dimensions are `None` for
    /// trusted remote paths that were not fetched.
    Loaded { dimensions: Option<Dimensions> },
    Failed { reason: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Decides whether a path loads as an image.
///
/// `Sync` so one probe can serve every rayon worker.
pub trait ImageProbe: Sync {
    fn probe(&self, path: &PhotoPath) -> LoadOutcome;
}

/// Probes paths on the local filesystem relative to a gallery root.
#[derive(Debug, Clone)]
pub struct FileProbe {
    root: PathBuf,
    trust_remote: bool,
}

impl FileProbe {
    pub fn new(root: impl Into<PathBuf>, trust_remote: bool) -> Self {
        Self {
            root: root.into(),
            trust_remote,
        }
    }

    /// Filesystem location a path refers to, or `None` for remote paths.
    pub fn resolve(&self, path: &PhotoPath) -> Option<PathBuf> {
        let raw = path.as_str();
        if let Some(local) = raw.strip_prefix("file://") {
            return Some(PathBuf::from(local));
        }
        if path.is_url() {
            return None;
        }
        let candidate = Path::new(raw);
        if candidate.is_absolute() {
            Some(candidate.to_path_buf())
        } else {
            Some(self.root.join(candidate))
        }
    }
}

impl ImageProbe for FileProbe {
    fn probe(&self, path: &PhotoPath) -> LoadOutcome {
        let Some(file) = self.resolve(path) else {
            return if self.trust_remote {
                LoadOutcome::Loaded { dimensions: None }
            } else {
                LoadOutcome::failed("remote images cannot be checked")
            };
        };
        let outcome = read_dimensions(&file);
        log::debug!("probed {} → {:?}", file.display(), outcome);
        outcome
    }
}

fn read_dimensions(file: &Path) -> LoadOutcome {
    if has_extension(file, "svg") {
        return read_svg(file);
    }
    let reader = match ImageReader::open(file) {
        Ok(r) => r,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return LoadOutcome::failed("file not found");
        }
        Err(e) => return LoadOutcome::failed(e.to_string()),
    };
    let reader = match reader.with_guessed_format() {
        Ok(r) => r,
        Err(e) => return LoadOutcome::failed(e.to_string()),
    };
    let Some(format) = reader.format() else {
        return LoadOutcome::failed("not a recognised image format");
    };
    if format == ImageFormat::Avif {
        return read_avif(file);
    }
    match reader.into_dimensions() {
        Ok((width, height)) => LoadOutcome::Loaded {
            dimensions: Some(Dimensions { width, height }),
        },
        // Known format without a compiled-in header reader: browsers still show it.
        Err(ImageError::Unsupported(e)) => {
            log::debug!("{}: {format:?} header not readable ({e})", file.display());
            LoadOutcome::Loaded { dimensions: None }
        }
        Err(e) => LoadOutcome::failed(e.to_string()),
    }
}

fn has_extension(file: &Path, ext: &str) -> bool {
    file.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// AVIF dimensions from the container metadata (no AV1 decode needed).
fn read_avif(file: &Path) -> LoadOutcome {
    let data = match std::fs::read(file) {
        Ok(d) => d,
        Err(e) => return LoadOutcome::failed(e.to_string()),
    };
    let avif = match avif_parse::read_avif(&mut std::io::Cursor::new(&data)) {
        Ok(a) => a,
        Err(e) => return LoadOutcome::failed(format!("invalid AVIF: {e:?}")),
    };
    match avif.primary_item_metadata() {
        Ok(meta) => LoadOutcome::Loaded {
            dimensions: Some(Dimensions {
                width: meta.max_frame_width.get(),
                height: meta.max_frame_height.get(),
            }),
        },
        // Container is valid; only the sequence header is unreadable.
        Err(e) => {
            log::debug!("{}: AVIF metadata not readable ({e:?})", file.display());
            LoadOutcome::Loaded { dimensions: None }
        }
    }
}

/// SVG is text: it loads if the file is readable and holds an `<svg` element.
fn read_svg(file: &Path) -> LoadOutcome {
    match std::fs::read_to_string(file) {
        Ok(text) if text.contains("<svg") => LoadOutcome::Loaded { dimensions: None },
        Ok(_) => LoadOutcome::failed("not an SVG document"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => LoadOutcome::failed("file not found"),
        Err(e) => LoadOutcome::failed(e.to_string()),
    }
}

/// Progress message sent as each probe in a batch finishes.
#[derive(Debug, Clone)]
pub struct ProbeEvent {
    /// Position of the path in the batch.
    pub slot: usize,
    pub path: PhotoPath,
    pub loaded: bool,
}

/// Probe every path in parallel. The returned outcomes line up with `paths`.
pub fn probe_all(
    probe: &impl ImageProbe,
    paths: &[PhotoPath],
    events: Option<Sender<ProbeEvent>>,
) -> Vec<LoadOutcome> {
    paths
        .par_iter()
        .enumerate()
        .map_with(events, |events, (slot, path)| {
            let outcome = probe.probe(path);
            if let Some(tx) = events {
                tx.send(ProbeEvent {
                    slot,
                    path: path.clone(),
                    loaded: outcome.is_loaded(),
                })
                .ok();
            }
            outcome
        })
        .collect()
}
