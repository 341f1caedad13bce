//! # Photo Shelf
//!
//! Keeps an ordered list of photo paths for a gallery directory, checks that
//! each path really loads as an image, and exports the list as a
//! self-contained static HTML page.
//!
//! # Flow
//!
//! ```text
//! input (CLI / session line)
//!   → Board::submit        parse, duplicate check
//!   → probe_all            parallel image probes (rayon)
//!   → continuation         card + commit on load, in submission order
//!   → GalleryState::add    autosave → .photo-shelf/<key>.json
//!
//! export: GalleryState::snapshot → export_document → <gallery>/<filename>
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `PhotoPath` newtype and image `Dimensions` |
//! | [`gallery`] | Ordered path list with duplicate policy and autosave |
//! | [`store`] | Key/value storage and the JSON-array `PathStore` |
//! | [`probe`] | `ImageProbe` trait, filesystem probe, parallel `probe_all` |
//! | [`render`] | Card markup and the shared document skeleton (Maud) |
//! | [`export`] | Static HTML export of a path list |
//! | [`board`] | Owner of the state for a run; load-gated commits and notices |
//! | [`folder`] | Folder import: media-type filter and relative paths |
//! | [`session`] | Interactive line-oriented command loop |
//! | [`config`] | `photo-shelf.toml` loading, merging, validation, CSS generation |
//! | [`output`] | CLI output formatting |
//!
//! # Setups
//!
//! The same code covers two ways of working, chosen in config:
//!
//! - **Keeper** (default): duplicates rejected, list saved after every change,
//!   export to `gallery_export.html`.
//! - **Manual**: duplicates allowed, nothing saved between runs, export to
//!   `index.html` which then replaces the original page.
//!
//! See [`config`] for the keys.

pub mod board;
pub mod config;
pub mod export;
pub mod folder;
pub mod gallery;
pub mod output;
pub mod probe;
pub mod render;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
