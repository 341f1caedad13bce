//! The authoritative, ordered list of photo paths.
//!
//! [`GalleryState`] enforces the duplicate policy and, when a [`PathStore`]
//! is attached, persists itself after every successful mutation. It knows
//! nothing about probing or rendering: deciding *whether* a path should be
//! committed is the board's job ([`crate::board`]).
//!
//! | Policy | `add` of a present path | Typical setup |
//! |---|---|---|
//! | [`DuplicatePolicy::Reject`] | `Err(AlreadyExists)`, no mutation | autosaving gallery |
//! | [`DuplicatePolicy::Allow`] | appended again | in-memory session |

use crate::store::{PathStore, StoreError};
use crate::types::PhotoPath;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    #[error("photo is already in the gallery: {0}")]
    AlreadyExists(PhotoPath),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Paths are unique (case-sensitive exact match).
    Reject,
    /// The same path may appear any number of times.
    Allow,
}

impl DuplicatePolicy {
    pub fn from_dedupe(dedupe: bool) -> Self {
        if dedupe { Self::Reject } else { Self::Allow }
    }
}

#[derive(Debug)]
pub struct GalleryState {
    paths: Vec<PhotoPath>,
    policy: DuplicatePolicy,
    store: Option<PathStore>,
}

impl GalleryState {
    /// An empty gallery that is never persisted.
    pub fn in_memory(policy: DuplicatePolicy) -> Self {
        Self {
            paths: Vec::new(),
            policy,
            store: None,
        }
    }

    /// An empty gallery that saves to `store` after every successful
    /// add/remove. Call [`restore`](Self::restore) to pick up what was saved.
    pub fn autosaving(policy: DuplicatePolicy, store: PathStore) -> Self {
        Self {
            paths: Vec::new(),
            policy,
            store: Some(store),
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn is_autosaving(&self) -> bool {
        self.store.is_some()
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Returns the number of restored paths. Under [`DuplicatePolicy::Reject`]
    /// later duplicates in the saved data are dropped. On any error the
    /// gallery is left empty; the caller decides how to report it.
    pub fn restore(&mut self) -> Result<usize, StoreError> {
        self.paths.clear();
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let loaded = store.load()?;
        for path in loaded {
            if self.policy == DuplicatePolicy::Reject && self.paths.contains(&path) {
                log::warn!("skipping duplicate saved path: {path}");
                continue;
            }
            self.paths.push(path);
        }
        Ok(self.paths.len())
    }

    /// Append `path` at the end.
    pub fn add(&mut self, path: PhotoPath) -> Result<(), GalleryError> {
        if self.policy == DuplicatePolicy::Reject && self.contains(&path) {
            return Err(GalleryError::AlreadyExists(path));
        }
        self.paths.push(path);
        self.persist();
        Ok(())
    }

    /// Remove the first occurrence of `path`. Returns `false` (and changes
    /// nothing) when the path is not tracked.
    pub fn remove(&mut self, path: &PhotoPath) -> bool {
        let Some(index) = self.paths.iter().position(|p| p == path) else {
            return false;
        };
        self.paths.remove(index);
        self.persist();
        true
    }

    /// Empty the gallery and delete the persisted list. Irreversible; callers
    /// confirm with the user first.
    pub fn clear(&mut self) {
        self.paths.clear();
        if let Some(store) = &mut self.store
            && let Err(e) = store.clear()
        {
            log::warn!("could not remove saved gallery '{}': {e}", store.key());
        }
    }

    pub fn contains(&self, path: &PhotoPath) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhotoPath> {
        self.paths.iter()
    }

    /// Ordered copy of the current list, for rendering and export.
    pub fn snapshot(&self) -> Vec<PhotoPath> {
        self.paths.clone()
    }

    /// Best-effort save; failures are logged, never surfaced.
    fn persist(&mut self) {
        if let Some(store) = &mut self.store
            && let Err(e) = store.save(&self.paths)
        {
            log::warn!("could not save gallery '{}': {e}", store.key());
        }
    }
}
