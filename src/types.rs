//! Shared value types used by every layer (state, storage, rendering, export).

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Returned by [`PhotoPath::parse`] when the input is blank.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("path is empty")]
pub struct EmptyPath;

/// A string identifying an image resource: relative path, absolute path or URL.
///
/// The only validation is that the trimmed value is non-empty. Whether the
/// path actually points at an image is decided later by a probe
/// ([`crate::probe`]), never by this type.
///
/// Serialized transparently as a JSON string so the persisted list is a plain
/// array of strings. There is no `Deserialize`: every value comes through
/// [`PhotoPath::parse`], including those read back by [`crate::store`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PhotoPath(String);

impl PhotoPath {
    /// Trim surrounding whitespace and reject empty input.
    ///
    /// - `"cat.jpg"` → `cat.jpg`
    /// - `"  photos/cat.jpg \n"` → `photos/cat.jpg`
    /// - `"   "` → `Err(EmptyPath)`
    pub fn parse(input: &str) -> Result<Self, EmptyPath> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EmptyPath);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `scheme://` URLs and `data:` URIs.
    pub fn is_url(&self) -> bool {
        self.0.starts_with("data:")
            || self
                .0
                .split_once("://")
                .is_some_and(|(scheme, _)| !scheme.is_empty() && scheme.chars().all(is_scheme_char))
    }
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

impl fmt::Display for PhotoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhotoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pixel size reported by a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}
