//! Gallery configuration.
//!
//! Handles loading, validating, and merging `photo-shelf.toml`. The file is
//! optional and sparse: stock defaults are the base layer and any key in the
//! user file overrides it.
//!
//! ## Config File Location
//!
//! ```text
//! my-gallery/
//! ├── photo-shelf.toml     # optional
//! ├── .photo-shelf/        # saved photo list (autosave)
//! └── photos/...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! title = "Photo Gallery"
//! lang = "en"
//! dedupe = true                 # reject paths already in the gallery
//! autosave = true               # save after every add/remove
//! storage_key = "photoGallery"  # saved as .photo-shelf/<key>.json
//! empty_text = "No photos yet"
//! alt_text = "Gallery photo"
//!
//! [export]
//! filename = "gallery_export.html"
//! # stylesheet_href = "style.css"  # link instead of inlining CSS
//!
//! [probe]
//! trust_remote = true           # http(s)/data: paths count as loaded
//! # max_probes = 4              # parallel probes (omit for CPU cores)
//!
//! [theme]
//! card_min_width = "250px"
//! card_gap = "1rem"
//! page_padding = "2rem"
//!
//! [colors.light]
//! background = "#f5f5f5"
//! ...
//! ```
//!
//! ## Manual-save setup
//!
//! The overwrite-in-place workflow (duplicates allowed, nothing saved between
//! runs, export replaces the gallery's `index.html`) is three keys:
//!
//! ```toml
//! [gallery]
//! dedupe = false
//! autosave = false
//!
//! [export]
//! filename = "index.html"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file inside the gallery directory.
pub const CONFIG_FILENAME: &str = "photo-shelf.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `photo-shelf.toml`.
///
/// All fields have defaults; user files only list what they change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShelfConfig {
    /// Gallery behaviour and page text.
    pub gallery: GalleryConfig,
    /// Static export settings.
    pub export: ExportConfig,
    /// Image probe settings.
    pub probe: ProbeConfig,
    /// Layout settings.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl ShelfConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.storage_key.is_empty()
            || !self
                .gallery
                .storage_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ConfigError::Validation(
                "gallery.storage_key must be non-empty and use only letters, digits, '-', '_' or '.'"
                    .into(),
            ));
        }
        if self.export.filename.trim().is_empty()
            || self.export.filename.contains(['/', '\\'])
        {
            return Err(ConfigError::Validation(
                "export.filename must be a plain file name".into(),
            ));
        }
        if self.probe.max_probes == Some(0) {
            return Err(ConfigError::Validation(
                "probe.max_probes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Page and heading title.
    pub title: String,
    /// `lang` attribute of generated documents.
    pub lang: String,
    /// Reject paths that are already tracked.
    pub dedupe: bool,
    /// Save the list after every successful add/remove.
    pub autosave: bool,
    /// Storage key for the saved list.
    pub storage_key: String,
    /// Placeholder text for an empty gallery.
    pub empty_text: String,
    /// `alt` text on every photo.
    pub alt_text: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Photo Gallery".to_string(),
            lang: "en".to_string(),
            dedupe: true,
            autosave: true,
            storage_key: "photoGallery".to_string(),
            empty_text: "No photos yet".to_string(),
            alt_text: "Gallery photo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// File written by `export`, inside the gallery directory.
    pub filename: String,
    /// When set, exported pages link this stylesheet instead of inlining CSS.
    pub stylesheet_href: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: "gallery_export.html".to_string(),
            stylesheet_href: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Maximum number of parallel probes.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_probes: Option<usize>,
    /// Treat `http(s)://` and `data:` paths as loaded without checking them.
    pub trust_remote: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_probes: None,
            trust_remote: true,
        }
    }
}

/// Resolve the effective probe thread count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProbeConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_probes.map(|n| n.min(cores)).unwrap_or(cores)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Minimum card width before the grid wraps (CSS value).
    pub card_min_width: String,
    /// Gap between cards (CSS value).
    pub card_gap: String,
    /// Padding around the page content (CSS value).
    pub page_padding: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            card_min_width: "250px".to_string(),
            card_gap: "1rem".to_string(),
            page_padding: "2rem".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Primary text.
    pub text: String,
    /// Path labels and placeholder text.
    pub text_muted: String,
    /// Card border.
    pub border: String,
    /// Card background.
    pub card: String,
    /// Delete buttons and error messages.
    pub accent: String,
    /// Success messages.
    pub success: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f5f5f5".to_string(),
            text: "#222222".to_string(),
            text_muted: "#666666".to_string(),
            border: "#dddddd".to_string(),
            card: "#ffffff".to_string(),
            accent: "#e74c3c".to_string(),
            success: "#2e7d32".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            card: "#1e1e1e".to_string(),
            accent: "#ff6b5b".to_string(),
            success: "#81c784".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ShelfConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `photo-shelf.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the base, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ShelfConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ShelfConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the gallery config from `dir`, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<ShelfConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `photo-shelf.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-shelf configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Place this file at <gallery>/photo-shelf.toml.

# ---------------------------------------------------------------------------
# Gallery behaviour
# ---------------------------------------------------------------------------
[gallery]
# Page and heading title.
title = "Photo Gallery"

# lang attribute of generated pages.
lang = "en"

# Reject paths that are already in the gallery.
# Set to false to allow the same photo more than once.
dedupe = true

# Save the list after every add/remove (.photo-shelf/<storage_key>.json).
# Set to false to keep the list only for the running session.
autosave = true

# Name of the saved list.
storage_key = "photoGallery"

# Shown when the gallery has no photos.
empty_text = "No photos yet"

# alt text on every photo.
alt_text = "Gallery photo"

# ---------------------------------------------------------------------------
# Static export
# ---------------------------------------------------------------------------
[export]
# File written by `photo-shelf export`, inside the gallery directory.
# Use "index.html" to replace the gallery's entry page in place.
filename = "gallery_export.html"

# Link a stylesheet instead of inlining the generated CSS.
# stylesheet_href = "style.css"

# ---------------------------------------------------------------------------
# Image probing
# ---------------------------------------------------------------------------
[probe]
# http(s):// and data: paths cannot be checked locally.
# true = accept them as loaded, false = report them as not found.
trust_remote = true

# Maximum parallel probes.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_probes = 4

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[theme]
# Minimum card width before the grid wraps.
card_min_width = "250px"

# Gap between cards.
card_gap = "1rem"

# Padding around the page content.
page_padding = "2rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f5f5f5"
text = "#222222"
text_muted = "#666666"    # Path labels, placeholder
border = "#dddddd"
card = "#ffffff"
accent = "#e74c3c"        # Delete buttons, errors
success = "#2e7d32"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
card = "#1e1e1e"
accent = "#ff6b5b"
success = "#81c784"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-card: {light_card};
    --color-accent: {light_accent};
    --color-success: {light_success};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-card: {dark_card};
        --color-accent: {dark_accent};
        --color-success: {dark_success};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_card = colors.light.card,
        light_accent = colors.light.accent,
        light_success = colors.light.success,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_card = colors.dark.card,
        dark_accent = colors.dark.accent,
        dark_success = colors.dark.success,
    )
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --card-min-width: {card_min_width};
    --card-gap: {card_gap};
    --page-padding: {page_padding};
}}"#,
        card_min_width = theme.card_min_width,
        card_gap = theme.card_gap,
        page_padding = theme.page_padding,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_autosaving_and_deduped() {
        let config = ShelfConfig::default();
        assert!(config.gallery.dedupe);
        assert!(config.gallery.autosave);
        assert_eq!(config.gallery.storage_key, "photoGallery");
        assert_eq!(config.export.filename, "gallery_export.html");
        assert_eq!(config.export.stylesheet_href, None);
        assert!(config.probe.trust_remote);
    }

    #[test]
    fn default_config_validates() {
        ShelfConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[gallery]
title = "Cats"

[colors.light]
background = "#fafafa"
"##;
        let config: ShelfConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.gallery.title, "Cats");
        assert_eq!(config.colors.light.background, "#fafafa");
        // Defaults preserved
        assert_eq!(config.colors.light.text, "#222222");
        assert!(config.gallery.dedupe);
        assert_eq!(config.export.filename, "gallery_export.html");
    }

    #[test]
    fn manual_save_setup() {
        let toml = r#"
[gallery]
dedupe = false
autosave = false

[export]
filename = "index.html"
"#;
        let config: ShelfConfig = toml::from_str(toml).unwrap();
        assert!(!config.gallery.dedupe);
        assert!(!config.gallery.autosave);
        assert_eq!(config.export.filename, "index.html");
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r#"
[gallery]
titel = "typo"
"#;
        assert!(toml::from_str::<ShelfConfig>(toml).is_err());
    }

    #[test]
    fn validation_rejects_bad_storage_key() {
        let mut config = ShelfConfig::default();
        config.gallery.storage_key = "../escape".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_export_path() {
        let mut config = ShelfConfig::default();
        config.export.filename = "out/gallery.html".into();
        assert!(config.validate().is_err());
        config.export.filename = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_probes() {
        let mut config = ShelfConfig::default();
        config.probe.max_probes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProbeConfig {
            max_probes: Some(10_000),
            trust_remote: true,
        };
        assert_eq!(effective_threads(&config), cores);
        assert_eq!(effective_threads(&ProbeConfig::default()), cores);
        let one = ProbeConfig {
            max_probes: Some(1),
            trust_remote: true,
        };
        assert_eq!(effective_threads(&one), 1);
    }

    // =========================================================================
    // merge / load
    // =========================================================================

    #[test]
    fn merge_overlay_wins_and_base_survives() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.gallery.title, "Photo Gallery");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[gallery]
title = "Holiday"

[probe]
max_probes = 2
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.gallery.title, "Holiday");
        assert_eq!(config.probe.max_probes, Some(2));
        assert_eq!(config.gallery.storage_key, "photoGallery");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[gallery\ntitle=").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_runs_validation() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[export]\nfilename = \"a/b.html\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: ShelfConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = ShelfConfig::default();
        assert_eq!(config.gallery.title, defaults.gallery.title);
        assert_eq!(config.export.filename, defaults.export.filename);
        assert_eq!(config.colors.dark.accent, defaults.colors.dark.accent);
        assert_eq!(config.theme.card_gap, defaults.theme.card_gap);
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
    }

    #[test]
    fn generate_theme_css_uses_values() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--card-min-width: 250px"));
        assert!(css.contains("--card-gap: 1rem"));
    }
}
