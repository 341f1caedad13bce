//! Card and document markup.
//!
//! Everything here returns maud [`Markup`]; interpolated paths are escaped for
//! the attribute or text context they land in, so a path like
//! `a"b<c>.jpg` can never break the surrounding document.
//!
//! ## Card shapes
//!
//! Loaded:
//!
//! ```text
//! div.photo-card
//! ├── img src=PATH alt=ALT
//! └── div.photo-info
//!     ├── div.photo-path  PATH
//!     └── button.delete-btn data-path=PATH  ×
//! ```
//!
//! Failed (same info block, no image, plus a "could not be loaded" label):
//!
//! ```text
//! div.photo-card.not-found
//! └── div.photo-info
//!     ├── strong  Photo could not be loaded
//!     ├── div.photo-path  PATH
//!     └── button.delete-btn data-path=PATH  ×
//! ```
//!
//! The board document ([`board_document`]) is the live, editable view; the
//! static export is built in [`crate::export`] on the same skeleton
//! ([`base_document`]).

use crate::config::{self, ShelfConfig};
use crate::probe::LoadOutcome;
use crate::types::PhotoPath;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// A rendered slot: one path and the outcome of its own probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub path: PhotoPath,
    pub outcome: LoadOutcome,
}

/// How the document pulls in its styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stylesheet {
    Inline(String),
    Linked(String),
}

/// Page-level settings shared by the board and the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub title: String,
    pub lang: String,
    pub alt_text: String,
    pub empty_text: String,
    pub stylesheet: Stylesheet,
}

impl PageOptions {
    pub fn from_config(config: &ShelfConfig) -> Self {
        let stylesheet = match &config.export.stylesheet_href {
            Some(href) => Stylesheet::Linked(href.clone()),
            None => Stylesheet::Inline(full_css(config)),
        };
        Self {
            title: config.gallery.title.clone(),
            lang: config.gallery.lang.clone(),
            alt_text: config.gallery.alt_text.clone(),
            empty_text: config.gallery.empty_text.clone(),
            stylesheet,
        }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::from_config(&ShelfConfig::default())
    }
}

/// Generated custom properties followed by the static stylesheet.
pub fn full_css(config: &ShelfConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

/// Renders the base HTML document structure
pub fn base_document(options: &PageOptions, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(options.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (options.title) }
                @match &options.stylesheet {
                    Stylesheet::Inline(css) => {
                        style { (PreEscaped(css)) }
                    }
                    Stylesheet::Linked(href) => {
                        link rel="stylesheet" href=(href);
                    }
                }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Placeholder shown instead of an empty grid.
pub fn empty_placeholder(text: &str) -> Markup {
    html! {
        p.empty-gallery { (text) }
    }
}

/// Path label plus delete control, shared by every card shape.
fn photo_info(path: &PhotoPath, not_found: bool) -> Markup {
    html! {
        div.photo-info {
            @if not_found {
                strong { "Photo could not be loaded" }
            }
            div.photo-path { (path.as_str()) }
            button.delete-btn type="button" data-path=(path.as_str()) aria-label="Remove photo" { "×" }
        }
    }
}

/// Card for a path whose probe succeeded.
pub fn loaded_card(path: &PhotoPath, alt: &str) -> Markup {
    html! {
        div.photo-card {
            img src=(path.as_str()) alt=(alt) loading="lazy";
            (photo_info(path, false))
        }
    }
}

/// Card for a path whose probe failed.
pub fn not_found_card(path: &PhotoPath) -> Markup {
    html! {
        div.photo-card.not-found {
            (photo_info(path, true))
        }
    }
}

/// Render one card according to its own probe outcome.
pub fn render_card(card: &Card, alt: &str) -> Markup {
    match &card.outcome {
        LoadOutcome::Loaded { .. } => loaded_card(&card.path, alt),
        LoadOutcome::Failed { .. } => not_found_card(&card.path),
    }
}

/// The live board: every card in order, plus any pending messages.
///
/// `errors` and `successes` are shown above the grid the way the editing page
/// shows its inline message lines.
pub fn board_document(
    cards: &[Card],
    errors: &[String],
    successes: &[String],
    options: &PageOptions,
) -> Markup {
    let content = html! {
        div.container {
            h1 { (options.title) }
            @if !errors.is_empty() {
                div.error #error-message {
                    @for message in errors {
                        p { (message) }
                    }
                }
            }
            @if !successes.is_empty() {
                div.success #success-message {
                    @for message in successes {
                        p { (message) }
                    }
                }
            }
            div.gallery #photo-gallery {
                @if cards.is_empty() {
                    (empty_placeholder(&options.empty_text))
                }
                @for card in cards {
                    (render_card(card, &options.alt_text))
                }
            }
        }
    };
    base_document(options, Some("board"), content)
}
