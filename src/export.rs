//! Static HTML export of the gallery.
//!
//! [`export_document`] turns an ordered list of paths into a complete,
//! self-contained HTML document that shows the gallery without any editing
//! controls. It is a pure function: the same list and options always produce
//! byte-identical output, and nothing is probed (the export is a frozen
//! snapshot of what the gallery tracks).
//!
//! ## Document shape
//!
//! ```text
//! <!DOCTYPE html>
//! html
//! ├── head: title, stylesheet (inline or linked)
//! └── body.export
//!     ├── div.container
//!     │   ├── h1 TITLE
//!     │   └── div.gallery#photo-gallery
//!     │       └── div.photo-card × N   (or p.empty-gallery when N = 0)
//!     ├── script#photo-paths type=application/json   ["a.jpg","b.png"]
//!     └── script   delete buttons remove their own card, nothing else
//! ```
//!
//! Paths are escaped in the `src` attribute and in the visible label. The
//! embedded JSON escapes `<`, `>` and `&` so a path containing `</script>`
//! cannot end the script element early.

use crate::render::{PageOptions, base_document, empty_placeholder};
use crate::types::PhotoPath;
use maud::{Markup, PreEscaped, html};

const JS: &str = include_str!("../static/gallery.js");

/// Filename the manual-save workflow writes over.
pub const ENTRY_DOCUMENT: &str = "index.html";

/// Build the exported document.
pub fn export_document(paths: &[PhotoPath], options: &PageOptions) -> String {
    render_export(paths, options).into_string()
}

/// `true` when exporting under `filename` is meant to replace the original
/// entry document, so the user should be told to overwrite it.
pub fn replaces_entry_document(filename: &str) -> bool {
    filename == ENTRY_DOCUMENT
}

fn render_export(paths: &[PhotoPath], options: &PageOptions) -> Markup {
    let content = html! {
        div.container {
            h1 { (options.title) }
            div.gallery #photo-gallery data-empty-text=(options.empty_text) {
                @if paths.is_empty() {
                    (empty_placeholder(&options.empty_text))
                }
                @for path in paths {
                    (export_card(path, &options.alt_text))
                }
            }
        }
        script id="photo-paths" type="application/json" { (PreEscaped(embedded_json(paths))) }
        script { (PreEscaped(JS)) }
    };
    base_document(options, Some("export"), content)
}

/// Card without `data-path`: the export's delete buttons only remove the card
/// they sit in.
fn export_card(path: &PhotoPath, alt: &str) -> Markup {
    html! {
        div.photo-card {
            img src=(path.as_str()) alt=(alt) loading="lazy";
            div.photo-info {
                div.photo-path { (path.as_str()) }
                button.delete-btn type="button" aria-label="Remove photo" { "×" }
            }
        }
    }
}

/// JSON array of the paths, safe to place inside a `<script>` element.
fn embedded_json(paths: &[PhotoPath]) -> String {
    // Serializing a slice of strings cannot fail.
    let json = serde_json::to_string(paths).unwrap_or_else(|_| "[]".to_string());
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}
