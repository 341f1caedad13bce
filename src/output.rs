//! CLI output formatting.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Gallery (3 photos)
//! 001 cats/tom.jpg
//! 002 cats/felix.png
//! 003 https://example.com/dog.jpg
//! ```
//!
//! With `--check`, each line carries its probe result:
//!
//! ```text
//! 001 cats/tom.jpg  640x480
//! 002 cats/felix.png  not found (file not found)
//! 003 https://example.com/dog.jpg  remote
//! ```
//!
//! ## Notices
//!
//! ```text
//! Photo added: cats/tom.jpg
//! error: photo is already in the gallery: cats/tom.jpg
//! ```
//!
//! ## Export
//!
//! ```text
//! Exported 3 photos → ./gallery_export.html
//! ```
//!
//! # Architecture
//!
//! Every shape has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::board::Notice;
use crate::probe::{LoadOutcome, ProbeEvent};
use crate::render::Card;
use crate::types::PhotoPath;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn photo_count(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{n} photos")
    }
}

// ============================================================================
// List
// ============================================================================

/// Numbered list of tracked paths under a count header.
pub fn format_paths(paths: &[PhotoPath]) -> Vec<String> {
    let mut lines = vec![format!("Gallery ({})", photo_count(paths.len()))];
    lines.extend(
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {}", format_index(i + 1), p)),
    );
    lines
}

fn outcome_label(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Loaded {
            dimensions: Some(d),
        } => format!("{}x{}", d.width, d.height),
        LoadOutcome::Loaded { dimensions: None } => "remote".to_string(),
        LoadOutcome::Failed { reason } => format!("not found ({reason})"),
    }
}

/// Numbered list of cards with their probe results.
pub fn format_cards(cards: &[Card]) -> Vec<String> {
    let mut lines = vec![format!("Gallery ({})", photo_count(cards.len()))];
    lines.extend(cards.iter().enumerate().map(|(i, card)| {
        format!(
            "{} {}  {}",
            format_index(i + 1),
            card.path,
            outcome_label(&card.outcome)
        )
    }));
    lines
}

// ============================================================================
// Notices and progress
// ============================================================================

/// One line per notice; errors are prefixed so they stand out.
pub fn format_notices(notices: &[Notice]) -> Vec<String> {
    notices
        .iter()
        .map(|n| {
            if n.is_error() {
                format!("error: {n}")
            } else {
                n.to_string()
            }
        })
        .collect()
}

/// Progress line for one finished probe.
pub fn format_probe_event(event: &ProbeEvent) -> Vec<String> {
    let status = if event.loaded { "ok" } else { "not found" };
    vec![format!("    {} {}: {}", format_index(event.slot + 1), event.path, status)]
}

// ============================================================================
// Export
// ============================================================================

/// Summary after writing an export. When the file is meant to replace the
/// gallery's entry page, the user is told to do so.
pub fn format_export_summary(count: usize, target: &Path, replaces_entry: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "Exported {} → {}",
        photo_count(count),
        target.display()
    )];
    if replaces_entry {
        lines.push(
            "Replace the gallery's original index.html with this file to publish the changes."
                .to_string(),
        );
    }
    lines
}

// ============================================================================
// Print wrappers
// ============================================================================

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_paths(paths: &[PhotoPath]) {
    print_lines(&format_paths(paths));
}

pub fn print_cards(cards: &[Card]) {
    print_lines(&format_cards(cards));
}

pub fn print_notices(notices: &[Notice]) {
    print_lines(&format_notices(notices));
}

pub fn print_export_summary(count: usize, target: &Path, replaces_entry: bool) {
    print_lines(&format_export_summary(count, target, replaces_entry));
}
