//! End-to-end tests driving the built `photo-shelf` binary against a temp
//! gallery directory.
//!
//! Run with: cargo test --test cli

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_photo-shelf")
}

fn write_png(dir: &Path, rel: &str) {
    let target = dir.join(rel);
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    image::RgbImage::from_pixel(4, 3, image::Rgb([200, 100, 50]))
        .save_with_format(&target, image::ImageFormat::Png)
        .unwrap();
}

fn gallery(images: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for rel in images {
        write_png(tmp.path(), rel);
    }
    tmp
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .arg("--dir")
        .arg(dir)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

fn run_with_input(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(bin())
        .arg("--dir")
        .arg(dir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn saved(dir: &Path) -> Vec<String> {
    let raw = std::fs::read_to_string(dir.join(".photo-shelf/photoGallery.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =========================================================================
// Keeper setup (default config)
// =========================================================================

#[test]
fn add_saves_only_loadable_photos() {
    let tmp = gallery(&["photos/a.png", "photos/b.png"]);
    let out = run(
        tmp.path(),
        &["add", "photos/a.png", "photos/missing.png", "photos/b.png"],
    );
    assert!(out.status.success());

    let text = stdout(&out);
    assert!(text.contains("Photo added: photos/a.png"));
    assert!(text.contains("error: photo could not be loaded: photos/missing.png"));
    assert_eq!(saved(tmp.path()), ["photos/a.png", "photos/b.png"]);
}

#[test]
fn duplicate_add_is_rejected() {
    let tmp = gallery(&["a.png"]);
    run(tmp.path(), &["add", "a.png"]);
    let out = run(tmp.path(), &["add", "a.png"]);

    assert!(stdout(&out).contains("error: photo is already in the gallery: a.png"));
    assert_eq!(saved(tmp.path()), ["a.png"]);
}

#[test]
fn list_and_remove() {
    let tmp = gallery(&["a.png", "b.png"]);
    run(tmp.path(), &["add", "a.png", "b.png"]);

    let listed = stdout(&run(tmp.path(), &["list"]));
    assert!(listed.contains("Gallery (2 photos)"));
    assert!(listed.contains("001 a.png"));
    assert!(listed.contains("002 b.png"));

    let out = run(tmp.path(), &["remove", "a.png"]);
    assert!(stdout(&out).contains("Photo removed: a.png"));
    assert_eq!(saved(tmp.path()), ["b.png"]);
}

#[test]
fn list_check_flags_photos_that_disappeared() {
    let tmp = gallery(&["a.png", "b.png"]);
    run(tmp.path(), &["add", "a.png", "b.png"]);
    std::fs::remove_file(tmp.path().join("b.png")).unwrap();

    let listed = stdout(&run(tmp.path(), &["list", "--check"]));
    assert!(listed.contains("001 a.png  4x3"));
    assert!(listed.contains("002 b.png  not found"));
    assert!(listed.contains("error: photo could not be loaded: b.png"));
    // Still tracked: restore never drops paths.
    assert_eq!(saved(tmp.path()), ["a.png", "b.png"]);
}

#[test]
fn export_writes_static_gallery() {
    let tmp = gallery(&["a.png", "b.png"]);
    run(tmp.path(), &["add", "a.png", "b.png"]);
    let out = run(tmp.path(), &["export"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Exported 2 photos"));

    let html = std::fs::read_to_string(tmp.path().join("gallery_export.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("<img ").count(), 2);
    assert!(html.find(r#"src="a.png""#).unwrap() < html.find(r#"src="b.png""#).unwrap());
}

#[test]
fn export_of_empty_gallery_has_placeholder() {
    let tmp = gallery(&[]);
    let out_file = tmp.path().join("out.html");
    run(tmp.path(), &["export", "--output", out_file.to_str().unwrap()]);

    let html = std::fs::read_to_string(out_file).unwrap();
    assert!(html.contains("No photos yet"));
    assert!(!html.contains("<img"));
}

#[test]
fn clear_needs_confirmation() {
    let tmp = gallery(&["a.png"]);
    run(tmp.path(), &["add", "a.png"]);

    let out = run_with_input(tmp.path(), &["clear"], "n\n");
    assert!(stdout(&out).contains("Clear cancelled"));
    assert_eq!(saved(tmp.path()), ["a.png"]);

    let out = run(tmp.path(), &["clear", "--yes"]);
    assert!(stdout(&out).contains("Gallery cleared"));
    assert!(!tmp.path().join(".photo-shelf/photoGallery.json").exists());
}

#[test]
fn corrupt_saved_list_starts_empty_with_notice() {
    let tmp = gallery(&["a.png"]);
    std::fs::create_dir_all(tmp.path().join(".photo-shelf")).unwrap();
    std::fs::write(tmp.path().join(".photo-shelf/photoGallery.json"), "{oops").unwrap();

    let out = run(tmp.path(), &["list"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("saved gallery could not be read"));
    assert!(text.contains("Gallery (0 photos)"));

    run(tmp.path(), &["add", "a.png"]);
    assert_eq!(saved(tmp.path()), ["a.png"]);
}

#[test]
fn add_folder_imports_images_only() {
    let tmp = gallery(&["photos/holiday/1.png", "photos/holiday/beach/2.png"]);
    std::fs::write(tmp.path().join("photos/holiday/notes.txt"), "hi").unwrap();
    let folder = tmp.path().join("photos/holiday");

    let out = run(
        tmp.path(),
        &[
            "add-folder",
            folder.to_str().unwrap(),
            "--prefix",
            "photos/holiday/",
        ],
    );
    assert!(stdout(&out).contains("2 photos imported"));
    assert_eq!(
        saved(tmp.path()),
        ["photos/holiday/1.png", "photos/holiday/beach/2.png"]
    );
}

#[test]
fn preview_shows_not_found_cards() {
    let tmp = gallery(&["a.png", "b.png"]);
    run(tmp.path(), &["add", "a.png", "b.png"]);
    std::fs::remove_file(tmp.path().join("b.png")).unwrap();

    let out = run(tmp.path(), &["preview"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("error: photo could not be loaded: b.png"));
    let html = std::fs::read_to_string(tmp.path().join(".photo-shelf/preview.html")).unwrap();
    assert!(html.contains(r#"src="a.png""#));
    assert!(html.contains("Photo could not be loaded"));
    assert!(html.contains("photo could not be loaded: b.png"));
    assert_eq!(saved(tmp.path()), ["a.png", "b.png"]);
}

// =========================================================================
// Manual setup
// =========================================================================

fn manual_gallery(images: &[&str]) -> TempDir {
    let tmp = gallery(images);
    std::fs::write(
        tmp.path().join("photo-shelf.toml"),
        "[gallery]\ndedupe = false\nautosave = false\n\n[export]\nfilename = \"index.html\"\n",
    )
    .unwrap();
    tmp
}

#[test]
fn build_exports_over_index_with_instruction() {
    let tmp = manual_gallery(&["a.png"]);
    let out = run(tmp.path(), &["build", "a.png", "a.png", "gone.png"]);
    assert!(out.status.success());

    let text = stdout(&out);
    assert!(text.contains("Replace the gallery's original index.html"));
    let html = std::fs::read_to_string(tmp.path().join("index.html")).unwrap();
    assert_eq!(html.matches(r#"<img src="a.png""#).count(), 2);
    assert!(!html.contains("gone.png"));
    assert!(!tmp.path().join(".photo-shelf").exists());
}

#[test]
fn saved_list_commands_refuse_without_autosave() {
    let tmp = manual_gallery(&["a.png"]);
    let out = run(tmp.path(), &["add", "a.png"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("gallery.autosave is off"));
}

#[test]
fn session_round_trip() {
    let tmp = manual_gallery(&["a.png"]);
    let out = run_with_input(
        tmp.path(),
        &["session"],
        "add a.png\nadd a.png\nlist\nexport\nquit\n",
    );
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("002 a.png  4x3"));
    assert!(text.contains("Exported 2 photos"));
    assert!(tmp.path().join("index.html").exists());
}

// =========================================================================
// Config
// =========================================================================

#[test]
fn gen_config_prints_parseable_stock_file() {
    let tmp = gallery(&[]);
    let out = run(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("[gallery]"));
    assert!(text.contains("storage_key = \"photoGallery\""));

    std::fs::write(tmp.path().join("photo-shelf.toml"), &text).unwrap();
    assert!(run(tmp.path(), &["list"]).status.success());
}

#[test]
fn invalid_config_fails() {
    let tmp = gallery(&[]);
    std::fs::write(tmp.path().join("photo-shelf.toml"), "[gallery]\ntitel = \"x\"\n").unwrap();
    assert!(!run(tmp.path(), &["list"]).status.success());
}
