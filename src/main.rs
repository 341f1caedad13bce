use clap::{Parser, Subcommand};
use photo_shelf::board::{Board, Notice};
use photo_shelf::gallery::{DuplicatePolicy, GalleryState};
use photo_shelf::probe::{FileProbe, ProbeEvent};
use photo_shelf::render::PageOptions;
use photo_shelf::store::{FileStorage, PathStore, STORE_DIR};
use photo_shelf::{config, export, folder, output, session};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

#[derive(Parser)]
#[command(name = "photo-shelf")]
#[command(about = "Keep a list of photo paths and export it as a static HTML gallery")]
#[command(long_about = "\
Keep a list of photo paths and export it as a static HTML gallery

Every path is checked before it is kept: it must load as an image, relative
to the gallery directory (or absolute, or a URL).

Gallery layout:

  my-gallery/
  ├── photo-shelf.toml          # Optional config (see gen-config)
  ├── .photo-shelf/
  │   └── photoGallery.json     # Saved list (autosave)
  ├── gallery_export.html       # Written by `export`
  └── photos/...

Two setups, chosen in photo-shelf.toml:
  keeper (default)  duplicates rejected, list saved after every change
  manual            duplicates allowed, nothing saved; use `build` or `session`
                    and export over index.html

Run 'photo-shelf gen-config' to generate a documented photo-shelf.toml.")]
#[command(version)]
struct Cli {
    /// Gallery directory
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add photos to the saved gallery
    Add {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Add every image found in a folder
    AddFolder {
        folder: PathBuf,
        /// Prepended to each imported path
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Remove a photo from the saved gallery
    Remove { path: String },
    /// Remove every photo and the saved list
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the saved gallery
    List {
        /// Check that every photo still loads
        #[arg(long)]
        check: bool,
    },
    /// Write the static gallery page
    Export {
        /// Defaults to <dir>/<export.filename>
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the editable board view, with not-found cards
    Preview {
        /// Defaults to <dir>/.photo-shelf/preview.html
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check the given photos and export them in one go, ignoring the saved list
    Build {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Defaults to <dir>/<export.filename>
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Interactive session: add, remove, list, export, clear
    Session,
    /// Print a stock photo-shelf.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.dir)?;
    init_thread_pool(&config.probe);
    let options = PageOptions::from_config(&config);

    match cli.command {
        Command::Add { paths } => {
            require_saved_list(&config, "add")?;
            let mut board = open_board(&cli.dir, &config);
            board.restore(None);
            with_progress(|tx| board.submit_batch(&paths, Some(tx)));
            output::print_notices(&board.take_notices());
        }
        Command::AddFolder {
            folder: source,
            prefix,
        } => {
            require_saved_list(&config, "add-folder")?;
            let collected = folder::collect_folder(&source, &prefix)?;
            println!("==> Importing {} from {}", collected.len(), source.display());
            let mut board = open_board(&cli.dir, &config);
            board.restore(None);
            with_progress(|tx| board.import(&collected, Some(tx)));
            output::print_notices(&board.take_notices());
        }
        Command::Remove { path } => {
            require_saved_list(&config, "remove")?;
            let mut board = Board::new(
                restore_quietly(open_state(&cli.dir, &config)),
                FileProbe::new(&cli.dir, config.probe.trust_remote),
            );
            board.remove(&path);
            output::print_notices(&board.take_notices());
        }
        Command::Clear { yes } => {
            require_saved_list(&config, "clear")?;
            if !yes && !confirm_on_stdin("Clear the whole gallery? This cannot be undone. [y/N] ")? {
                println!("Clear cancelled");
                return Ok(());
            }
            let mut board = open_board(&cli.dir, &config);
            board.clear();
            output::print_notices(&board.take_notices());
        }
        Command::List { check } => {
            require_saved_list(&config, "list")?;
            if check {
                let mut board = open_board(&cli.dir, &config);
                board.restore(None);
                output::print_notices(&board.take_notices());
                output::print_cards(board.cards());
            } else {
                let state = restore_quietly(open_state(&cli.dir, &config));
                output::print_paths(&state.snapshot());
            }
        }
        Command::Export { output: target } => {
            require_saved_list(&config, "export")?;
            let state = restore_quietly(open_state(&cli.dir, &config));
            let target = target.unwrap_or_else(|| cli.dir.join(&config.export.filename));
            let html = export::export_document(&state.snapshot(), &options);
            std::fs::write(&target, html)?;
            output::print_export_summary(state.len(), &target, is_entry_document(&target));
        }
        Command::Preview { output: target } => {
            require_saved_list(&config, "preview")?;
            let mut board = open_board(&cli.dir, &config);
            with_progress(|tx| board.restore(Some(tx)));
            let target = target.unwrap_or_else(|| cli.dir.join(STORE_DIR).join("preview.html"));
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // Render first so the page shows the notices too.
            std::fs::write(&target, board.render(&options))?;
            output::print_notices(&board.take_notices());
            println!("Preview → {}", target.display());
        }
        Command::Build {
            paths,
            output: target,
        } => {
            let mut board = Board::new(
                GalleryState::in_memory(DuplicatePolicy::from_dedupe(config.gallery.dedupe)),
                FileProbe::new(&cli.dir, config.probe.trust_remote),
            );
            println!("==> Checking {} photos", paths.len());
            with_progress(|tx| board.submit_batch(&paths, Some(tx)));
            output::print_notices(&board.take_notices());

            let target = target.unwrap_or_else(|| cli.dir.join(&config.export.filename));
            std::fs::write(&target, board.export(&options))?;
            output::print_export_summary(board.state().len(), &target, is_entry_document(&target));
        }
        Command::Session => {
            let mut board = open_board(&cli.dir, &config);
            if board.state().is_autosaving() {
                let restored = board.restore(None);
                println!("Restored {restored} photos");
            }
            output::print_notices(&board.take_notices());
            let context = session::SessionContext {
                dir: cli.dir.clone(),
                export_filename: config.export.filename.clone(),
                options,
            };
            let stdin = std::io::stdin();
            session::run_session(&mut board, &context, stdin.lock(), &mut std::io::stdout())?;
        }
        // Handled before the config is loaded.
        Command::GenConfig => {}
    }

    Ok(())
}

/// Initialize the rayon thread pool based on probe config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(probe: &config::ProbeConfig) {
    let threads = config::effective_threads(probe);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Gallery state per config: autosaving to `.photo-shelf/` or in memory.
fn open_state(dir: &Path, config: &config::ShelfConfig) -> GalleryState {
    let policy = DuplicatePolicy::from_dedupe(config.gallery.dedupe);
    if config.gallery.autosave {
        let storage = FileStorage::new(dir.join(STORE_DIR));
        let store = PathStore::new(Box::new(storage), config.gallery.storage_key.clone());
        GalleryState::autosaving(policy, store)
    } else {
        GalleryState::in_memory(policy)
    }
}

fn open_board(dir: &Path, config: &config::ShelfConfig) -> Board<FileProbe> {
    Board::new(
        open_state(dir, config),
        FileProbe::new(dir, config.probe.trust_remote),
    )
}

/// Restore without probing. A corrupt saved list is reported and the state
/// stays empty.
fn restore_quietly(mut state: GalleryState) -> GalleryState {
    if let Err(e) = state.restore() {
        output::print_notices(&[Notice::RestoreFailed(e.to_string())]);
    }
    state
}

/// Commands that work on the saved list make no sense when nothing is saved.
fn require_saved_list(
    config: &config::ShelfConfig,
    command: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.gallery.autosave {
        return Ok(());
    }
    Err(format!(
        "`{command}` works on the saved list, but gallery.autosave is off; \
         use `photo-shelf build <PATH>...` or `photo-shelf session` instead"
    )
    .into())
}

fn is_entry_document(target: &Path) -> bool {
    target
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(export::replaces_entry_document)
}

/// Run `f` with a channel whose probe events are printed as they arrive.
fn with_progress<T>(f: impl FnOnce(Sender<ProbeEvent>) -> T) -> T {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_probe_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = f(tx);
    if printer.join().is_err() {
        log::warn!("progress printer thread panicked");
    }
    result
}

fn confirm_on_stdin(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(session::confirmed(&answer))
}
