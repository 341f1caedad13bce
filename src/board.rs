//! The live gallery board.
//!
//! [`Board`] owns the [`GalleryState`] for a run together with the rendered
//! cards and a queue of user-facing [`Notice`]s. Every mutation goes through
//! it, which is where the load-gated commit rule lives:
//!
//! - **Fresh submission** ([`Board::submit`], [`Board::submit_batch`],
//!   [`Board::import`]): the path is probed first and only committed once the
//!   probe reports it loads. A path that fails gets a "not found" card and a
//!   [`SubmitError::LoadFailed`] notice, and the state is left untouched.
//! - **Restore** ([`Board::restore`]): every saved path is probed for its
//!   card, but nothing is re-committed. Failures keep the path tracked and
//!   queue a [`Notice::NotFound`].
//!
//! Probes in a batch run in parallel ([`probe_all`]); the continuations
//! (card, commit, autosave, notice) then run one by one in submission order,
//! so the outcome of a batch never depends on which probe finished first.

use crate::export::export_document;
use crate::gallery::{DuplicatePolicy, GalleryError, GalleryState};
use crate::probe::{ImageProbe, LoadOutcome, ProbeEvent, probe_all};
use crate::render::{Card, PageOptions, board_document};
use crate::types::PhotoPath;
use std::collections::HashSet;
use std::fmt;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Why a submitted path was not added.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("please enter a photo path")]
    EmptyInput,
    #[error("photo is already in the gallery: {0}")]
    AlreadyExists(PhotoPath),
    #[error("photo could not be loaded: {path} ({reason})")]
    LoadFailed { path: PhotoPath, reason: String },
}

impl From<GalleryError> for SubmitError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::AlreadyExists(path) => Self::AlreadyExists(path),
        }
    }
}

/// Message queued for the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added(PhotoPath),
    Removed(PhotoPath),
    Cleared,
    Imported(usize),
    Rejected(SubmitError),
    NotTracked(PhotoPath),
    /// A restored path no longer loads. It stays tracked.
    NotFound(PhotoPath),
    /// The saved list could not be read; the board started empty.
    RestoreFailed(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::Rejected(_)
                | Self::NotTracked(_)
                | Self::NotFound(_)
                | Self::RestoreFailed(_)
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(path) => write!(f, "Photo added: {path}"),
            Self::Removed(path) => write!(f, "Photo removed: {path}"),
            Self::Cleared => write!(f, "Gallery cleared"),
            Self::Imported(1) => write!(f, "1 photo imported"),
            Self::Imported(n) => write!(f, "{n} photos imported"),
            Self::Rejected(err) => write!(f, "{err}"),
            Self::NotTracked(path) => write!(f, "photo is not in the gallery: {path}"),
            Self::NotFound(path) => write!(f, "photo could not be loaded: {path}"),
            Self::RestoreFailed(reason) => {
                write!(f, "saved gallery could not be read, starting empty: {reason}")
            }
        }
    }
}

pub struct Board<P: ImageProbe> {
    state: GalleryState,
    probe: P,
    cards: Vec<Card>,
    notices: Vec<Notice>,
}

impl<P: ImageProbe> Board<P> {
    pub fn new(state: GalleryState, probe: P) -> Self {
        Self {
            state,
            probe,
            cards: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Notices queued since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Load the saved list and probe every path for its card.
    ///
    /// Returns the number of restored paths. Each path that fails to load
    /// queues a [`Notice::NotFound`]. A corrupt saved list leaves the board
    /// empty and queues [`Notice::RestoreFailed`].
    pub fn restore(&mut self, events: Option<Sender<ProbeEvent>>) -> usize {
        self.cards.clear();
        if let Err(e) = self.state.restore() {
            log::warn!("restore failed: {e}");
            self.notices.push(Notice::RestoreFailed(e.to_string()));
            return 0;
        }
        let tracked = self.state.snapshot();
        let outcomes = probe_all(&self.probe, &tracked, events);
        for (path, outcome) in tracked.into_iter().zip(outcomes) {
            if let LoadOutcome::Failed { reason } = &outcome {
                log::debug!("restored {path} does not load: {reason}");
                self.notices.push(Notice::NotFound(path.clone()));
            }
            self.cards.push(Card { path, outcome });
        }
        self.cards.len()
    }

    /// Submit one path typed by the user.
    pub fn submit(&mut self, raw: &str) -> Result<PhotoPath, SubmitError> {
        let mut results = self.submit_batch(&[raw], None);
        results.pop().unwrap_or(Err(SubmitError::EmptyInput))
    }

    /// Submit several paths at once. Results line up with `raws`; each
    /// success queues [`Notice::Added`] and each failure [`Notice::Rejected`].
    pub fn submit_batch<S: AsRef<str>>(
        &mut self,
        raws: &[S],
        events: Option<Sender<ProbeEvent>>,
    ) -> Vec<Result<PhotoPath, SubmitError>> {
        let results = self.run_batch(raws, events);
        for result in &results {
            self.notices.push(match result {
                Ok(path) => Notice::Added(path.clone()),
                Err(err) => Notice::Rejected(err.clone()),
            });
        }
        results
    }

    /// Submit the paths collected from a folder. Failures are reported one by
    /// one; the successes are summed up in a single [`Notice::Imported`].
    pub fn import<S: AsRef<str>>(
        &mut self,
        raws: &[S],
        events: Option<Sender<ProbeEvent>>,
    ) -> usize {
        let results = self.run_batch(raws, events);
        let mut committed = 0;
        for result in results {
            match result {
                Ok(_) => committed += 1,
                Err(err) => self.notices.push(Notice::Rejected(err)),
            }
        }
        self.notices.push(Notice::Imported(committed));
        committed
    }

    fn run_batch<S: AsRef<str>>(
        &mut self,
        raws: &[S],
        events: Option<Sender<ProbeEvent>>,
    ) -> Vec<Result<PhotoPath, SubmitError>> {
        // Cheap checks first; only paths that pass them are probed.
        let checked: Vec<Result<PhotoPath, SubmitError>> = raws
            .iter()
            .map(|raw| {
                let path = PhotoPath::parse(raw.as_ref()).map_err(|_| SubmitError::EmptyInput)?;
                if self.state.policy() == DuplicatePolicy::Reject && self.state.contains(&path) {
                    return Err(SubmitError::AlreadyExists(path));
                }
                Ok(path)
            })
            .collect();

        let to_probe: Vec<PhotoPath> = checked.iter().filter_map(|r| r.clone().ok()).collect();
        let mut outcomes = probe_all(&self.probe, &to_probe, events).into_iter();

        // Duplicates inside the batch that fail to load only get one card.
        let mut failed_in_batch: HashSet<PhotoPath> = HashSet::new();
        checked
            .into_iter()
            .map(|checked| {
                let path = checked?;
                let outcome = outcomes.next().unwrap_or(LoadOutcome::Failed {
                    reason: "not probed".to_string(),
                });
                self.continue_submission(path, outcome, &mut failed_in_batch)
            })
            .collect()
    }

    /// Continuation of one probe: card, then commit.
    fn continue_submission(
        &mut self,
        path: PhotoPath,
        outcome: LoadOutcome,
        failed_in_batch: &mut HashSet<PhotoPath>,
    ) -> Result<PhotoPath, SubmitError> {
        let failure = match &outcome {
            LoadOutcome::Loaded { .. } => None,
            LoadOutcome::Failed { reason } => Some(reason.clone()),
        };
        let Some(reason) = failure else {
            self.state.add(path.clone())?;
            self.cards.push(Card {
                path: path.clone(),
                outcome,
            });
            return Ok(path);
        };
        let err = SubmitError::LoadFailed {
            path: path.clone(),
            reason,
        };
        let duplicate = self.state.policy() == DuplicatePolicy::Reject
            && !failed_in_batch.insert(path.clone());
        if !duplicate {
            self.cards.push(Card { path, outcome });
        }
        Err(err)
    }

    /// Remove the first tracked occurrence of `raw` and one card for it.
    ///
    /// Untracking takes the first loaded card with that path, since only
    /// loaded cards stand for tracked occurrences. Otherwise the first card
    /// goes: a "not found" card from a failed submission has no tracked path
    /// but is still removed from the board.
    pub fn remove(&mut self, raw: &str) -> bool {
        let Ok(path) = PhotoPath::parse(raw) else {
            self.notices.push(Notice::Rejected(SubmitError::EmptyInput));
            return false;
        };
        let untracked = self.state.remove(&path);
        let loaded_card = self
            .cards
            .iter()
            .position(|c| c.path == path && c.outcome.is_loaded());
        let card = match loaded_card {
            Some(index) if untracked => Some(index),
            _ => self.cards.iter().position(|c| c.path == path),
        };
        let card_removed = match card {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        };
        if card_removed || untracked {
            self.notices.push(Notice::Removed(path));
            true
        } else {
            self.notices.push(Notice::NotTracked(path));
            false
        }
    }

    /// Empty the board and the saved list. Irreversible; confirm first.
    pub fn clear(&mut self) {
        self.state.clear();
        self.cards.clear();
        self.notices.push(Notice::Cleared);
    }

    /// Static export of the tracked paths.
    pub fn export(&self, options: &PageOptions) -> String {
        export_document(&self.state.snapshot(), options)
    }

    /// The live board as HTML, with any queued notices shown above the grid.
    pub fn render(&self, options: &PageOptions) -> String {
        let (errors, successes): (Vec<&Notice>, Vec<&Notice>) =
            self.notices.iter().partition(|n| n.is_error());
        let errors: Vec<String> = errors.iter().map(|n| n.to_string()).collect();
        let successes: Vec<String> = successes.iter().map(|n| n.to_string()).collect();
        board_document(&self.cards, &errors, &successes, options).into_string()
    }
}
