//! Service for picking images out of the selected folder.
//!
//! Owns the folder, the candidate set with its shuffle queue and the viewing
//! history, and turns entries into decoded bitmaps.

use crate::config::RECENT_FOLDERS_LIMIT;
use crate::error::{AppError, Result};
use crate::file_utils::{scan_directory, PathExt};
use crate::image_loader::load_image_blocking;
use crate::settings::SettingsStore;
use crate::state::{ImageEntry, NavigationState};
use image::DynamicImage;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// An entry together with its freshly decoded source bitmap.
#[derive(Debug, Clone)]
pub struct Selection {
    pub entry: ImageEntry,
    pub bitmap: DynamicImage,
}

pub struct ImageSelectionEngine {
    folder: Option<PathBuf>,
    recursive: bool,
    state: NavigationState,
    /// Most recent first.
    recent_folders: Vec<PathBuf>,
    settings: Box<dyn SettingsStore>,
}

impl ImageSelectionEngine {
    pub fn new(recursive: bool, settings: Box<dyn SettingsStore>) -> Self {
        Self::with_state(recursive, settings, NavigationState::new())
    }

    /// Engine whose shuffles are reproducible.
    pub fn with_seed(recursive: bool, settings: Box<dyn SettingsStore>, seed: u64) -> Self {
        Self::with_state(recursive, settings, NavigationState::with_seed(seed))
    }

    fn with_state(recursive: bool, settings: Box<dyn SettingsStore>, state: NavigationState) -> Self {
        Self {
            folder: None,
            recursive,
            state,
            recent_folders: Vec::new(),
            settings,
        }
    }

    /// Switches to `path` and rescans. Returns the new candidate count.
    ///
    /// An empty path is ignored. On failure the previous folder and candidates
    /// stay in place. History survives folder changes.
    pub fn set_folder(&mut self, path: &Path) -> Result<usize> {
        if path.as_os_str().is_empty() {
            debug!("Ignoring empty folder selection");
            return Ok(self.state.candidate_count());
        }

        let folder = validate_folder(path)?;
        info!("Selected folder {}", folder.display());

        self.state.clear_candidates();
        self.folder = Some(folder.clone());
        self.remember_folder(&folder);
        if let Err(e) = self.settings.save_last_folder(&folder) {
            warn!("Failed to persist last folder: {}", e);
        }

        self.refresh_candidates()
    }

    /// Rescans the current folder. Returns the new candidate count.
    pub fn refresh_candidates(&mut self) -> Result<usize> {
        let Some(folder) = self.folder.as_deref() else {
            self.state.clear_candidates();
            return Ok(0);
        };

        let start = Instant::now();
        match scan_directory(folder, self.recursive) {
            Ok(paths) => {
                self.state
                    .set_candidates(paths.into_iter().map(ImageEntry::new).collect());
                debug!(
                    "Scanned {} ({}) in {:?}: {} images",
                    folder.display(),
                    if self.recursive { "recursive" } else { "flat" },
                    start.elapsed(),
                    self.state.candidate_count()
                );
                Ok(self.state.candidate_count())
            }
            Err(e) => {
                self.state.clear_candidates();
                Err(AppError::InvalidFolder {
                    path: folder.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Picks the next random image.
    ///
    /// Entries that fail to decode are dropped from the candidate set and the
    /// draw is retried. History only changes on success.
    pub fn next(&mut self) -> Result<Selection> {
        while let Some(entry) = self.state.draw() {
            let start = Instant::now();
            match load_image_blocking(entry.path()) {
                Ok(bitmap) => {
                    debug!(
                        "Decoded {} in {:?}",
                        entry.path().format_for_log(),
                        start.elapsed()
                    );
                    self.state.push_history(entry.clone());
                    info!(
                        "Showing {} ({} in history)",
                        entry.path().format_for_log(),
                        self.state.history().len()
                    );
                    return Ok(Selection { entry, bitmap });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().format_for_log(), e);
                    self.state.forget(&entry);
                }
            }
        }
        Err(AppError::NoImagesAvailable)
    }

    /// Steps back through the history.
    ///
    /// If the earlier file can no longer be decoded the cursor is restored.
    pub fn back(&mut self) -> Result<Selection> {
        let entry = self.state.step_back().ok_or(AppError::NoPreviousImage)?;
        match load_image_blocking(entry.path()) {
            Ok(bitmap) => {
                info!(
                    "Back to {} (position {:?})",
                    entry.path().format_for_log(),
                    self.state.cursor()
                );
                Ok(Selection { entry, bitmap })
            }
            Err(e) => {
                self.state.step_forward();
                Err(e)
            }
        }
    }

    fn remember_folder(&mut self, folder: &Path) {
        self.recent_folders.retain(|known| known != folder);
        self.recent_folders.insert(0, folder.to_path_buf());
        self.recent_folders.truncate(RECENT_FOLDERS_LIMIT);
    }

    /// Folder persisted by a previous session, if any.
    pub fn last_folder(&self) -> Option<PathBuf> {
        self.settings.load_last_folder()
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn recent_folders(&self) -> &[PathBuf] {
        &self.recent_folders
    }

    pub fn current(&self) -> Option<&ImageEntry> {
        self.state.current()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.state
    }
}

fn validate_folder(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| AppError::InvalidFolder {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }
    fs::read_dir(path).map_err(|e| invalid(e.to_string()))?;
    path.canonicalize().map_err(|e| invalid(e.to_string()))
}
