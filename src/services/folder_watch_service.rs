//! Service for watching the selected folder.
//!
//! Image files appearing or disappearing trigger a candidate rescan so the
//! shuffle picks them up without reselecting the folder.

use crate::error::{AppError, Result};
use crate::file_utils::{is_supported_image, PathExt};
use crate::services::session_service::{lock_session, Session};
use log::{debug, warn};
use notify::{PollWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer_opt, Config, DebounceEventResult, Debouncer};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Live watcher handle; dropping it stops watching.
pub type FolderDebouncer = Debouncer<PollWatcher>;

const DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct FolderWatchService {
    session: Arc<Mutex<Session>>,
}

/// Rescans when any of `paths` is a candidate image. Returns the new count.
fn handle_changed_paths(paths: Vec<PathBuf>, session: &Mutex<Session>) -> Option<usize> {
    let image_paths: Vec<_> = paths
        .into_iter()
        .filter(|path| is_supported_image(path))
        .collect();
    if image_paths.is_empty() {
        return None;
    }

    debug!("Debounced file system events: {} images", image_paths.len());
    for path in &image_paths {
        debug!("  - {}", path.format_for_log());
    }

    match lock_session(session).refresh_candidates() {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Failed to rescan folder: {}", e);
            None
        }
    }
}

impl FolderWatchService {
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session }
    }

    /// Starts watching the session's current folder.
    ///
    /// `on_change` receives the new candidate count and runs on the watcher
    /// thread.
    pub fn start_watching<F>(&self, on_change: F) -> Result<FolderDebouncer>
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        let (folder, recursive) = {
            let session = lock_session(&self.session);
            let folder = session.folder().map(|path| path.to_path_buf()).ok_or_else(|| {
                AppError::InvalidFolder {
                    path: PathBuf::new(),
                    reason: "no folder selected".to_string(),
                }
            })?;
            (folder, session.options().recursive)
        };

        let watch_error = |e: notify::Error| AppError::InvalidFolder {
            path: folder.clone(),
            reason: format!("cannot watch: {}", e),
        };

        let notify_config = notify::Config::default().with_poll_interval(POLL_INTERVAL);
        let debouncer_config = Config::default()
            .with_timeout(DEBOUNCE_TIMEOUT)
            .with_notify_config(notify_config);

        let session = self.session.clone();
        let mut debouncer = new_debouncer_opt::<_, PollWatcher>(
            debouncer_config,
            move |res: DebounceEventResult| match res {
                Ok(events) => {
                    let paths = events.into_iter().map(|event| event.path).collect();
                    if let Some(count) = handle_changed_paths(paths, &session) {
                        on_change(count);
                    }
                }
                Err(error) => warn!("File watcher error: {}", error),
            },
        )
        .map_err(watch_error)?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&folder, mode).map_err(watch_error)?;
        debug!("Watching {} ({:?})", folder.display(), mode);

        Ok(debouncer)
    }
}
