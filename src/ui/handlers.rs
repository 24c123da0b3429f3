//! Event handlers for UI callbacks.
//!
//! Sets up all Logic callbacks (select_folder, open_recent, start_schedule, etc.).
//! Errors are reported to the window by the session itself, so handlers only
//! log at debug level when a command fails.

use crate::ui::{state_helpers, AppState};
use log::{debug, info, warn};
use reference_picker::services::{lock_session, FolderWatchService};
use reference_picker::state::{ScheduleToken, TimerState};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::path::Path;
use std::time::Duration;

/// Selects `folder`, shows a first image and starts watching it.
pub fn open_folder(state: &AppState, folder: &Path) {
    let result = lock_session(&state.session).choose_folder(Some(folder));
    if let Err(e) = result {
        debug!("Folder selection finished with error: {}", e);
    }
    restart_folder_watch(state);
}

/// Replaces the folder watcher with one on the session's current folder and
/// refreshes the folder details shown in the window.
pub fn restart_folder_watch(state: &AppState) {
    state.folder_watch.borrow_mut().take();

    let (has_folder, count, recent) = {
        let session = lock_session(&state.session);
        (
            session.folder().is_some(),
            session.engine().navigation().candidate_count(),
            session.engine().recent_folders().to_vec(),
        )
    };
    if let Some(ui) = state.ui.upgrade() {
        ui.global::<crate::ViewState>().set_candidate_count(count as i32);
        state_helpers::set_recent_folders(&ui, &recent);
    }
    if !has_folder {
        return;
    }

    let ui_handle = state.ui.clone();
    let watcher = FolderWatchService::new(state.session.clone()).start_watching(move |count| {
        let _ = ui_handle.upgrade_in_event_loop(move |ui| {
            ui.global::<crate::ViewState>().set_candidate_count(count as i32);
        });
    });
    match watcher {
        Ok(debouncer) => *state.folder_watch.borrow_mut() = Some(debouncer),
        Err(e) => warn!("Folder changes will not be picked up: {}", e),
    }
}

/// Drives the countdown with `token` once per second.
fn arm_countdown(state: &AppState, token: ScheduleToken) {
    let session = state.session.clone();
    state.countdown_timer.start(
        slint::TimerMode::Repeated,
        Duration::from_secs(1),
        move || {
            lock_session(&session).tick(token);
        },
    );
    if let Some(ui) = state.ui.upgrade() {
        state_helpers::set_timer_flags(&ui, true, false);
    }
}

/// Stops driving the countdown after a rejected start.
fn disarm_countdown(state: &AppState) {
    state.countdown_timer.stop();
    if let Some(ui) = state.ui.upgrade() {
        state_helpers::set_timer_flags(&ui, false, false);
    }
}

/// Sets up all UI event handlers for the application.
pub fn setup_handlers(ui: &crate::AppWindow, state: &AppState) {
    let logic = ui.global::<crate::Logic>();

    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    logic.on_select_folder({
        let state = state.clone();
        move || {
            let state = state.clone();
            let spawned = slint::spawn_local(async move {
                let Some(folder) = AsyncFileDialog::new().pick_folder().await else {
                    debug!("Folder dialog cancelled");
                    return;
                };
                open_folder(&state, folder.path());
            });
            if let Err(e) = spawned {
                warn!("Failed to open folder dialog: {}", e);
            }
        }
    });

    logic.on_open_recent({
        let state = state.clone();
        move |index| {
            let folder = usize::try_from(index).ok().and_then(|index| {
                let session = lock_session(&state.session);
                session.engine().recent_folders().get(index).cloned()
            });
            match folder {
                Some(folder) => open_folder(&state, &folder),
                None => warn!("No recent folder at index {}", index),
            }
        }
    });

    logic.on_next_image({
        let state = state.clone();
        move || {
            if let Err(e) = lock_session(&state.session).next_image() {
                debug!("Next image unavailable: {}", e);
            }
        }
    });

    logic.on_prev_image({
        let state = state.clone();
        move || {
            if let Err(e) = lock_session(&state.session).previous_image() {
                debug!("Previous image unavailable: {}", e);
            }
        }
    });

    logic.on_toggle_transform({
        let state = state.clone();
        move |name| {
            let _ = lock_session(&state.session).toggle_transform(name.as_str());
        }
    });

    logic.on_rotate({
        let state = state.clone();
        move || lock_session(&state.session).rotate()
    });

    logic.on_reset_transforms({
        let state = state.clone();
        move || lock_session(&state.session).reset_transforms()
    });

    logic.on_set_posterize_levels({
        let state = state.clone();
        move |levels| {
            let levels = u32::try_from(levels).unwrap_or(0);
            let _ = lock_session(&state.session).set_posterize_levels(levels);
        }
    });

    logic.on_start_timer({
        let state = state.clone();
        move |total_seconds| {
            let total_seconds = u64::try_from(total_seconds).unwrap_or(0);
            let started = lock_session(&state.session).start_timer(total_seconds);
            match started {
                Ok(token) => {
                    info!("Auto-advance every {}s", total_seconds);
                    arm_countdown(&state, token);
                }
                Err(_) => disarm_countdown(&state),
            }
        }
    });

    logic.on_start_schedule({
        let state = state.clone();
        move |text| {
            let started = lock_session(&state.session).start_schedule_from_text(text.as_str());
            match started {
                Ok(token) => {
                    info!("Auto-advance on schedule {}", text);
                    arm_countdown(&state, token);
                }
                Err(_) => disarm_countdown(&state),
            }
        }
    });

    logic.on_toggle_pause({
        let state = state.clone();
        move || {
            let (resumed, timer_state) = {
                let mut session = lock_session(&state.session);
                let resumed = session.toggle_pause();
                (resumed, session.countdown().state())
            };
            match resumed {
                Some(token) => arm_countdown(&state, token),
                None if timer_state == TimerState::Paused => {
                    state.countdown_timer.stop();
                    if let Some(ui) = state.ui.upgrade() {
                        state_helpers::set_timer_flags(&ui, false, true);
                    }
                }
                None => {}
            }
        }
    });
}
