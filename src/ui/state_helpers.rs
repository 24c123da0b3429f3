//! Helper functions to set multiple ViewState properties in a grouped manner.

use reference_picker::state::format_hms;
use reference_picker::transform::TransformKind;
use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use std::path::PathBuf;

/// Sets the displayed image and its caption, clearing any error.
///
/// Groups: dynamic-image, image-loaded, current-filename, error-message
pub fn set_image_info(ui: &crate::AppWindow, image: slint::Image, filename: &str) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_dynamic_image(image);
    view_state.set_image_loaded(true);
    view_state.set_current_filename(filename.into());
    view_state.set_error_message("".into());
}

/// Lists recently opened folders, the current one selected first.
///
/// Groups: recent-folders, recent-index, recent-current
pub fn set_recent_folders(ui: &crate::AppWindow, folders: &[PathBuf]) {
    let labels: Vec<SharedString> = folders
        .iter()
        .map(|folder| folder.display().to_string().into())
        .collect();
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_recent_current(labels.first().cloned().unwrap_or_default());
    view_state.set_recent_index(if labels.is_empty() { -1 } else { 0 });
    view_state.set_recent_folders(ModelRc::new(VecModel::from(labels)));
}

/// Highlights the buttons of enabled transforms.
///
/// Groups: grayscale-active, median-active, posterize-active, mirror-active
pub fn set_transform_flags(ui: &crate::AppWindow, active: &[TransformKind]) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_grayscale_active(active.contains(&TransformKind::Grayscale));
    view_state.set_median_active(active.contains(&TransformKind::MedianFilter));
    view_state.set_posterize_active(active.contains(&TransformKind::Posterize));
    view_state.set_mirror_active(active.contains(&TransformKind::Mirror));
}

/// Groups: timer-running, timer-paused
pub fn set_timer_flags(ui: &crate::AppWindow, running: bool, paused: bool) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_timer_running(running);
    view_state.set_timer_paused(paused);
}

/// Fills the hour, minute and second inputs from a duration.
///
/// Groups: hours, minutes, seconds, timer-text
pub fn set_countdown_inputs(ui: &crate::AppWindow, total_seconds: u64) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_hours((total_seconds / 3600) as i32);
    view_state.set_minutes(((total_seconds % 3600) / 60) as i32);
    view_state.set_seconds((total_seconds % 60) as i32);
    view_state.set_timer_text(format_hms(total_seconds).into());
}

/// Sets an error message in the UI with a prefix.
///
/// The session has already logged the error.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: &str) {
    let error_message = format!("{}: {}", prefix, error);
    ui.global::<crate::ViewState>()
        .set_error_message(error_message.into());
}
