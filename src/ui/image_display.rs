//! Bridges session notifications to the window.
//!
//! Notifications may arrive on the folder watcher thread, so every update is
//! queued with `upgrade_in_event_loop`. `slint::Image` is not `Send`; pixels
//! travel as a `SharedPixelBuffer` and become an image on the UI thread.

use crate::ui::state_helpers;
use image::DynamicImage;
use log::warn;
use reference_picker::events::PresentationEvents;
use reference_picker::file_utils::PathExt;
use reference_picker::state::{format_hms, ImageEntry};
use reference_picker::transform::TransformKind;
use reference_picker::ErrorKind;
use slint::{ComponentHandle, Rgba8Pixel, SharedPixelBuffer};

/// Converts a display bitmap into pixels Slint can show.
pub fn to_pixel_buffer(image: &DynamicImage) -> SharedPixelBuffer<Rgba8Pixel> {
    let rgba = image.to_rgba8();
    SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(rgba.as_raw(), rgba.width(), rgba.height())
}

fn error_prefix(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidFolder => "Cannot open folder",
        ErrorKind::NoImagesAvailable | ErrorKind::ImageLoad => "Cannot show image",
        ErrorKind::NoPreviousImage => "Cannot go back",
        ErrorKind::UnknownTransform | ErrorKind::InvalidLevel => "Cannot apply transform",
        ErrorKind::DurationTooShort
        | ErrorKind::EmptySchedule
        | ErrorKind::InvalidScheduleEntry => "Cannot start timer",
        ErrorKind::Settings => "Cannot save settings",
    }
}

/// [`PresentationEvents`] that update the window's `ViewState`.
pub struct UiEvents {
    ui: slint::Weak<crate::AppWindow>,
}

impl UiEvents {
    pub fn new(ui: slint::Weak<crate::AppWindow>) -> Self {
        Self { ui }
    }

    fn update<F>(&self, apply: F)
    where
        F: FnOnce(crate::AppWindow) + Send + 'static,
    {
        if let Err(e) = self.ui.upgrade_in_event_loop(apply) {
            warn!("Dropped UI update: {}", e);
        }
    }
}

impl PresentationEvents for UiEvents {
    fn on_image_changed(&mut self, entry: &ImageEntry, display: &DynamicImage) {
        let buffer = to_pixel_buffer(display);
        let filename = entry.path().format_for_log();
        self.update(move |ui| {
            state_helpers::set_image_info(&ui, slint::Image::from_rgba8(buffer), &filename);
        });
    }

    fn on_display_updated(&mut self, display: &DynamicImage) {
        let buffer = to_pixel_buffer(display);
        self.update(move |ui| {
            ui.global::<crate::ViewState>()
                .set_dynamic_image(slint::Image::from_rgba8(buffer));
        });
    }

    fn on_transform_state_changed(&mut self, active: &[TransformKind]) {
        let active = active.to_vec();
        self.update(move |ui| state_helpers::set_transform_flags(&ui, &active));
    }

    fn on_timer_tick(&mut self, remaining_seconds: u64) {
        let text = format_hms(remaining_seconds);
        self.update(move |ui| {
            ui.global::<crate::ViewState>().set_timer_text(text.into());
        });
    }

    fn on_error(&mut self, kind: ErrorKind, message: &str) {
        let message = message.to_string();
        self.update(move |ui| {
            state_helpers::set_error_with_prefix(&ui, error_prefix(kind), &message);
        });
    }
}
