//! Notifications from the session to whatever presents it.

use crate::error::ErrorKind;
use crate::state::ImageEntry;
use crate::transform::TransformKind;
use image::DynamicImage;

/// Callbacks the session invokes after each state change.
///
/// Implementations run on the thread that issued the command, which may be
/// the folder watcher thread rather than the UI thread.
pub trait PresentationEvents: Send {
    /// A new image is displayed; `display` already has all transforms applied.
    fn on_image_changed(&mut self, entry: &ImageEntry, display: &DynamicImage);

    /// The display bitmap was recomputed for the same image.
    fn on_display_updated(&mut self, display: &DynamicImage) {
        let _ = display;
    }

    /// Enabled transforms in canonical order.
    fn on_transform_state_changed(&mut self, active: &[TransformKind]);

    fn on_timer_tick(&mut self, remaining_seconds: u64);

    fn on_error(&mut self, kind: ErrorKind, message: &str);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl PresentationEvents for NoopEvents {
    fn on_image_changed(&mut self, _entry: &ImageEntry, _display: &DynamicImage) {}

    fn on_transform_state_changed(&mut self, _active: &[TransformKind]) {}

    fn on_timer_tick(&mut self, _remaining_seconds: u64) {}

    fn on_error(&mut self, _kind: ErrorKind, _message: &str) {}
}
