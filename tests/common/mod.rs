#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use reference_picker::events::PresentationEvents;
use reference_picker::state::ImageEntry;
use reference_picker::transform::TransformKind;
use reference_picker::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ImageChanged(PathBuf),
    DisplayUpdated,
    TransformsChanged(Vec<TransformKind>),
    TimerTick(u64),
    Error(ErrorKind),
}

/// Records every notification for later inspection.
#[derive(Clone, Default)]
pub struct RecordingEvents {
    pub log: Arc<Mutex<Vec<Event>>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    pub fn images_shown(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::ImageChanged(_)))
            .count()
    }

    pub fn errors(&self) -> Vec<ErrorKind> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Error(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.log.lock().unwrap().push(event);
    }
}

impl PresentationEvents for RecordingEvents {
    fn on_image_changed(&mut self, entry: &ImageEntry, _display: &DynamicImage) {
        self.push(Event::ImageChanged(entry.path().to_path_buf()));
    }

    fn on_display_updated(&mut self, _display: &DynamicImage) {
        self.push(Event::DisplayUpdated);
    }

    fn on_transform_state_changed(&mut self, active: &[TransformKind]) {
        self.push(Event::TransformsChanged(active.to_vec()));
    }

    fn on_timer_tick(&mut self, remaining_seconds: u64) {
        self.push(Event::TimerTick(remaining_seconds));
    }

    fn on_error(&mut self, kind: ErrorKind, _message: &str) {
        self.push(Event::Error(kind));
    }
}

/// Writes a small PNG with a color derived from `seed`.
pub fn write_png(dir: &Path, name: &str, seed: u8) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(6, 4, |x, y| {
        Rgb([seed.wrapping_mul(37), (x * 40) as u8, (y * 60) as u8])
    })
    .save(&path)
    .unwrap();
    path
}
