//! Session coordinator.
//!
//! Wires the selection engine, the transform pipeline and the countdown
//! together and reports every change through [`PresentationEvents`].
//! Each command that fails is logged and passed to
//! [`PresentationEvents::on_error`] before its `Result` is returned.

use crate::config::SessionOptions;
use crate::error::{AppError, Result};
use crate::events::PresentationEvents;
use crate::services::selection_service::{ImageSelectionEngine, Selection};
use crate::settings::SettingsStore;
use crate::state::{
    format_hms, parse_schedule, Countdown, ImageEntry, ScheduleToken, TickOutcome, TimerState,
};
use crate::transform::{PosterizeLevels, TransformPipeline};
use image::DynamicImage;
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct Session {
    engine: ImageSelectionEngine,
    pipeline: TransformPipeline,
    countdown: Countdown,
    options: SessionOptions,
    events: Box<dyn PresentationEvents>,
}

impl Session {
    pub fn new(
        options: SessionOptions,
        settings: Box<dyn SettingsStore>,
        events: Box<dyn PresentationEvents>,
    ) -> Result<Self> {
        let engine = ImageSelectionEngine::new(options.recursive, settings);
        Self::with_engine(engine, options, events)
    }

    /// Session around an existing engine, e.g. one with a seeded shuffle.
    pub fn with_engine(
        engine: ImageSelectionEngine,
        options: SessionOptions,
        events: Box<dyn PresentationEvents>,
    ) -> Result<Self> {
        let levels = PosterizeLevels::new(options.posterize_levels)?;
        Ok(Self {
            engine,
            pipeline: TransformPipeline::new(levels),
            countdown: Countdown::new(),
            options,
            events,
        })
    }

    /// Switches folder and shows a first image from it. `None` is a no-op.
    pub fn choose_folder(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path.filter(|path| !path.as_os_str().is_empty()) else {
            debug!("Folder selection cancelled");
            return Ok(());
        };

        let result = self.engine.set_folder(path);
        let count = self.surface(result)?;
        info!("{} candidate images", count);
        self.next_image().map(|_| ())
    }

    /// Reopens the folder remembered from the last run if it still exists.
    /// Returns whether a folder was selected.
    pub fn restore_last_folder(&mut self) -> Result<bool> {
        let Some(folder) = self.engine.last_folder() else {
            debug!("No remembered folder");
            return Ok(false);
        };
        if !folder.is_dir() {
            info!("Remembered folder {} is gone", folder.display());
            return Ok(false);
        }
        self.choose_folder(Some(folder.as_path())).map(|_| true)
    }

    /// Shows a random image not yet seen in this shuffle generation.
    pub fn next_image(&mut self) -> Result<ImageEntry> {
        let result = self.engine.next();
        let selection = self.surface(result)?;
        Ok(self.show(selection))
    }

    /// Shows the image before the current one in the history.
    pub fn previous_image(&mut self) -> Result<ImageEntry> {
        let result = self.engine.back();
        let selection = self.surface(result)?;
        Ok(self.show(selection))
    }

    fn show(&mut self, selection: Selection) -> ImageEntry {
        let Selection { entry, bitmap } = selection;
        self.pipeline
            .set_source(bitmap, self.options.reset_transforms_on_change);
        if let Some(display) = self.pipeline.display() {
            self.events.on_image_changed(&entry, display);
        }
        self.events
            .on_transform_state_changed(&self.pipeline.active());
        entry
    }

    /// Flips the named transform. Returns whether it is now enabled.
    pub fn toggle_transform(&mut self, name: &str) -> Result<bool> {
        let result = self.pipeline.toggle(name);
        let enabled = self.surface(result)?;
        info!("Transform {} {}", name, if enabled { "on" } else { "off" });
        self.publish_display();
        Ok(enabled)
    }

    pub fn rotate(&mut self) {
        self.pipeline.rotate_clockwise();
        debug!("Rotation now {} quarter turns", self.pipeline.quarter_turns());
        self.publish_display();
    }

    pub fn reset_transforms(&mut self) {
        self.pipeline.reset();
        self.publish_display();
    }

    pub fn set_posterize_levels(&mut self, levels: u32) -> Result<()> {
        let result = self.pipeline.set_posterize_levels(levels);
        self.surface(result)?;
        self.publish_display();
        Ok(())
    }

    fn publish_display(&mut self) {
        if let Some(display) = self.pipeline.display() {
            self.events.on_display_updated(display);
        }
        self.events
            .on_transform_state_changed(&self.pipeline.active());
    }

    /// Starts a fixed countdown. Any running one is stopped, even if
    /// `total_seconds` is rejected.
    pub fn start_timer(&mut self, total_seconds: u64) -> Result<ScheduleToken> {
        let result = self.countdown.start(total_seconds);
        self.events.on_timer_tick(self.countdown.remaining());
        self.surface(result)
    }

    /// Starts a countdown cycling through `items`. Any running one is
    /// stopped, even if `items` is rejected.
    pub fn start_schedule(&mut self, items: Vec<u64>) -> Result<ScheduleToken> {
        let result = self.countdown.start_schedule(items);
        self.events.on_timer_tick(self.countdown.remaining());
        self.surface(result)
    }

    /// Starts a schedule written as text, see [`parse_schedule`].
    pub fn start_schedule_from_text(&mut self, text: &str) -> Result<ScheduleToken> {
        match parse_schedule(text) {
            Ok(items) => self.start_schedule(items),
            Err(e) => {
                self.countdown.stop();
                self.events.on_timer_tick(self.countdown.remaining());
                self.surface(Err(e))
            }
        }
    }

    pub fn pause_timer(&mut self) -> bool {
        self.countdown.pause()
    }

    pub fn resume_timer(&mut self) -> Option<ScheduleToken> {
        self.countdown.resume()
    }

    /// Pauses a running countdown or resumes a paused one.
    ///
    /// Returns the token to tick with after a resume, `None` otherwise.
    pub fn toggle_pause(&mut self) -> Option<ScheduleToken> {
        match self.countdown.state() {
            TimerState::Running => {
                self.countdown.pause();
                None
            }
            TimerState::Paused => self.countdown.resume(),
            TimerState::Idle => {
                warn!("Pause toggle ignored: countdown not started");
                None
            }
        }
    }

    /// Forwards one elapsed second; advances to the next image on expiry.
    pub fn tick(&mut self, token: ScheduleToken) -> TickOutcome {
        let outcome = self.countdown.tick(token);
        match outcome {
            TickOutcome::Running { remaining } => self.events.on_timer_tick(remaining),
            TickOutcome::Expired { next_total } => {
                info!("Countdown expired, advancing");
                if let Err(e) = self.next_image() {
                    warn!("Auto-advance failed, countdown restarted anyway: {}", e);
                }
                self.events.on_timer_tick(next_total);
            }
            TickOutcome::Stale | TickOutcome::Inactive => {
                debug!("Ignored tick: {:?}", outcome);
            }
        }
        outcome
    }

    /// Rescans the current folder. Returns the new candidate count.
    pub fn refresh_candidates(&mut self) -> Result<usize> {
        let result = self.engine.refresh_candidates();
        self.surface(result)
    }

    fn surface<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            report(self.events.as_mut(), e);
        }
        result
    }

    pub fn display(&self) -> Option<&DynamicImage> {
        self.pipeline.display()
    }

    pub fn current_entry(&self) -> Option<&ImageEntry> {
        self.engine.current()
    }

    pub fn folder(&self) -> Option<&Path> {
        self.engine.folder()
    }

    pub fn engine(&self) -> &ImageSelectionEngine {
        &self.engine
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Remaining countdown time as `HH:MM:SS`.
    pub fn timer_text(&self) -> String {
        format_hms(self.countdown.remaining())
    }
}

fn report(events: &mut dyn PresentationEvents, err: &AppError) {
    error!("{}", err);
    events.on_error(err.kind(), &err.to_string());
}

/// Locks a shared session, recovering the guard if a holder panicked.
pub fn lock_session(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
