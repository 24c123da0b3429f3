//! Display bitmap computation.
//!
//! The display bitmap is always recomputed from the pristine source; nothing
//! is patched incrementally.

use super::{ops, PosterizeLevels, TransformKind, TransformParams, REGISTRY};
use crate::error::Result;
use crate::state::TransformState;
use image::DynamicImage;
use log::debug;

/// Source bitmap, transform flags, rotation and the resulting display bitmap.
#[derive(Default)]
pub struct TransformPipeline {
    source: Option<DynamicImage>,
    display: Option<DynamicImage>,
    state: TransformState,
    /// Clockwise quarter turns, 0..=3.
    quarter_turns: u8,
    params: TransformParams,
}

impl TransformPipeline {
    pub fn new(posterize_levels: PosterizeLevels) -> Self {
        Self {
            params: TransformParams { posterize_levels },
            ..Self::default()
        }
    }

    /// Installs a freshly loaded source bitmap.
    ///
    /// With `reset`, toggles and rotation are cleared first.
    pub fn set_source(&mut self, source: DynamicImage, reset: bool) {
        if reset {
            self.state.clear();
            self.quarter_turns = 0;
        }
        self.source = Some(source);
        self.recompute();
    }

    /// Flips the named transform and recomputes. Returns the new flag.
    pub fn toggle(&mut self, name: &str) -> Result<bool> {
        let kind: TransformKind = name.parse()?;
        let enabled = self.state.toggle(kind);
        self.recompute();
        Ok(enabled)
    }

    /// Adds one clockwise quarter turn.
    pub fn rotate_clockwise(&mut self) {
        self.quarter_turns = (self.quarter_turns + 1) % 4;
        self.recompute();
    }

    /// Clears toggles and rotation.
    pub fn reset(&mut self) {
        self.state.clear();
        self.quarter_turns = 0;
        self.recompute();
    }

    pub fn set_posterize_levels(&mut self, levels: u32) -> Result<()> {
        self.params.posterize_levels = PosterizeLevels::new(levels)?;
        if self.state.is_enabled(TransformKind::Posterize) {
            self.recompute();
        }
        Ok(())
    }

    /// Rebuilds the display bitmap from the source.
    pub fn recompute(&mut self) {
        let Some(source) = self.source.as_ref() else {
            self.display = None;
            return;
        };

        let start = std::time::Instant::now();
        let mut image = source.clone();
        for transform in REGISTRY.iter() {
            if self.state.is_enabled(transform.kind) {
                image = (transform.apply)(&image, &self.params);
            }
        }
        for _ in 0..self.quarter_turns {
            image = ops::rotate_clockwise(&image);
        }

        debug!(
            "Recomputed display bitmap ({:?}, {} quarter turns) in {:?}",
            self.state.active(),
            self.quarter_turns,
            start.elapsed()
        );
        self.display = Some(image);
    }

    pub fn display(&self) -> Option<&DynamicImage> {
        self.display.as_ref()
    }

    pub fn source(&self) -> Option<&DynamicImage> {
        self.source.as_ref()
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn active(&self) -> Vec<TransformKind> {
        self.state.active()
    }

    pub fn quarter_turns(&self) -> u8 {
        self.quarter_turns
    }

    pub fn posterize_levels(&self) -> PosterizeLevels {
        self.params.posterize_levels
    }
}
