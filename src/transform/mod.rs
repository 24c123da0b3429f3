//! Transform registry.
//!
//! Transforms are named pure functions over a bitmap. The registry order is
//! the canonical application order: grayscale, median filter, posterize, mirror.

pub mod ops;
pub mod pipeline;

pub use pipeline::TransformPipeline;

use crate::config::{DEFAULT_POSTERIZE_LEVELS, MAX_POSTERIZE_LEVELS, MIN_POSTERIZE_LEVELS};
use crate::error::{AppError, Result};
use image::DynamicImage;
use std::fmt;
use std::str::FromStr;

/// A toggleable transform. Ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransformKind {
    Grayscale,
    MedianFilter,
    Posterize,
    Mirror,
}

impl TransformKind {
    pub const ALL: [TransformKind; 4] = [
        TransformKind::Grayscale,
        TransformKind::MedianFilter,
        TransformKind::Posterize,
        TransformKind::Mirror,
    ];

    /// Stable identifier used by the shell and in toggle requests.
    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Grayscale => "grayscale",
            TransformKind::MedianFilter => "median_filter",
            TransformKind::Posterize => "posterize",
            TransformKind::Mirror => "mirror",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformKind {
    type Err = AppError;

    fn from_str(name: &str) -> Result<Self> {
        TransformKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| AppError::UnknownTransform(name.to_string()))
    }
}

/// Validated number of posterize bins per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterizeLevels(u32);

impl PosterizeLevels {
    pub fn new(levels: u32) -> Result<Self> {
        if (MIN_POSTERIZE_LEVELS..=MAX_POSTERIZE_LEVELS).contains(&levels) {
            Ok(Self(levels))
        } else {
            Err(AppError::InvalidLevel(levels))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PosterizeLevels {
    fn default() -> Self {
        Self(DEFAULT_POSTERIZE_LEVELS)
    }
}

/// Parameters shared by all transforms during one recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformParams {
    pub posterize_levels: PosterizeLevels,
}

pub type TransformFn = fn(&DynamicImage, &TransformParams) -> DynamicImage;

/// A registry slot: the transform and its pure implementation.
pub struct RegisteredTransform {
    pub kind: TransformKind,
    pub apply: TransformFn,
}

fn apply_grayscale(image: &DynamicImage, _: &TransformParams) -> DynamicImage {
    ops::grayscale(image)
}

fn apply_median_filter(image: &DynamicImage, _: &TransformParams) -> DynamicImage {
    ops::median_filter(image)
}

fn apply_posterize(image: &DynamicImage, params: &TransformParams) -> DynamicImage {
    ops::posterize(image, params.posterize_levels)
}

fn apply_mirror(image: &DynamicImage, _: &TransformParams) -> DynamicImage {
    ops::mirror(image)
}

/// All registered transforms, in canonical order.
pub static REGISTRY: [RegisteredTransform; 4] = [
    RegisteredTransform {
        kind: TransformKind::Grayscale,
        apply: apply_grayscale,
    },
    RegisteredTransform {
        kind: TransformKind::MedianFilter,
        apply: apply_median_filter,
    },
    RegisteredTransform {
        kind: TransformKind::Posterize,
        apply: apply_posterize,
    },
    RegisteredTransform {
        kind: TransformKind::Mirror,
        apply: apply_mirror,
    },
];
