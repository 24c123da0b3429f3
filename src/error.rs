//! Unified error types for the reference picker.

use std::path::PathBuf;
use thiserror::Error;

/// Application-specific errors.
///
/// Every variant is recoverable: callers surface it to the user and carry on.
#[derive(Debug, Error)]
pub enum AppError {
    /// The selected folder is missing, not a directory, or unreadable
    #[error("invalid folder {}: {reason}", path.display())]
    InvalidFolder { path: PathBuf, reason: String },

    /// No qualifying, decodable image exists in the current folder
    #[error("no images available")]
    NoImagesAvailable,

    /// Back-navigation requested at the start of the history
    #[error("no previous image")]
    NoPreviousImage,

    /// Toggle requested for a transform name that is not registered
    #[error("unknown transform: {0}")]
    UnknownTransform(String),

    /// Posterize levels outside the accepted range
    #[error("invalid posterize level {0} (expected 1-10)")]
    InvalidLevel(u32),

    /// Countdown duration not greater than the minimum
    #[error("countdown of {0}s is too short (must be more than 10s)")]
    DurationTooShort(u64),

    /// Countdown schedule without any duration
    #[error("countdown schedule is empty")]
    EmptySchedule,

    /// Schedule entry that is not seconds, `MM:SS` or `HH:MM:SS`
    #[error("invalid schedule entry {0:?}")]
    InvalidScheduleEntry(String),

    /// Error loading or decoding an image file
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Error reading or writing the settings file
    #[error("settings error: {0}")]
    Settings(#[from] std::io::Error),
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

/// Copyable classification of an [`AppError`], handed to presentation callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFolder,
    NoImagesAvailable,
    NoPreviousImage,
    UnknownTransform,
    InvalidLevel,
    DurationTooShort,
    EmptySchedule,
    InvalidScheduleEntry,
    ImageLoad,
    Settings,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidFolder { .. } => ErrorKind::InvalidFolder,
            AppError::NoImagesAvailable => ErrorKind::NoImagesAvailable,
            AppError::NoPreviousImage => ErrorKind::NoPreviousImage,
            AppError::UnknownTransform(_) => ErrorKind::UnknownTransform,
            AppError::InvalidLevel(_) => ErrorKind::InvalidLevel,
            AppError::DurationTooShort(_) => ErrorKind::DurationTooShort,
            AppError::EmptySchedule => ErrorKind::EmptySchedule,
            AppError::InvalidScheduleEntry(_) => ErrorKind::InvalidScheduleEntry,
            AppError::ImageLoad(_) => ErrorKind::ImageLoad,
            AppError::Settings(_) => ErrorKind::Settings,
        }
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(AppError::NoImagesAvailable.kind(), ErrorKind::NoImagesAvailable);
        assert_eq!(AppError::InvalidLevel(0).kind(), ErrorKind::InvalidLevel);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(AppError::from(io).kind(), ErrorKind::Settings);
    }

    #[test]
    fn invalid_folder_message_names_path() {
        let err = AppError::InvalidFolder {
            path: PathBuf::from("/missing"),
            reason: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "invalid folder /missing: not found");
    }
}
