//! Random reference image picker: folder scanning, shuffle-queue selection
//! with history, a toggleable transform pipeline and a countdown that
//! advances to the next image.
//!
//! The crate is UI agnostic; the `reference-picker` binary wraps a
//! [`services::Session`] in a Slint window.

pub mod config;
pub mod error;
pub mod events;
pub mod file_utils;
pub mod image_loader;
pub mod services;
pub mod settings;
pub mod state;
pub mod transform;

pub use config::SessionOptions;
pub use error::{AppError, ErrorKind, Result};
pub use events::PresentationEvents;
pub use services::{ImageSelectionEngine, Session};
