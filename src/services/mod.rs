//! Service layer for business logic.
//!
//! Separates the picking session from the UI so it can be driven and tested
//! without a window.

pub mod folder_watch_service;
pub mod selection_service;
pub mod session_service;

pub use folder_watch_service::{FolderDebouncer, FolderWatchService};
pub use selection_service::{ImageSelectionEngine, Selection};
pub use session_service::{lock_session, Session};
