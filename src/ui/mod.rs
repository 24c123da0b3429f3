//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: async work that must stay on the main thread (the folder dialog)
//! - folder watcher thread: rescans, then hands results back through `upgrade_in_event_loop`
//! - everything else runs synchronously in the Slint callbacks and timer

mod app_state;
pub mod handlers;
pub mod image_display;
mod state_helpers;

pub use app_state::AppState;
pub use handlers::{open_folder, restart_folder_watch, setup_handlers};
pub use state_helpers::*;
