use crate::ui::image_display::UiEvents;
use reference_picker::services::{FolderDebouncer, Session};
use reference_picker::settings::FileSettingsStore;
use reference_picker::SessionOptions;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// Everything the UI callbacks share.
#[derive(Clone)]
pub struct AppState {
    pub ui: slint::Weak<crate::AppWindow>,
    pub session: Arc<Mutex<Session>>,
    /// One-second tick source for the countdown.
    pub countdown_timer: Rc<slint::Timer>,
    /// Watcher on the selected folder, replaced on every folder change.
    pub folder_watch: Rc<RefCell<Option<FolderDebouncer>>>,
}

impl AppState {
    pub fn new(ui: &crate::AppWindow, options: SessionOptions) -> reference_picker::Result<Self> {
        let settings = FileSettingsStore::default_location();
        log::debug!("Settings file: {}", settings.file().display());

        let events = UiEvents::new(ui.as_weak());
        let session = Session::new(options, Box::new(settings), Box::new(events))?;

        Ok(Self {
            ui: ui.as_weak(),
            session: Arc::new(Mutex::new(session)),
            countdown_timer: Rc::new(slint::Timer::default()),
            folder_watch: Rc::new(RefCell::new(None)),
        })
    }
}
