use crate::ui::{self, AppState};
use log::{info, warn};
use reference_picker::config::DEFAULT_COUNTDOWN_SECS;
use reference_picker::services::lock_session;
use reference_picker::SessionOptions;
use std::ffi::OsString;
use std::path::PathBuf;

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub session: SessionOptions,
    /// First argument naming an existing directory.
    pub folder: Option<PathBuf>,
}

impl LaunchOptions {
    /// Parses arguments without the program name.
    ///
    /// `--flat` turns off subfolder scanning and `--keep-transforms` keeps
    /// toggles when the image changes.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut session = SessionOptions::default();
        let mut folder = None;

        for arg in args {
            match arg.to_str() {
                Some("--flat") => session.recursive = false,
                Some("--keep-transforms") => session.reset_transforms_on_change = false,
                Some(flag) if flag.starts_with('-') => warn!("Ignoring unknown flag {}", flag),
                _ => {
                    let path = PathBuf::from(&arg);
                    if folder.is_none() && path.is_dir() {
                        folder = Some(path);
                    }
                }
            }
        }

        Self { session, folder }
    }
}

/// Opens the folder from the command line, or else the one remembered from
/// the previous run.
pub fn configure_startup_opening(app: &crate::AppWindow, app_state: &AppState, folder: Option<PathBuf>) {
    ui::set_countdown_inputs(app, DEFAULT_COUNTDOWN_SECS);

    if let Some(folder) = folder {
        info!("Opening startup folder {}", folder.display());
        ui::open_folder(app_state, &folder);
        return;
    }

    let restored = lock_session(&app_state.session).restore_last_folder();
    match restored {
        Ok(true) => ui::restart_folder_watch(app_state),
        Ok(false) => {}
        Err(e) => {
            warn!("Could not reopen last folder: {}", e);
            ui::restart_folder_watch(app_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> LaunchOptions {
        LaunchOptions::from_args(args.iter().map(OsString::from))
    }

    #[test]
    fn defaults_without_arguments() {
        let launch = parse(&[]);
        assert_eq!(launch.session, SessionOptions::default());
        assert_eq!(launch.folder, None);
    }

    #[test]
    fn flags_adjust_session_options() {
        let launch = parse(&["--flat", "--keep-transforms", "--verbose"]);
        assert!(!launch.session.recursive);
        assert!(!launch.session.reset_transforms_on_change);
    }

    #[test]
    fn first_existing_directory_is_the_startup_folder() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let missing = first.path().join("missing");
        let launch = parse(&[
            missing.to_str().unwrap(),
            first.path().to_str().unwrap(),
            second.path().to_str().unwrap(),
        ]);
        assert_eq!(launch.folder.as_deref(), Some(first.path()));
    }
}
