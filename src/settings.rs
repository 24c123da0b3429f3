//! Persistence of the last used folder.
//!
//! The stored format is the raw path with no escaping; surrounding ASCII
//! whitespace is trimmed on read. On Unix the path bytes are written as they
//! are, elsewhere only UTF-8 paths can be stored.

use crate::config::{LAST_FOLDER_FILE_NAME, SETTINGS_DIR_NAME};
use crate::error::Result;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
fn path_to_bytes(path: &Path) -> Option<&[u8]> {
    use std::os::unix::ffi::OsStrExt;
    Some(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_to_bytes(path: &Path) -> Option<&[u8]> {
    path.to_str().map(str::as_bytes)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(bytes).ok().map(PathBuf::from)
}

/// Key-value store for the single remembered folder path.
pub trait SettingsStore: Send {
    /// Returns the remembered folder, if any.
    fn load_last_folder(&self) -> Option<PathBuf>;

    /// Remembers `path` for the next session.
    fn save_last_folder(&mut self, path: &Path) -> Result<()>;
}

/// Plain text file store.
pub struct FileSettingsStore {
    file: PathBuf,
}

impl FileSettingsStore {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }

    /// Store under the platform config directory, or the working directory
    /// when the platform has none.
    pub fn default_location() -> Self {
        let base = dirs::config_dir()
            .map(|dir| dir.join(SETTINGS_DIR_NAME))
            .unwrap_or_default();
        Self::new(base.join(LAST_FOLDER_FILE_NAME))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl SettingsStore for FileSettingsStore {
    fn load_last_folder(&self) -> Option<PathBuf> {
        let contents = fs::read(&self.file).ok()?;
        let trimmed = contents.trim_ascii();
        if trimmed.is_empty() {
            return None;
        }
        path_from_bytes(trimmed)
    }

    fn save_last_folder(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let Some(bytes) = path_to_bytes(path) else {
            warn!("Not remembering {}: path is not valid UTF-8", path.display());
            return Ok(());
        };
        fs::write(&self.file, bytes)?;
        debug!("Saved last folder to {}", self.file.display());
        Ok(())
    }
}

/// In-memory store, for sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    last_folder: Option<PathBuf>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_folder(path: impl Into<PathBuf>) -> Self {
        Self {
            last_folder: Some(path.into()),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load_last_folder(&self) -> Option<PathBuf> {
        self.last_folder.clone()
    }

    fn save_last_folder(&mut self, path: &Path) -> Result<()> {
        self.last_folder = Some(path.to_path_buf());
        Ok(())
    }
}
