//! Application configuration constants and runtime options.

/// Supported image file extensions for scanning directories.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Countdown durations must be strictly greater than this many seconds.
pub const MIN_COUNTDOWN_SECS: u64 = 10;

/// Countdown duration preselected in the shell (00:10:00).
pub const DEFAULT_COUNTDOWN_SECS: u64 = 10 * 60;

pub const MIN_POSTERIZE_LEVELS: u32 = 1;
pub const MAX_POSTERIZE_LEVELS: u32 = 10;
pub const DEFAULT_POSTERIZE_LEVELS: u32 = 3;

/// Side length of the square median filter window.
pub const MEDIAN_KERNEL_SIZE: u32 = 3;

/// Number of folders kept in the recent-folders list.
pub const RECENT_FOLDERS_LIMIT: usize = 10;

/// Directory name under the platform config dir.
pub const SETTINGS_DIR_NAME: &str = "reference-picker";

/// File holding the last opened folder as a raw path string.
pub const LAST_FOLDER_FILE_NAME: &str = "last_opened_folder.txt";

/// Runtime options for a picking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Scan subdirectories of the selected folder.
    pub recursive: bool,
    /// Clear transform toggles and rotation whenever a different image is shown.
    pub reset_transforms_on_change: bool,
    /// Initial posterize levels.
    pub posterize_levels: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            reset_transforms_on_change: true,
            posterize_levels: DEFAULT_POSTERIZE_LEVELS,
        }
    }
}
