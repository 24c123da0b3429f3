use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// Log-friendly path rendering.
pub trait PathExt {
    /// Renders the file name only, falling back to the full path.
    fn format_for_log(&self) -> String;
}

impl PathExt for Path {
    fn format_for_log(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }
}

/// Returns true when the path has one of the supported extensions (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lists supported image files under `dir`, sorted.
///
/// With `recursive`, subdirectories are descended into. Symlinked directories
/// are not followed. Only a failure to read `dir` itself is an error; unreadable
/// subdirectories are logged and skipped.
pub fn scan_directory(dir: &Path, recursive: bool) -> std::io::Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    let mut is_root = true;

    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) if is_root => return Err(e),
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", current.display(), e);
                continue;
            }
        };
        is_root = false;

        for entry in entries.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            let is_real_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_real_dir {
                if recursive {
                    pending.push(path);
                }
            } else if path.is_file() && is_supported_image(&path) {
                image_files.push(path);
            }
        }
    }

    image_files.sort();
    Ok(image_files)
}
