//! File utility functions

use std::path::PathBuf;

/// Expand a path string to an absolute path.
///
/// Handles tilde expansion (`~`, `~/path`), relative paths (`.`, `..`,
/// `./path`, bare names) and passes absolute paths through unchanged.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let home = || directories::UserDirs::new().map(|u| u.home_dir().to_path_buf());

    let expanded = if path == "~" {
        home().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home() {
            home.join(rest)
        } else {
            PathBuf::from(path)
        }
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}
