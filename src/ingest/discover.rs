//! Input discovery
//!
//! Paths given on the command line are used as-is; directories are
//! searched recursively for `*.json` exports.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

fn json_files_in(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*.json", glob::Pattern::escape(&dir.display().to_string()));
    let mut files: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(entries) => entries.flatten().filter(|p| p.is_file()).collect(),
        Err(err) => {
            tracing::warn!("Invalid search pattern for {}: {}", dir.display(), err);
            Vec::new()
        }
    };
    files.sort();
    files
}

/// Expand directories and drop duplicates, keeping first-seen order
pub(crate) fn discover_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for path in paths {
        let expanded = if path.is_dir() {
            json_files_in(path)
        } else {
            vec![path.clone()]
        };
        for file in expanded {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    files
}
