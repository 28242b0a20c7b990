use crate::error::{Error, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// List regular files under `root` whose file name matches `pattern`.
///
/// Only the top level is visited unless `recursive` is set. Symlinks are not
/// followed. The result is sorted by path, which fixes the order files are
/// later fed to the greedy grouping pass.
pub fn discover_files(root: &Path, recursive: bool, pattern: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let matcher =
        Pattern::new(pattern).map_err(|e| Error::InvalidPattern(format!("'{}': {}", pattern, e)))?;

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!("Error walking {}: {}", root.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matched = entry
            .file_name()
            .to_str()
            .map(|name| matcher.matches(name))
            .unwrap_or(false);

        if matched {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(
        "Discovered {} files matching '{}' under {}",
        files.len(),
        pattern,
        root.display()
    );
    Ok(files)
}
