//! Recursive discovery of data files under a root directory.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Files found under a data root, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFiles {
    /// Canonical (absolute) form of the root that was walked
    pub root: PathBuf,
    /// Absolute paths of matching files
    pub files: Vec<PathBuf>,
}

impl DiscoveredFiles {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }
}

/// Walk `root` recursively and collect every file whose extension is `extension`.
///
/// Traversal is top-down: within a directory, matching files come first
/// (sorted by name), followed by each subdirectory (sorted by name).
/// Symlinked directories are not descended into; symlinks to files are
/// treated as files. Hidden files (names starting with `.`) are never
/// matched, but hidden directories are still walked.
/// A missing or unreadable root is an error; an empty result is not.
pub fn discover_files(root: &Path, extension: &str) -> CoreResult<DiscoveredFiles> {
    if !root.exists() {
        return Err(CoreError::RootNotFound {
            path: root.display().to_string(),
        });
    }
    if !root.is_dir() {
        return Err(CoreError::RootNotDirectory {
            path: root.display().to_string(),
        });
    }

    let root = root.canonicalize().map_err(|e| CoreError::IoWithPath {
        path: root.display().to_string(),
        source: e,
    })?;

    let mut files = Vec::new();
    discover_recursive(&root, extension, &mut files)?;
    log::debug!("Discovered {} .{} files under {}", files.len(), extension, root.display());

    Ok(DiscoveredFiles { root, files })
}

fn discover_recursive(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    let io_err = |e: std::io::Error| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let file_type = entry.file_type().map_err(io_err)?;
        entries.push((entry.path(), file_type));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut subdirs = Vec::new();
    for (path, file_type) in entries {
        if file_type.is_dir() {
            subdirs.push(path);
        } else if is_candidate(&path, file_type) && matches_extension(&path, extension) {
            files.push(path);
        }
    }

    for subdir in subdirs {
        discover_recursive(&subdir, extension, files)?;
    }
    Ok(())
}

/// Regular files, and symlinks that resolve to one. A symlink to a directory
/// is neither walked nor matched.
fn is_candidate(path: &Path, file_type: std::fs::FileType) -> bool {
    file_type.is_file() || (file_type.is_symlink() && path.is_file())
}

fn matches_extension(path: &Path, extension: &str) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    !hidden && path.extension().is_some_and(|e| e == extension)
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
