use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

/// Whether `path` ends in one of `extensions` (compared case-insensitively).
#[must_use]
pub fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// List candidate files under `dir`, sorted by path.
///
/// Non-recursive listing only looks at direct children. Unreadable entries are
/// logged and skipped; a missing directory yields an empty list.
#[must_use]
pub fn candidate_files(dir: &Path, recursive: bool, extensions: &[String]) -> Vec<PathBuf> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name();

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {e}", dir.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| has_accepted_extension(path, extensions))
        .collect();

    files.sort();
    files
}

/// Canonical form of a file identity: the resolved path when the file exists,
/// the original string otherwise.
#[must_use]
pub fn normalize_identity(raw: &str) -> String {
    std::fs::canonicalize(raw).map_or_else(
        |_| raw.to_string(),
        |resolved| resolved.to_string_lossy().into_owned(),
    )
}

#[must_use]
pub fn path_identity(path: &Path) -> String {
    normalize_identity(&path.to_string_lossy())
}
