//! Reduces file-level changes to the directories that hold them

use crate::{errors::*, types::*};
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Truncate `path` to its first `max_depth` `/`-separated segments.
///
/// Paths already at or below `max_depth` segments come back unchanged.
pub fn coarsen_path(path: &str, max_depth: usize) -> &str {
    match path.match_indices('/').nth(max_depth.saturating_sub(1)) {
        Some((idx, _)) if max_depth > 0 => &path[..idx],
        _ => path,
    }
}

/// Turn `files` into the sorted, deduplicated set of existing directories
/// under `root` that they fall into.
///
/// Deletions and files not matching `opts.pattern` are dropped. Candidates
/// that no longer exist (including ones whose parent became a file), or are
/// not directories, are dropped too. Any other stat failure is an error.
pub fn collect_changed_dirs(root: &Path, files: &[ChangedFile], opts: &ChangeSetOptions) -> Result<Vec<PathBuf>> {
    if opts.max_depth == 0 {
        return Err(ChangeSetError::InvalidDepth);
    }

    let mut candidates = BTreeSet::new();
    for file in files {
        if file.kind == ChangeKind::Deleted {
            continue;
        }
        if !opts.pattern.is_match(&file.path) {
            debug!("Skipping {}", file.path);
            continue;
        }
        candidates.insert(coarsen_path(&file.path, opts.max_depth));
    }

    let mut dirs = Vec::new();
    for candidate in candidates {
        let abs = root.join(candidate);
        match std::fs::metadata(&abs) {
            Ok(meta) if meta.is_dir() => dirs.push(PathBuf::from(candidate)),
            Ok(_) => debug!("{} is not a directory", candidate),
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                debug!("{} no longer exists", candidate)
            }
            Err(source) => return Err(ChangeSetError::Io { path: abs, source }),
        }
    }
    Ok(dirs)
}
