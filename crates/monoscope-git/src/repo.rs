use crate::{changes::collect_changed_dirs, errors::*, types::*};
use git2::{DiffFindOptions, DiffOptions, Repository, Tree};
use std::path::{Path, PathBuf};
use tracing::debug;

/// All-zero SHA used by CI systems to say "there is no previous commit".
/// A base revision starting with it means every file in head is new.
pub const NO_BASE_SHA: &str = "0000000000000000000000000000000000000000";

/// Explicitly opened repository handle. Released when dropped.
pub struct GitRepository {
    path: PathBuf,
    repo: Repository,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository").field("path", &self.path).finish()
    }
}

impl GitRepository {
    /// Open the repository whose root is `path`. Parent directories are not
    /// searched.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let repo = Repository::open(path_ref).map_err(|source| ChangeSetError::RepoNotFound {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path_ref.to_path_buf(),
            repo,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Root of the checked-out files.
    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or(ChangeSetError::BareRepository)
    }

    /// Snapshot tree for `spec`; empty means the checked-out `HEAD`.
    ///
    /// `spec` may be anything rev-parse understands: `HEAD~1`, a branch, a
    /// full or abbreviated SHA.
    pub fn tree_for(&self, spec: &str) -> Result<Tree<'_>> {
        let spec = spec.trim();
        if spec.is_empty() {
            let head = self.repo.head().map_err(|source| ChangeSetError::RevisionNotFound {
                spec: "HEAD".to_string(),
                source,
            })?;
            if let Some(oid) = head.target() {
                debug!("HEAD hash: {}", oid);
            }
            return Ok(head.peel_to_tree()?);
        }
        let object = self
            .repo
            .revparse_single(spec)
            .map_err(|source| ChangeSetError::RevisionNotFound {
                spec: spec.to_string(),
                source,
            })?;
        Ok(object.peel_to_tree()?)
    }

    /// Base snapshot tree, or `None` when there is nothing to diff against.
    pub fn base_tree(&self, spec: &str) -> Result<Option<Tree<'_>>> {
        let spec = spec.trim();
        if spec.is_empty() || spec.starts_with(NO_BASE_SHA) {
            debug!("No base revision; treating every file as added");
            return Ok(None);
        }
        self.tree_for(spec).map(Some)
    }

    /// File-level changes between `base` and `head`, with rename detection.
    pub fn changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>> {
        let base_tree = self.base_tree(base)?;
        let head_tree = self.tree_for(head)?;

        let mut opts = DiffOptions::new();
        let mut diff = self
            .repo
            .diff_tree_to_tree(base_tree.as_ref(), Some(&head_tree), Some(&mut opts))?;
        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            let Some(kind) = ChangeKind::from_delta(delta.status()) else {
                continue;
            };
            let side = if kind == ChangeKind::Deleted {
                delta.old_file()
            } else {
                delta.new_file()
            };
            if let Some(path) = side.path() {
                files.push(ChangedFile::new(path.to_string_lossy(), kind));
            }
        }
        debug!("{} files differ between {:?} and {:?}", files.len(), base, head);
        Ok(files)
    }

    /// Directories touched between `base` and `head`, reduced per `opts` and
    /// checked against the working tree.
    pub fn changed_paths(&self, base: &str, head: &str, opts: &ChangeSetOptions) -> Result<Vec<PathBuf>> {
        if opts.max_depth == 0 {
            return Err(ChangeSetError::InvalidDepth);
        }
        let files = self.changed_files(base, head)?;
        collect_changed_dirs(self.workdir()?, &files, opts)
    }
}
