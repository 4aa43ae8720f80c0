use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
}

impl ChangeKind {
    pub(crate) fn from_delta(delta: git2::Delta) -> Option<Self> {
        match delta {
            git2::Delta::Added | git2::Delta::Untracked => Some(ChangeKind::Added),
            git2::Delta::Modified => Some(ChangeKind::Modified),
            git2::Delta::Deleted => Some(ChangeKind::Deleted),
            git2::Delta::Renamed => Some(ChangeKind::Renamed),
            git2::Delta::Copied => Some(ChangeKind::Copied),
            git2::Delta::Typechange => Some(ChangeKind::TypeChanged),
            _ => None,
        }
    }
}

/// One file-level difference between two trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative, `/`-separated. New-side path, or the old path for
    /// deletions.
    pub path: String,
    pub kind: ChangeKind,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        ChangedFile {
            path: path.into(),
            kind,
        }
    }
}

/// How file-level changes are reduced to directories.
#[derive(Debug, Clone)]
pub struct ChangeSetOptions {
    /// Number of leading path segments kept. Must be at least 1.
    pub max_depth: usize,
    /// Files whose path does not match are ignored.
    pub pattern: Regex,
}

impl ChangeSetOptions {
    pub fn new(max_depth: usize, pattern: Regex) -> Self {
        ChangeSetOptions { max_depth, pattern }
    }
}
