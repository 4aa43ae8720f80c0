//! Monoscope Git integration: resolves two revisions into snapshot trees and
//! reduces their diff to the set of changed directories, using libgit2.

pub mod changes;
pub mod errors;
pub mod repo;
pub mod types;


pub use changes::{coarsen_path, collect_changed_dirs};
pub use errors::{ChangeSetError, Result};
pub use repo::{GitRepository, NO_BASE_SHA};
pub use types::{ChangeKind, ChangeSetOptions, ChangedFile};
