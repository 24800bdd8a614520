//! Filesystem building blocks for a flatten run.

mod atomic;
mod claim;
mod copy;
mod helpers;
mod io_copy;
mod meta;
mod prune;
mod relocate;
pub mod resolve;
mod util;
pub mod walk;

pub use claim::RunLedger;
pub use prune::EmptyDirPruner;
pub use relocate::Relocator;
pub use resolve::{resolve, Resolved, MAX_COLLISION_SUFFIX};
pub use walk::{walk, DirectoryEntry, EntryKind, TreeWalker};
