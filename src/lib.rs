//! Core library for `flatten_tree`.
//!
//! Moves files out of nested directories into a root directory, renaming on
//! name collisions (`a.txt` -> `a_1.txt`) and removing directories the move
//! left empty. One algorithm serves both modes:
//!
//! - [`FlattenMode::OneLevel`]: the files of each immediate subdirectory move up one level.
//! - [`FlattenMode::FullDepth`]: every file at any depth moves into the root.
//!
//! ```no_run
//! use flatten_tree::{run, FlattenMode, FlattenRequest};
//!
//! let summary = run(&FlattenRequest::new("/data/inbox", FlattenMode::FullDepth).dry_run(true))?;
//! println!("{} files would move", summary.moved_count);
//! # Ok::<(), flatten_tree::FlattenError>(())
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod flatten;
pub mod fs_ops;
pub mod output;
pub mod shutdown;
pub mod summary;

pub use config::{Config, FlattenMode, LogLevel};
pub use errors::FlattenError;
pub use flatten::{run, FlattenRequest, RunPhase};
pub use summary::{ItemError, MoveMethod, MoveResult, RunSummary};
