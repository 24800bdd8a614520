//! Configuration: runtime types, environment defaults, and root validation.
//! There is no config file; the root is supplied per invocation and the
//! environment only seeds logging defaults. CLI flags win over both.

pub mod env;
pub mod paths;
pub mod types;
mod validate;

pub use env::{apply_env_defaults, ENV_LOG_FILE, ENV_LOG_LEVEL};
pub use paths::path_has_symlink_ancestor;
pub use types::{Config, FlattenMode, LogLevel};
pub use validate::validate_root;
