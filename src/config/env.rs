//! Environment-provided defaults.
//!
//! Precedence is CLI flag > environment > built-in default; this module only
//! fills the middle layer. Unparseable values are reported and ignored.

use std::env;
use std::path::PathBuf;

use super::types::{Config, LogLevel};
use crate::output as out;

pub const ENV_LOG_LEVEL: &str = "FLATTEN_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "FLATTEN_LOG_FILE";

/// Seed `cfg` from the process environment. Call before applying CLI overrides.
pub fn apply_env_defaults(cfg: &mut Config) {
    if let Ok(raw) = env::var(ENV_LOG_LEVEL) {
        match LogLevel::parse(&raw) {
            Some(level) => cfg.log_level = level,
            None => out::print_warn(&format!(
                "Ignoring {ENV_LOG_LEVEL}='{raw}': expected quiet, normal, info or debug"
            )),
        }
    }

    if let Some(raw) = env::var_os(ENV_LOG_FILE) {
        if raw.is_empty() {
            cfg.log_file = None;
        } else {
            cfg.log_file = Some(PathBuf::from(raw));
        }
    }
}
