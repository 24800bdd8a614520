//! CLI definition and parsing.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Flags override environment defaults (see `config::env`).

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, FlattenMode, LogLevel};

/// Flatten a directory tree into its root.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flatten",
    author,
    version,
    about = "Move files out of nested directories into the root, renaming on collisions"
)]
pub struct Args {
    /// Directory to flatten. It is never moved or removed itself.
    #[arg(long, short = 'r', value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub root: PathBuf,

    /// one-level: hoist the files of each immediate subdirectory; full-depth: hoist every file.
    #[arg(long, short = 'm', value_enum)]
    pub mode: FlattenMode,

    /// Print the planned moves without touching the filesystem.
    #[arg(long, help = "Show what would be done, but do not modify files/directories")]
    pub dry_run: bool,

    /// Move the files of one directory level in parallel.
    #[arg(long, help = "Relocate sibling files in parallel (ignored with --dry-run)")]
    pub parallel: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit the summary and logs as JSON.
    #[arg(long, help = "Emit the run summary (stdout) and logs (stderr) as JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (keep environment/default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI values to a Config seeded from the environment. Unset flags are no-ops.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        cfg.root = self.root.clone();
        cfg.mode = self.mode;
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.parallel {
            cfg.parallel = true;
        }
        if self.json {
            cfg.json = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
