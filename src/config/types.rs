//! Core configuration types.
//! - Config holds the runtime settings for one flatten run.
//! - FlattenMode selects the traversal strategy.
//! - LogLevel represents verbosity with simple parsing helpers.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How deep the flatten reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlattenMode {
    /// Hoist the files of each immediate subdirectory up one level.
    #[default]
    OneLevel,
    /// Hoist every file at any depth directly into the root.
    FullDepth,
}

impl fmt::Display for FlattenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlattenMode::OneLevel => "one-level",
            FlattenMode::FullDepth => "full-depth",
        })
    }
}

/// Program-defined verbosity levels exposed to users/environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Directory being flattened; never moved or removed itself
    pub root: PathBuf,
    pub mode: FlattenMode,
    /// If true, plan and report but do not modify the filesystem
    pub dry_run: bool,
    /// Relocate independent files of one batch on the rayon pool
    pub parallel: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Emit the summary and logs as JSON
    pub json: bool,
}

impl Config {
    /// Construct a Config for `root` and `mode`; other fields use defaults.
    pub fn new(root: impl Into<PathBuf>, mode: FlattenMode) -> Self {
        Self {
            root: root.into(),
            mode,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse(" verbose "), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("nope".parse::<LogLevel>().is_err());
    }

    #[test]
    fn mode_display_matches_cli_names() {
        assert_eq!(FlattenMode::OneLevel.to_string(), "one-level");
        assert_eq!(FlattenMode::FullDepth.to_string(), "full-depth");
    }
}
