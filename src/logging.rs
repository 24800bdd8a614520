//! Tracing initialization.
//! Builds a subscriber with an EnvFilter, compact or JSON formatting, and an
//! optional file layer.
//!
//! Behavior:
//! - Console logs go to stderr; stdout is reserved for the run summary.
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.
//!   Logging to a path below a symlinked ancestor is refused.

use anyhow::{anyhow, Result};
use chrono::Local;
use flatten_tree::config::path_has_symlink_ancestor;
use flatten_tree::output as out;
use flatten_tree::LogLevel;
use std::fmt as stdfmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

/// Normal keeps stderr to warnings; per-file lines start at Info.
#[inline]
fn level_directive(lvl: &LogLevel) -> &'static str {
    match lvl {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "trace",
    }
}

fn open_log_file_append(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    opts.open(path)
}

/// Open a non-blocking writer for `path`, or explain on stderr why not.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing file logging: an ancestor of {} is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!("Cannot check log path {}: {}", path.display(), e));
            return None;
        }
        Ok(false) => {}
    }

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match open_log_file_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("Failed to open log file {}: {}", path.display(), e));
            None
        }
    }
}

/// Initialize tracing. Returns the WorkerGuard of the file appender when one
/// was created; it must be held until shutdown so buffered lines are flushed.
pub fn init_tracing(lvl: &LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::new(level_directive(lvl));

    let (file_writer, guard) = match log_file.and_then(maybe_open_non_blocking_writer) {
        Some((w, g)) => (Some(w), Some(g)),
        None => {
            if let Some(p) = log_file {
                out::print_warn(&format!(
                    "File logging to '{}' is disabled; logs continue on stderr.",
                    p.display()
                ));
            }
            (None, None)
        }
    };

    let init = if json {
        let stderr_layer = tsfmt::layer()
            .json()
            .with_timer(LocalHumanTime)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(io::stderr);
        let file_layer = file_writer.map(|w| {
            tsfmt::layer()
                .json()
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(w)
        });
        registry().with(env_filter).with(stderr_layer).with(file_layer).try_init()
    } else {
        let stderr_layer = tsfmt::layer()
            .with_timer(LocalHumanTime)
            .with_target(true)
            .with_thread_ids(true)
            .compact()
            .with_writer(io::stderr);
        let file_layer = file_writer.map(|w| {
            tsfmt::layer()
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .compact()
                .with_writer(w)
        });
        registry().with(env_filter).with(stderr_layer).with(file_layer).try_init()
    };
    init.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;
    Ok(guard)
}
