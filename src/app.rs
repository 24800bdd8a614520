//! Application orchestrator.
//! Merges environment and CLI configuration, initializes logging, installs the
//! Ctrl-C handler, runs the flatten, and turns the outcome into an exit code.

use anyhow::Result;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

use flatten_tree::cli::Args;
use flatten_tree::config::apply_env_defaults;
use flatten_tree::output as out;
use flatten_tree::{flatten, shutdown, Config, FlattenError, FlattenRequest, LogLevel};

use crate::logging::init_tracing;

/// Exit code for an unusable root (missing, not a directory, unreadable).
pub const EXIT_FATAL_CONFIG: u8 = 2;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    let mut cfg = Config::default();
    apply_env_defaults(&mut cfg);
    args.apply_overrides(&mut cfg);
    if let Some(raw) = args.log_level.as_deref()
        && !args.debug
        && LogLevel::parse(raw).is_none()
    {
        out::print_warn(&format!("Unknown --log-level '{raw}'; keeping '{}'", cfg.log_level));
    }

    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), cfg.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;

    // Dropped from the handler too, so an interrupted run still flushes its log file.
    let guard_slot = Arc::new(Mutex::new(guard));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current file and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        }) {
            warn!(error = %e, "could not install Ctrl-C handler; interrupts will abort immediately");
        }
    }

    debug!(?cfg, "Starting flatten");
    let request = FlattenRequest::from(&cfg);
    let code = match flatten::run(&request) {
        Ok(summary) => {
            if cfg.json {
                out::print_summary_json(&summary)?;
            } else {
                out::print_summary(&summary);
                if !summary.interrupted {
                    out::print_success(out::COMPLETION_MESSAGE);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_fatal(&e);
            ExitCode::from(EXIT_FATAL_CONFIG)
        }
    };

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    Ok(code)
}

fn report_fatal(e: &FlattenError) {
    let code = e.code();
    match e {
        FlattenError::RootNotFound(p) => {
            error!(code, kind = "root_not_found", path = %p.display(), "Cannot flatten")
        }
        FlattenError::RootNotDirectory(p) => {
            error!(code, kind = "root_not_directory", path = %p.display(), "Cannot flatten")
        }
        FlattenError::RootUnreadable { path, context } => {
            error!(code, kind = "root_unreadable", path = %path.display(), %context, "Cannot flatten")
        }
        other => error!(code, kind = other.kind(), error = %other, "Cannot flatten"),
    }
    out::print_error(&e.to_string());
}
