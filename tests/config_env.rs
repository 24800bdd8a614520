use serial_test::serial;
use std::path::PathBuf;

use clap::Parser;
use flatten_tree::cli::Args;
use flatten_tree::config::{apply_env_defaults, ENV_LOG_FILE, ENV_LOG_LEVEL};
use flatten_tree::{Config, LogLevel};

fn clear_env() {
    unsafe {
        std::env::remove_var(ENV_LOG_LEVEL);
        std::env::remove_var(ENV_LOG_FILE);
    }
}

#[test]
#[serial]
fn env_seeds_level_and_log_file() {
    clear_env();
    unsafe {
        std::env::set_var(ENV_LOG_LEVEL, "debug");
        std::env::set_var(ENV_LOG_FILE, "/tmp/flatten-env.log");
    }
    let mut cfg = Config::default();
    apply_env_defaults(&mut cfg);
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/flatten-env.log")));
    clear_env();
}

#[test]
#[serial]
fn cli_flags_beat_environment() {
    clear_env();
    unsafe {
        std::env::set_var(ENV_LOG_LEVEL, "quiet");
        std::env::set_var(ENV_LOG_FILE, "/tmp/from-env.log");
    }
    let args = Args::parse_from([
        "flatten",
        "--root",
        "/r",
        "--mode",
        "one-level",
        "--log-level",
        "info",
        "--log-file",
        "/tmp/from-cli.log",
    ]);
    let mut cfg = Config::default();
    apply_env_defaults(&mut cfg);
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/from-cli.log")));
    clear_env();
}

#[test]
#[serial]
fn invalid_or_empty_values_fall_back_to_defaults() {
    clear_env();
    unsafe {
        std::env::set_var(ENV_LOG_LEVEL, "shouty");
        std::env::set_var(ENV_LOG_FILE, "");
    }
    let mut cfg = Config::default();
    apply_env_defaults(&mut cfg);
    assert_eq!(cfg.log_level, LogLevel::default());
    assert_eq!(cfg.log_file, None);
    clear_env();
}
