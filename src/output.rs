//! User-facing console output.
//! Colored prefixes are used only when stdout is a TTY so piped output stays plain.

use owo_colors::OwoColorize;

use crate::summary::RunSummary;

/// Confirmation printed after a completed run ("operation complete").
pub const COMPLETION_MESSAGE: &str = "完成移动和清理工作。";

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if atty::is(atty::Stream::Stderr) {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if atty::is(atty::Stream::Stderr) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Plain line with no prefix; used for per-move lines scripts may parse.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Render a summary for humans: one line per move and prune, then totals and errors.
pub fn print_summary(summary: &RunSummary) {
    let verb = if summary.dry_run { "Would move" } else { "Moved" };
    for m in &summary.moves {
        print_user(&format!(
            "{verb} '{}' -> '{}'",
            m.source_path.display(),
            m.destination_path.display()
        ));
    }
    let prune_verb = if summary.dry_run { "Would remove" } else { "Removed" };
    for d in &summary.pruned {
        print_user(&format!("{prune_verb} empty directory '{}'", d.display()));
    }

    print_info(&format!(
        "moved: {}, pruned directories: {}, errors: {}",
        summary.moved_count,
        summary.pruned_directory_count,
        summary.errors.len()
    ));
    for e in &summary.errors {
        print_user(&format!("Failed '{}' [{}]: {}", e.path.display(), e.kind, e.reason));
    }
    if summary.interrupted {
        print_warn("Run was interrupted; the tree is partially flattened.");
    }
}

/// Render a summary as a single JSON document on stdout.
pub fn print_summary_json(summary: &RunSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{json}");
    Ok(())
}
