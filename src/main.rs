use std::process::ExitCode;

use flatten_tree::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = flatten_tree::cli::parse();
    match app::run(args) {
        Ok(code) => code,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
