// src/bin/nbx.rs

use colored::Colorize;
use nbx::cli::dispatcher;
use std::env;

/// The main entry point. It sets up logging, hands argv to the dispatcher,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let root = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!(
                "{}: Could not determine the current directory: {}",
                "Error".red().bold(),
                e
            );
            std::process::exit(1);
        }
    };

    // Fatal errors (malformed argv, unusable configuration, a broken option
    // store) end up here; everything recoverable is reported inside the
    // dispatcher and exits cleanly.
    if let Err(e) = dispatcher::run(&root, &args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
