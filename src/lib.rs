pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod error_suggestions;
pub mod packages;
pub mod project_identity;
pub mod ui;
pub mod utils;

use clap::Parser;
use std::process::exit;

/// Run yoink CLI entrypoint.
pub fn run_cli() {
    let args = cli::args::Cli::parse();

    // Flags apply right away so configuration errors honor them too
    ui::init_colors(args.global.color.unwrap_or_default());
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    // The package manager child gets the same SIGINT; the fetch notices the
    // flag, cleans up and fails with `Interrupted`.
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    }) {
        ui::warning(&format!("Could not install Ctrl-C handler: {}", e));
    }

    match cli::dispatcher::dispatch(&args) {
        Ok(code) => exit(code),
        Err(e) => {
            error_suggestions::report(&e);
            exit(e.exit_code());
        }
    }
}
