//! Routes the parsed command line to the matching action.

use crate::cache::CacheLayout;
use crate::cli::args::Cli;
use crate::commands;
use crate::config::{Overrides, RuntimeConfig, Settings};
use crate::error::Result;
use crate::ui;
use clap::CommandFactory;
use std::io;

/// Returns the process exit code
pub fn dispatch(args: &Cli) -> Result<i32> {
    if let Some(shell) = args.completions {
        commands::completions::run(shell)?;
        return Ok(0);
    }

    let settings = Settings::load()?;
    let config = RuntimeConfig::resolve(&overrides(args), &settings)?;

    ui::init_colors(config.color);
    ui::set_verbose(config.verbose && !args.global.quiet);
    ui::verbose(&format!("Cache root: {}", config.cache_root().display()));

    if args.purge_cache {
        commands::purge::run(&CacheLayout::new(config.cache_root()))?;
        return Ok(0);
    }

    let Some(package_spec) = args.package_spec() else {
        Cli::command().write_help(&mut io::stderr())?;
        return Ok(1);
    };

    commands::run::run(
        commands::run::RunOptions {
            package_spec: package_spec.to_string(),
            command: args.command.clone(),
            args: args.command_args().to_vec(),
        },
        &config,
    )
}

fn overrides(args: &Cli) -> Overrides {
    Overrides {
        cache_dir: args.global.cache_dir.clone(),
        backend: args.global.backend.clone(),
        color: args.global.color,
        verbose: args.global.verbose,
    }
}
