use crate::ui::ColorChoice;
use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "yoink",
    about = "Run a command from a distro package without installing it",
    long_about = "Run a command from a distro package without installing it.\n\n\
                  Downloads a package with the system package manager (apt, dnf or pacman), \
                  unpacks it into a private cache and runs its command from there. \
                  Nothing is installed system-wide.",
    version,
    next_line_help = false,
    term_width = 80,
    after_help = "Examples:\n  yoink cowsay hello\n  yoink htop@3.3.0\n  yoink -c rg ripgrep --version"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    /// Package to run (NAME or NAME@VERSION), then arguments for its command.
    /// Everything after the package is passed to the command unchanged.
    #[arg(
        value_name = "PACKAGE_SPEC [COMMAND_ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub invocation: Vec<String>,

    /// Command to run from the package (defaults to the package name)
    #[arg(short = 'c', long = "command", value_name = "NAME")]
    pub command: Option<String>,

    /// Remove every cached package and exit
    #[arg(long)]
    pub purge_cache: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    pub fn package_spec(&self) -> Option<&str> {
        self.invocation.first().map(String::as_str)
    }

    pub fn command_args(&self) -> &[String] {
        self.invocation.get(1..).unwrap_or_default()
    }
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Show package manager output and diagnostics
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// When to use colors
    #[arg(long, value_enum, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Cache directory [env: YOINK_CACHE_DIR]
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Use only this package manager [env: YOINK_BACKEND]
    #[arg(long, value_name = "NAME", value_parser = ["apt", "dnf", "pacman"])]
    pub backend: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project_identity;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn trailing_args_are_passed_verbatim() {
        let cli = Cli::try_parse_from([
            project_identity::BINARY_NAME,
            "cowsay",
            "--help",
            "-f",
            "tux",
        ])
        .unwrap();
        assert_eq!(cli.package_spec(), Some("cowsay"));
        assert_eq!(cli.command_args(), ["--help", "-f", "tux"]);
    }

    #[test]
    fn flags_before_spec_are_ours() {
        let cli = Cli::try_parse_from([
            project_identity::BINARY_NAME,
            "-v",
            "--backend",
            "dnf",
            "-c",
            "rg",
            "ripgrep@14.1.0",
            "-v",
        ])
        .unwrap();
        assert!(cli.global.verbose);
        assert_eq!(cli.global.backend.as_deref(), Some("dnf"));
        assert_eq!(cli.command.as_deref(), Some("rg"));
        assert_eq!(cli.package_spec(), Some("ripgrep@14.1.0"));
        assert_eq!(cli.command_args(), ["-v"]);
    }

    #[test]
    fn purge_without_spec() {
        let cli = Cli::try_parse_from([project_identity::BINARY_NAME, "--purge-cache"]).unwrap();
        assert!(cli.purge_cache);
        assert!(cli.package_spec().is_none());
    }

    #[test]
    fn rejects_unknown_backend() {
        let parsed =
            Cli::try_parse_from([project_identity::BINARY_NAME, "--backend", "zypper", "x"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let parsed = Cli::try_parse_from([project_identity::BINARY_NAME, "-q", "-v", "x"]);
        assert!(parsed.is_err());
    }
}
