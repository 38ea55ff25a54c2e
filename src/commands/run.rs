//! Default action: resolve a package from the cache or fetch it, then hand
//! off to its command.

use crate::cache::{self, CacheDecision, CacheLayout};
use crate::config::RuntimeConfig;
use crate::core::environment::{ExecPlan, LIBRARY_PATH_VAR, PATH_VAR};
use crate::core::fetch::Fetcher;
use crate::core::locator::find_executable_in_prefix;
use crate::core::types::PackageSpec;
use crate::error::{Result, YoinkError};
use crate::packages::{BackendRegistry, PackageManager};
use crate::ui;
use crate::ui::progress::Progress;
use crate::utils::command::{CommandRunner, OutputMode, SystemRunner};
use std::path::{Path, PathBuf};

pub struct RunOptions {
    pub package_spec: String,
    /// Command to run; the package name when `None`
    pub command: Option<String>,
    pub args: Vec<String>,
}

/// A package ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Yoinked {
    pub backend: &'static str,
    pub prefix: PathBuf,
    pub executable: PathBuf,
    /// False when served from the cache
    pub fetched: bool,
}

/// Full invocation. Only returns on failure on Unix, where the command
/// replaces this process.
pub fn run(options: RunOptions, config: &RuntimeConfig) -> Result<i32> {
    let spec = PackageSpec::parse(&options.package_spec)?;
    let command = options
        .command
        .clone()
        .unwrap_or_else(|| spec.name().to_string());

    let layout = CacheLayout::new(config.cache_root());
    layout.ensure_root()?;

    let mut registry = BackendRegistry::default();
    registry.restrict_to(&config.backends)?;
    let backend = registry.detect()?;
    ui::verbose(&format!("Using package manager: {}", backend.name()));

    if options.args.is_empty() {
        ui::verbose(&format!(
            "Will attempt to run '{}' from package '{}'",
            command,
            spec.name()
        ));
    } else {
        ui::verbose(&format!(
            "Will attempt to run '{}' from package '{}' with arguments: {:?}",
            command,
            spec.name(),
            options.args
        ));
    }

    let runner = SystemRunner::new(config.command_timeout);
    let yoinked = yoink(backend.as_ref(), &runner, &layout, &spec, &command)?;

    let plan = ExecPlan::new(&yoinked.prefix, &command, yoinked.executable, options.args)?;
    report_environment(&plan, &yoinked.prefix);

    if ui::was_interrupted() {
        return Err(YoinkError::Interrupted);
    }
    plan.exec()
}

/// Make `command` from `spec` available, fetching only when the cache
/// cannot be used.
pub fn yoink(
    backend: &dyn PackageManager,
    runner: &dyn CommandRunner,
    layout: &CacheLayout,
    spec: &PackageSpec,
    command: &str,
) -> Result<Yoinked> {
    let prefix = layout.install_prefix(backend.name(), spec);

    match cache::resolve(spec, &prefix, command)? {
        CacheDecision::Reuse(executable) => {
            ui::info(&format!(
                "🎣 Using cached {} from {}",
                spec.name(),
                display_relative(layout.root(), &prefix)
            ));
            ui::verbose(&format!("Found '{}' at {}", command, executable.display()));
            return Ok(Yoinked {
                backend: backend.name(),
                prefix,
                executable,
                fetched: false,
            });
        }
        CacheDecision::Fetch { discarded } => {
            if let Some(reason) = discarded {
                ui::verbose(&format!("Re-yoinking {}: {}", spec, reason));
            }
        }
    }

    let label = match spec.version() {
        Some(_) => spec.to_string(),
        None => format!("{} (latest)", spec.name()),
    };
    let progress = Progress::begin(&format!("🎣 Casting for {}", label));
    ui::verbose(&format!("Install prefix: {}", prefix.display()));

    let output = if ui::is_verbose() {
        OutputMode::Inherited
    } else {
        OutputMode::Captured
    };
    let result = Fetcher::new(backend, runner, layout)
        .with_output(output)
        .fetch(spec, &prefix);

    match &result {
        Ok(()) => progress.finish(
            true,
            &format!("Caught {} from {}!", spec.name(), backend.name()),
        ),
        Err(_) => progress.finish(
            false,
            &format!("The line snapped! (Error yoinking {})", spec.name()),
        ),
    }
    result?;

    let executable =
        find_executable_in_prefix(&prefix, command).ok_or_else(|| YoinkError::CommandNotFound {
            command: command.to_string(),
            package: spec.name().to_string(),
            prefix: prefix.clone(),
        })?;
    ui::verbose(&format!(
        "Successfully yoinked and found '{}' at {}",
        command,
        executable.display()
    ));

    Ok(Yoinked {
        backend: backend.name(),
        prefix,
        executable,
        fetched: true,
    })
}

fn display_relative(root: &Path, prefix: &Path) -> String {
    prefix
        .strip_prefix(root)
        .unwrap_or(prefix)
        .display()
        .to_string()
}

fn report_environment(plan: &ExecPlan, prefix: &Path) {
    if !ui::is_verbose() {
        return;
    }

    for var in [PATH_VAR, LIBRARY_PATH_VAR] {
        match plan.env_value(var) {
            Some(value) => ui::verbose(&format!("{}={}", var, value.to_string_lossy())),
            None => ui::verbose(&format!(
                "No additional directories found in {} for {}",
                prefix.display(),
                var
            )),
        }
    }

    let mut argv = vec![plan.program.to_string_lossy().into_owned()];
    argv.extend(plan.args.iter().cloned());
    ui::verbose(&format!("🚀 Executing: {}", argv.join(" ")));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_relative() {
        assert_eq!(
            display_relative(Path::new("/c"), Path::new("/c/apt/cowsay=latest")),
            "apt/cowsay=latest"
        );
        assert_eq!(
            display_relative(Path::new("/c"), Path::new("/elsewhere/x")),
            "/elsewhere/x"
        );
    }
}
