//! Subprocess execution for package manager commands.
//!
//! Every package manager invocation goes through a [`CommandRunner`] so the
//! fetch flow can be driven by a fake in tests.

use crate::error::{CommandFailure, Result, YoinkError};
use crate::ui;
use crate::utils::platform;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// A command as produced by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// Direct invocation, first element is the program
    Argv(Vec<String>),
    /// Compound command interpreted by `sh -c`
    ShellLine(String),
}

impl CommandSpec {
    pub fn argv<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Argv(items.into_iter().map(Into::into).collect())
    }

    pub fn is_shell(&self) -> bool {
        matches!(self, Self::ShellLine(_))
    }

    /// Human readable, shell-quoted rendering
    pub fn display(&self) -> String {
        match self {
            Self::Argv(argv) => shlex::try_join(argv.iter().map(String::as_str))
                .unwrap_or_else(|_| argv.join(" ")),
            Self::ShellLine(line) => line.clone(),
        }
    }

    pub fn to_command(&self) -> Result<Command> {
        match self {
            Self::Argv(argv) => platform::build_program_command(argv),
            Self::ShellLine(line) => Ok(platform::build_shell_command(line)),
        }
    }
}

/// Where the child's stdout/stderr go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Piped and returned in [`CommandOutput`]
    Captured,
    /// Streamed to the terminal (verbose mode); nothing is captured
    Inherited,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn into_failure(self, command: &CommandSpec) -> CommandFailure {
        CommandFailure {
            command: command.display(),
            code: self.code,
            stdout: self.stdout,
            stderr: self.stderr,
        }
    }
}

pub trait CommandRunner {
    /// Run to completion. A non-zero exit is reported in the output, not as `Err`;
    /// `Err` means the command could not be run at all.
    fn run(&self, command: &CommandSpec, cwd: Option<&Path>, mode: OutputMode)
    -> Result<CommandOutput>;
}

/// Runs commands on the host
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: &CommandSpec,
        cwd: Option<&Path>,
        mode: OutputMode,
    ) -> Result<CommandOutput> {
        let mut cmd = command.to_command()?;
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        // Shell pipelines get their own process group so a timeout can reach
        // every stage, not only `sh`.
        let limits = Limits {
            timeout: self.timeout,
            own_group: self.timeout.is_some() && command.is_shell(),
        };
        if limits.own_group {
            new_process_group(&mut cmd);
        }

        match mode {
            OutputMode::Captured => run_captured(&mut cmd, command, limits),
            OutputMode::Inherited => run_inherited(&mut cmd, command, limits),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    timeout: Option<Duration>,
    /// Child leads its own process group
    own_group: bool,
}

fn spawn_failed(command: &CommandSpec, reason: impl ToString) -> YoinkError {
    YoinkError::SystemCommandFailed {
        command: command.display(),
        reason: reason.to_string(),
    }
}

fn run_captured(cmd: &mut Command, spec: &CommandSpec, limits: Limits) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| spawn_failed(spec, e))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| spawn_failed(spec, "Failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| spawn_failed(spec, "Failed to capture stderr"))?;

    let stdout_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stdout).read_to_end(&mut buf);
        buf
    });
    let stderr_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = std::io::BufReader::new(stderr).read_to_end(&mut buf);
        buf
    });

    let status = wait_with_timeout(&mut child, spec, limits);

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();
    let status = status?;

    Ok(CommandOutput {
        success: status.success(),
        code: status.code(),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// Stream to the terminal. The child's stdout goes to our stderr so that
/// stdout carries only the output of the command being run.
fn run_inherited(cmd: &mut Command, spec: &CommandSpec, limits: Limits) -> Result<CommandOutput> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::from(std::io::stderr()))
        .stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|e| spawn_failed(spec, e))?;
    let status = wait_with_timeout(&mut child, spec, limits)?;

    Ok(CommandOutput {
        success: status.success(),
        code: status.code(),
        ..Default::default()
    })
}

fn wait_with_timeout(child: &mut Child, spec: &CommandSpec, limits: Limits) -> Result<ExitStatus> {
    let Some(timeout) = limits.timeout else {
        return child.wait().map_err(|e| spawn_failed(spec, e));
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                // A separate group does not see the terminal's SIGINT
                if limits.own_group && ui::was_interrupted() {
                    kill_child(child, limits.own_group);
                    continue;
                }
                if start.elapsed() > timeout {
                    kill_child(child, limits.own_group);
                    return Err(spawn_failed(
                        spec,
                        format!("Command timed out after {} seconds", timeout.as_secs()),
                    ));
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(spawn_failed(spec, e)),
        }
    }
}

#[cfg(unix)]
fn new_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn new_process_group(_cmd: &mut Command) {}

/// SIGKILL the child, or its whole process group, and reap it
fn kill_child(child: &mut Child, own_group: bool) {
    if own_group {
        kill_group(child.id());
    }
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(unix)]
fn kill_group(leader: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;
    if let Ok(pid) = i32::try_from(leader) {
        let _ = killpg(Pid::from_raw(pid), Signal::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_group(_leader: u32) {}
