use crate::error::{Result, YoinkError};
use std::process::Command;
use sudo::RunningAs;

/// Whether this process already runs with root privileges
pub fn is_elevated() -> bool {
    matches!(sudo::check(), RunningAs::Root)
}

/// Prefix that raises privileges for a command, empty when already root
pub fn elevation_prefix() -> Vec<String> {
    if is_elevated() {
        Vec::new()
    } else {
        vec!["sudo".to_string()]
    }
}

/// Build a shell-interpreted command: `sh -c <line>`
pub fn build_shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

/// Build a direct program invocation from an argument vector
pub fn build_program_command(argv: &[String]) -> Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| YoinkError::Other("Refusing to run an empty command".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(args);
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_program_works() {
        let cmd = build_program_command(&["echo".to_string(), "ok".to_string()]).unwrap();
        assert_eq!(cmd.get_program(), "echo");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec!["ok"]);
    }

    #[test]
    fn build_program_rejects_empty_argv() {
        assert!(build_program_command(&[]).is_err());
    }

    #[test]
    fn build_shell_uses_sh() {
        let cmd = build_shell_command("echo ok | cat");
        assert_eq!(cmd.get_program(), "sh");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec!["-c", "echo ok | cat"]);
    }

    #[test]
    fn elevation_prefix_matches_privileges() {
        let prefix = elevation_prefix();
        if is_elevated() {
            assert!(prefix.is_empty());
        } else {
            assert_eq!(prefix, vec!["sudo".to_string()]);
        }
    }
}
