use crate::core::error::AitermError;
use crate::system::{ShellType, SystemInfo};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of one shell invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Runs a command string through a shell and waits for it to finish.
pub trait ShellRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, AitermError>;
}

/// The user's own shell, as detected at startup.
pub struct SystemShell {
    shell_path: String,
    shell_type: ShellType,
}

impl SystemShell {
    pub fn new(system_info: &SystemInfo) -> Self {
        Self::with_shell(system_info.shell_path.clone(), system_info.shell_type.clone())
    }

    pub fn with_shell(shell_path: impl Into<String>, shell_type: ShellType) -> Self {
        Self {
            shell_path: shell_path.into(),
            shell_type,
        }
    }
}

impl ShellRunner for SystemShell {
    fn run(&self, command: &str) -> Result<CommandOutput, AitermError> {
        let mut cmd = Command::new(&self.shell_path);
        match self.shell_type {
            ShellType::Cmd => cmd.arg("/C").arg(command),
            ShellType::PowerShell => cmd.arg("-Command").arg(command),
            ShellType::UnixLike | ShellType::Fish => cmd.arg("-c").arg(command),
        };

        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!(shell = %self.shell_path, command, "running suggested command");
        let output = cmd
            .output()
            .map_err(|e| AitermError::Execution(format!("{}: {}", self.shell_path, e)))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
