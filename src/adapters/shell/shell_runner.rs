use std::process::Command;

use crate::core::errors::{DeployError, Result};
use crate::core::traits::command_runner::{CommandOutput, CommandRunner};

/// Runs command strings through the system `sh`, so inline
/// `VAR=value` assignments apply to the invoked CLI.
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self { shell: "sh".into() }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, label: &str, command: &str) -> Result<CommandOutput> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| DeployError::CommandFailed {
                label: label.to_string(),
                code: -1,
                stderr: format!("failed to start {}: {e}", self.shell),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Err(DeployError::CommandFailed {
                label: label.to_string(),
                // Killed by a signal when there is no code
                code: output.status.code().unwrap_or(-1),
                stderr: if stderr.is_empty() { stdout } else { stderr },
            });
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
