use crate::core::errors::Result;

/// Captured streams of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Port for executing shell command strings built by `CommandBuilder`.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion. `label` names the operation in
    /// messages, since the command string itself carries credentials.
    ///
    /// Returns both captured streams on a zero exit status. A non-zero
    /// exit is a `CommandFailed` carrying the exit code and output.
    fn run(&self, label: &str, command: &str) -> Result<CommandOutput>;
}
