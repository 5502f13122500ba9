//! Hand-off to the wrapped tool
//!
//! Once the wrapper has finished its own work it gets out of the way. On
//! Unix the process is replaced outright, so exit codes, signals, and
//! terminal control all belong to the tool; interactive prompts behave
//! exactly as if the tool had been run directly. Elsewhere the tool is
//! spawned and its exit status forwarded.

use aw_core::error::{ArcWrapError, Result};
use std::process::Command;
use tracing::debug;

/// A fully prepared tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    program: String,
    args: Vec<String>,
}

impl Handoff {
    /// Prepare a hand-off to `program` with the given arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The program to hand off to
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments the program will receive
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Replace the current process with the tool.
    ///
    /// Returns only if the replacement failed.
    #[cfg(unix)]
    pub fn exec(self) -> Result<()> {
        use std::os::unix::process::CommandExt;

        debug!("Replacing process with {} {:?}", self.program, self.args);
        let err = self.command().exec();
        Err(ArcWrapError::ToolLaunch {
            program: self.program,
            message: err.to_string(),
        })
    }

    /// Run the tool and exit with its status.
    ///
    /// Returns only if the tool could not be launched.
    #[cfg(not(unix))]
    pub fn exec(self) -> Result<()> {
        debug!("Launching {} {:?}", self.program, self.args);
        let status = self
            .command()
            .status()
            .map_err(|e| ArcWrapError::ToolLaunch {
                program: self.program.clone(),
                message: e.to_string(),
            })?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_handoff_keeps_program_and_args() {
        let handoff = Handoff::new("arc", vec!["diff".to_string(), "--verbatim".to_string()]);
        assert_eq!(handoff.program(), "arc");
        assert_eq!(handoff.args(), ["diff".to_string(), "--verbatim".to_string()]);
    }

    #[test]
    fn test_command_carries_everything_through() {
        let handoff = Handoff::new(
            "arc",
            vec!["diff".to_string(), "--reviewers".to_string(), "ann".to_string()],
        );

        let cmd = handoff.command();
        assert_eq!(cmd.get_program(), "arc");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["diff", "--reviewers", "ann"]);
    }
}
