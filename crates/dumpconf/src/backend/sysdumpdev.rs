//! sysdumpdev runner implementation.
//!
//! Shells out to the AIX `sysdumpdev` command. Each call is a single
//! synchronous process invocation with captured output; there is no
//! timeout and no retry.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

use super::{COMMAND_NAME, CommandOutput, CommandRunner, LIST_FLAG};

/// Runner that executes the real sysdumpdev binary.
///
/// The program path is resolved once, when the runner is created, and
/// reused for both the list and the apply invocations.
pub struct SysdumpdevRunner {
    program: PathBuf,
}

impl SysdumpdevRunner {
    /// Create a runner for the sysdumpdev found in `PATH`.
    pub fn new() -> Result<Self> {
        let program = which::which(COMMAND_NAME).map_err(|_| Error::CommandNotFound)?;
        log::debug!("resolved {COMMAND_NAME} to {}", program.display());
        Ok(Self { program })
    }

    /// Create a runner for an explicit program path.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check if sysdumpdev is available on this system.
    pub fn is_available() -> bool {
        which::which(COMMAND_NAME).is_ok()
    }

    fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let command = command_line(&self.program, args);
        log::debug!("running: {command}");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::CommandNotFound
                } else {
                    Error::Io(e)
                }
            })?;

        // A process killed by a signal has no exit code
        let rc = output.status.code().unwrap_or(-1);
        log::debug!("{COMMAND_NAME} exited with {rc}");

        Ok(CommandOutput {
            command,
            rc,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

impl CommandRunner for SysdumpdevRunner {
    fn query(&self) -> Result<CommandOutput> {
        self.run(&[LIST_FLAG.to_string()])
    }

    fn apply(&self, args: &[String]) -> Result<CommandOutput> {
        self.run(args)
    }
}

/// Render a program and its arguments as one space-separated line.
fn command_line(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
