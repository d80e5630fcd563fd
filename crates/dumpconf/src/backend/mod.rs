use crate::error::Result;

pub mod sysdumpdev;

/// Name of the dump configuration command.
pub const COMMAND_NAME: &str = "sysdumpdev";

/// Flag asking sysdumpdev to list its configuration.
pub const LIST_FLAG: &str = "-l";

/// Output captured from one sysdumpdev invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Full command line as executed (resolved program plus arguments)
    pub command: String,
    /// Exit status, -1 if the process was killed by a signal
    pub rc: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Check whether the process exited with status 0
    pub fn success(&self) -> bool {
        self.rc == 0
    }
}

/// Runner trait for the external dump configuration command
///
/// This trait abstracts process execution, allowing us to:
/// - Shell out to the real `sysdumpdev` binary
/// - Substitute a fake in tests without spawning anything
///
/// Implementations report a nonzero exit as a normal `CommandOutput`;
/// deciding whether that is an error is left to the caller.
pub trait CommandRunner: Send + Sync {
    /// Run the list form (`sysdumpdev -l`). Must not mutate anything.
    fn query(&self) -> Result<CommandOutput>;

    /// Run sysdumpdev with `args`, in the order given.
    fn apply(&self, args: &[String]) -> Result<CommandOutput>;
}

/// Get the default runner for this host.
///
/// Returns an error if sysdumpdev cannot be found.
pub fn default_runner() -> Result<sysdumpdev::SysdumpdevRunner> {
    sysdumpdev::SysdumpdevRunner::new()
}

/// Shared runners, so a caller can keep a handle on the runner it injected.
impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn query(&self) -> Result<CommandOutput> {
        (**self).query()
    }

    fn apply(&self, args: &[String]) -> Result<CommandOutput> {
        (**self).apply(args)
    }
}
