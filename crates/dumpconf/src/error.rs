use thiserror::Error;

/// Errors that can occur while reading or reconciling dump settings.
///
/// Every error is terminal for the call that produced it. Nothing is
/// retried and nothing is rolled back; after a failed apply the caller
/// has to fetch the configuration again to learn what actually changed.
#[derive(Debug, Error)]
pub enum Error {
    /// sysdumpdev could not be located on this host
    #[error("sysdumpdev not found - is this an AIX host?")]
    CommandNotFound,

    /// sysdumpdev ran but exited with a nonzero status
    #[error("Failed to run sysdumpdev command: {command}")]
    CommandFailed {
        /// Full command line that was executed
        command: String,
        /// Exit status reported by the process
        rc: i32,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// The requested setting is not exposed by this platform
    #[error("{0} option not available on target system")]
    UnsupportedFeature(&'static str),

    /// A cross-field dependency on the current configuration is unmet
    #[error("{0}")]
    Precondition(String),

    /// The desired parameters contradict each other
    #[error("{0}")]
    Validation(String),

    /// A recognised report line did not carry a value
    #[error("malformed sysdumpdev report line: {0:?}")]
    MalformedReport(String),

    /// A mandatory field was absent from the report
    #[error("sysdumpdev report is missing field: {0}")]
    MissingField(&'static str),

    /// A field carried a value outside its domain
    #[error("invalid value {value:?} for {field}")]
    InvalidValue {
        /// Name of the field
        field: &'static str,
        /// Offending token
        value: String,
    },

    /// IO error while spawning the command
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if an external command ran and reported failure
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Error::CommandFailed { .. })
    }

    /// Returns true if the request was rejected before anything ran
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFeature(_) | Error::Precondition(_) | Error::Validation(_)
        )
    }

    /// Exit status of the failed command, if one ran
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::CommandFailed { rc, .. } => Some(*rc),
            _ => None,
        }
    }

    /// Command line, stdout and stderr of the failed command, if one ran
    pub fn command_output(&self) -> Option<(&str, &str, &str)> {
        match self {
            Error::CommandFailed {
                command,
                stdout,
                stderr,
                ..
            } => Some((command.as_str(), stdout.as_str(), stderr.as_str())),
            _ => None,
        }
    }
}

/// Result type for dump configuration operations
pub type Result<T> = std::result::Result<T, Error>;
