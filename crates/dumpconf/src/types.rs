use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Mechanism used to take a system dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DumpType {
    /// Dump performed by the operating system alone
    #[serde(rename = "traditional")]
    Traditional,
    /// Dump assisted by platform firmware (active after reboot)
    #[serde(rename = "fw-assisted")]
    FwAssisted,
}

impl DumpType {
    /// Token used by sysdumpdev for this value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traditional => "traditional",
            Self::FwAssisted => "fw-assisted",
        }
    }
}

impl fmt::Display for DumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DumpType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "traditional" => Ok(Self::Traditional),
            "fw-assisted" => Ok(Self::FwAssisted),
            other => Err(Error::InvalidValue {
                field: "dump_type",
                value: other.to_string(),
            }),
        }
    }
}

/// Full memory dump mode of a firmware-assisted dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpMode {
    /// Neither full memory nor kernel memory dumps are allowed
    Disallow,
    /// Same as `allow_full`
    Allow,
    /// Kernel memory dumps are allowed
    AllowKernel,
    /// Kernel memory dumps are allowed and always performed
    RequireKernel,
    /// Full memory dumps are allowed
    AllowFull,
    /// Full memory dumps are allowed and always performed
    RequireFull,
}

impl DumpMode {
    /// All modes in the order sysdumpdev documents them
    pub const ALL: [DumpMode; 6] = [
        Self::Disallow,
        Self::Allow,
        Self::AllowKernel,
        Self::RequireKernel,
        Self::AllowFull,
        Self::RequireFull,
    ];

    /// Token used by sysdumpdev for this value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disallow => "disallow",
            Self::Allow => "allow",
            Self::AllowKernel => "allow_kernel",
            Self::RequireKernel => "require_kernel",
            Self::AllowFull => "allow_full",
            Self::RequireFull => "require_full",
        }
    }
}

impl fmt::Display for DumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DumpMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::InvalidValue {
                field: "dump_mode",
                value: s.to_string(),
            })
    }
}

/// Snapshot of the dump configuration as reported by `sysdumpdev -l`.
///
/// Read fresh for every reconciliation. `nx_gzip` is `None` when the
/// platform has no NX GZIP accelerator, which is not the same as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    /// Primary dump device
    pub primary: String,
    /// Secondary dump device
    pub secondary: String,
    /// Directory the dump is copied to at boot
    pub copy_directory: String,
    /// Copy to external media if the boot-time copy fails
    pub forced_copy_flag: bool,
    /// Allow forcing a dump with the key switch in normal position
    pub always_allow_dump: bool,
    /// Whether dump compression is on (report only)
    pub dump_compression: bool,
    /// Active dump type
    pub dump_type: DumpType,
    /// Active full memory dump mode
    pub dump_mode: DumpMode,
    /// NX GZIP accelerated compression, if the platform has it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nx_gzip: Option<bool>,
}

/// Action requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Converge the system to the desired parameters
    #[default]
    Present,
    /// Report the current configuration only
    Fact,
}

/// Desired dump settings. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesiredParameters {
    /// Requested action
    pub state: State,
    /// Primary dump device
    pub primary: Option<String>,
    /// Secondary dump device
    pub secondary: Option<String>,
    /// Make dump device changes survive a reboot
    pub permanent: bool,
    /// Boot-time copy directory
    pub copy_directory: Option<String>,
    /// Requires `copy_directory`
    pub forced_copy_flag: Option<bool>,
    /// Key switch policy for forced dumps
    pub always_allow_dump: Option<bool>,
    /// Dump type; `fw-assisted` takes effect after reboot
    pub dump_type: Option<DumpType>,
    /// Requires `dump_type = fw-assisted`, both requested and active
    pub dump_mode: Option<DumpMode>,
    /// NX GZIP accelerated compression
    pub nx_gzip: Option<bool>,
}

impl DesiredParameters {
    /// Reject contradictory parameter combinations.
    ///
    /// Runs before the current configuration is queried.
    pub fn validate(&self) -> Result<()> {
        if self.permanent && self.primary.is_none() && self.secondary.is_none() {
            return Err(Error::Validation(
                "permanent is True but any of the following are missing: primary, secondary"
                    .to_string(),
            ));
        }

        if self.forced_copy_flag.is_some() && self.copy_directory.is_none() {
            return Err(Error::Validation(
                "parameters are required together: forced_copy_flag, copy_directory".to_string(),
            ));
        }

        if self.dump_mode.is_some() && self.dump_type != Some(DumpType::FwAssisted) {
            return Err(Error::Validation(
                "If 'dump_mode' is specified, 'dump_type' must be 'fw-assisted'.".to_string(),
            ));
        }

        Ok(())
    }

    /// Layer `overrides` on top of `self`, field by field.
    ///
    /// Specified values in `overrides` win. `state` is kept from `self`
    /// and `permanent` is set if either side sets it.
    pub fn overlay(self, overrides: DesiredParameters) -> Self {
        Self {
            state: self.state,
            primary: overrides.primary.or(self.primary),
            secondary: overrides.secondary.or(self.secondary),
            permanent: self.permanent || overrides.permanent,
            copy_directory: overrides.copy_directory.or(self.copy_directory),
            forced_copy_flag: overrides.forced_copy_flag.or(self.forced_copy_flag),
            always_allow_dump: overrides.always_allow_dump.or(self.always_allow_dump),
            dump_type: overrides.dump_type.or(self.dump_type),
            dump_mode: overrides.dump_mode.or(self.dump_mode),
            nx_gzip: overrides.nx_gzip.or(self.nx_gzip),
        }
    }
}

/// Uniform outcome of a `state=present` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    /// Whether the host was (or in dry-run mode would be) modified
    pub changed: bool,
    /// Command that was executed, or would be in dry-run mode
    #[serde(rename = "cmd")]
    pub command: String,
    /// Exit status of the apply command; empty when nothing ran
    #[serde(rename = "rc", serialize_with = "serialize_rc")]
    pub return_code: Option<i32>,
    /// Captured standard output of the apply command
    pub stdout: String,
    /// Captured standard error of the apply command
    pub stderr: String,
    /// Set when no modification was needed
    #[serde(rename = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReconciliationResult {
    /// Message reported when the system already matches
    pub const NO_CHANGE_MESSAGE: &'static str = "No modification is required";

    /// Result for a run where desired and current already match
    pub fn unchanged() -> Self {
        Self {
            return_code: Some(0),
            message: Some(Self::NO_CHANGE_MESSAGE.to_string()),
            ..Self::default()
        }
    }
}

fn serialize_rc<S: Serializer>(
    rc: &Option<i32>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match rc {
        Some(code) => serializer.serialize_i32(*code),
        None => serializer.serialize_str(""),
    }
}
