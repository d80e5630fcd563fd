//! Parsing of the `sysdumpdev -l` report.
//!
//! The report is line oriented. Each known fact sits on its own line,
//! begins with a fixed prefix and carries its value in a fixed
//! whitespace-separated token position:
//!
//! ```text
//! primary              /dev/lg_dumplv
//! secondary            /dev/sysdumpnull
//! copy directory       /var/adm/ras
//! forced copy flag     TRUE
//! always allow dump    FALSE
//! dump compression     ON
//! type of dump         fw-assisted
//! full memory dump     disallow
//! enable NX GZIP       ON
//! ```
//!
//! Unknown lines are skipped so newer AIX levels can add fields.

use crate::backend::{COMMAND_NAME, CommandRunner};
use crate::error::{Error, Result};
use crate::types::ConfigurationRecord;

#[derive(Debug, Clone, Copy)]
enum Field {
    Primary,
    Secondary,
    CopyDirectory,
    ForcedCopyFlag,
    AlwaysAllowDump,
    DumpCompression,
    DumpType,
    DumpMode,
    NxGzip,
}

/// Line prefix, index of the value token, and the field it fills.
const LAYOUT: [(&str, usize, Field); 9] = [
    ("primary", 1, Field::Primary),
    ("secondary", 1, Field::Secondary),
    ("copy directory", 2, Field::CopyDirectory),
    ("forced copy flag", 3, Field::ForcedCopyFlag),
    ("always allow dump", 3, Field::AlwaysAllowDump),
    ("dump compression", 2, Field::DumpCompression),
    ("type of dump", 3, Field::DumpType),
    ("full memory dump", 3, Field::DumpMode),
    ("enable NX GZIP", 3, Field::NxGzip),
];

/// Raw tokens collected from the report before typing.
#[derive(Debug, Default)]
struct RawReport<'a> {
    primary: Option<&'a str>,
    secondary: Option<&'a str>,
    copy_directory: Option<&'a str>,
    forced_copy_flag: Option<&'a str>,
    always_allow_dump: Option<&'a str>,
    dump_compression: Option<&'a str>,
    dump_type: Option<&'a str>,
    dump_mode: Option<&'a str>,
    nx_gzip: Option<&'a str>,
}

impl<'a> RawReport<'a> {
    fn slot(&mut self, field: Field) -> &mut Option<&'a str> {
        match field {
            Field::Primary => &mut self.primary,
            Field::Secondary => &mut self.secondary,
            Field::CopyDirectory => &mut self.copy_directory,
            Field::ForcedCopyFlag => &mut self.forced_copy_flag,
            Field::AlwaysAllowDump => &mut self.always_allow_dump,
            Field::DumpCompression => &mut self.dump_compression,
            Field::DumpType => &mut self.dump_type,
            Field::DumpMode => &mut self.dump_mode,
            Field::NxGzip => &mut self.nx_gzip,
        }
    }
}

/// Query sysdumpdev and parse its report.
///
/// A nonzero exit from the list command is an error.
pub fn fetch(runner: &dyn CommandRunner) -> Result<ConfigurationRecord> {
    let output = runner.query()?;
    if !output.success() {
        log::warn!("{COMMAND_NAME} -l exited with {}", output.rc);
        return Err(Error::CommandFailed {
            command: output.command,
            rc: output.rc,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    parse(&output.stdout)
}

/// Parse the text of a `sysdumpdev -l` report.
pub fn parse(report: &str) -> Result<ConfigurationRecord> {
    let mut raw = RawReport::default();

    for line in report.lines() {
        let Some(&(_, index, field)) = LAYOUT
            .iter()
            .find(|(prefix, _, _)| line.starts_with(prefix))
        else {
            continue;
        };

        let value = line
            .split_whitespace()
            .nth(index)
            .ok_or_else(|| Error::MalformedReport(line.to_string()))?;
        // Later lines override earlier ones
        *raw.slot(field) = Some(value);
    }

    let record = ConfigurationRecord {
        primary: require(raw.primary, "primary")?.to_string(),
        secondary: require(raw.secondary, "secondary")?.to_string(),
        copy_directory: require(raw.copy_directory, "copy_directory")?.to_string(),
        forced_copy_flag: required_flag(raw.forced_copy_flag, "forced_copy_flag")?,
        always_allow_dump: required_flag(raw.always_allow_dump, "always_allow_dump")?,
        dump_compression: required_flag(raw.dump_compression, "dump_compression")?,
        dump_type: require(raw.dump_type, "dump_type")?.parse()?,
        dump_mode: require(raw.dump_mode, "dump_mode")?.parse()?,
        nx_gzip: raw.nx_gzip.map(|v| flag(v, "nx_gzip")).transpose()?,
    };

    log::debug!("parsed dump configuration: {record:?}");
    Ok(record)
}

fn require<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    value.ok_or(Error::MissingField(field))
}

fn required_flag(value: Option<&str>, field: &'static str) -> Result<bool> {
    flag(require(value, field)?, field)
}

/// Normalize a sysdumpdev boolean token.
fn flag(value: &str, field: &'static str) -> Result<bool> {
    match value {
        "TRUE" | "ON" => Ok(true),
        "FALSE" | "OFF" => Ok(false),
        other => Err(Error::InvalidValue {
            field,
            value: other.to_string(),
        }),
    }
}
