//! Desired-state reconciliation for sysdumpdev.
//!
//! [`plan`] compares desired parameters with a fresh
//! [`ConfigurationRecord`] and builds the smallest [`ChangeSet`] that
//! converges them. [`reconcile`] runs that plan, at most once, unless in
//! dry-run mode.

use crate::backend::{COMMAND_NAME, CommandRunner};
use crate::changeset::ChangeSet;
use crate::error::{Error, Result};
use crate::types::{ConfigurationRecord, DesiredParameters, DumpType, ReconciliationResult};

/// Returns the desired value when it is specified and differs from current.
fn wanted<'a, T: PartialEq + ?Sized>(desired: Option<&'a T>, current: &T) -> Option<&'a T> {
    desired.filter(|value| *value != current)
}

/// Compute the sysdumpdev options needed to reach `desired`.
///
/// Checks run in a fixed order: dump devices, copy policy,
/// always-allow-dump, NX GZIP, dump type, dump mode. An unsupported or
/// unmet request aborts the whole plan.
pub fn plan(desired: &DesiredParameters, current: &ConfigurationRecord) -> Result<ChangeSet> {
    let mut changes = ChangeSet::new();

    // Dump devices, optionally made permanent
    let mut device_changed = false;
    if let Some(primary) = wanted(desired.primary.as_deref(), current.primary.as_str()) {
        changes.option("-p", primary);
        device_changed = true;
    }
    if let Some(secondary) = wanted(desired.secondary.as_deref(), current.secondary.as_str()) {
        changes.option("-s", secondary);
        device_changed = true;
    }
    if desired.permanent && device_changed {
        changes.flag("-P");
    }

    // Copy directory and forced copy flag travel together in one option
    let mut target_directory = current.copy_directory.as_str();
    let mut target_forced = current.forced_copy_flag;
    let mut copy_changed = false;
    if let Some(directory) = wanted(
        desired.copy_directory.as_deref(),
        current.copy_directory.as_str(),
    ) {
        target_directory = directory;
        copy_changed = true;
    }
    if let Some(&forced) = wanted(desired.forced_copy_flag.as_ref(), &current.forced_copy_flag) {
        target_forced = forced;
        copy_changed = true;
    }
    if copy_changed {
        let flag = if target_forced { "-D" } else { "-d" };
        changes.option(flag, target_directory);
    }

    if let Some(&allow) = wanted(desired.always_allow_dump.as_ref(), &current.always_allow_dump) {
        changes.flag(if allow { "-K" } else { "-k" });
    }

    if let Some(nx_gzip) = desired.nx_gzip {
        let Some(current_nx_gzip) = current.nx_gzip else {
            return Err(Error::UnsupportedFeature("nx_gzip"));
        };
        if nx_gzip != current_nx_gzip {
            changes.flag(if nx_gzip { "-N" } else { "-n" });
        }
    }

    if let Some(dump_type) = wanted(desired.dump_type.as_ref(), &current.dump_type) {
        changes.option("-t", dump_type.as_str());
    }

    // Checked even when the requested mode is already active
    if let Some(dump_mode) = desired.dump_mode {
        if current.dump_type != DumpType::FwAssisted {
            return Err(Error::Precondition(
                "dump_type must be fw-assisted before you configure dump_mode".to_string(),
            ));
        }
        if dump_mode != current.dump_mode {
            changes.option("-f", dump_mode.as_str());
        }
    }

    Ok(changes)
}

/// Converge the system to `desired`.
///
/// With `dry_run` set, the command is reported but never run.
pub fn reconcile(
    runner: &dyn CommandRunner,
    desired: &DesiredParameters,
    current: &ConfigurationRecord,
    dry_run: bool,
) -> Result<ReconciliationResult> {
    let changes = plan(desired, current)?;

    if !changes.is_changed() {
        log::info!("dump configuration already matches");
        return Ok(ReconciliationResult::unchanged());
    }

    if dry_run {
        let command = changes.command_line(COMMAND_NAME);
        log::info!("dry run, would run: {command}");
        return Ok(ReconciliationResult {
            changed: true,
            command,
            ..Default::default()
        });
    }

    let output = runner.apply(&changes.args())?;
    if !output.success() {
        return Err(Error::CommandFailed {
            command: output.command,
            rc: output.rc,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    log::info!("applied: {}", output.command);
    Ok(ReconciliationResult {
        changed: true,
        command: output.command,
        return_code: Some(output.rc),
        stdout: output.stdout,
        stderr: output.stderr,
        message: None,
    })
}
