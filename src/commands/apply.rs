//! `sysdump apply` - converge dump settings to the desired state

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use dumpconf::{Client, DesiredParameters, Outcome, ReconciliationResult};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::config;
use crate::ui;

/// Run the apply command
pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let desired = desired_parameters(&args)?;
    log::debug!("desired parameters: {desired:?}");

    let client = Client::new().map_err(|e| super::fail(e, args.json))?;
    let result = match client
        .run(&desired, args.dry_run)
        .map_err(|e| super::fail(e, args.json))?
    {
        Outcome::Facts(record) => return super::fact::report(ctx, &record, args.json),
        Outcome::Reconciled(result) => result,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(ctx, &result, args.dry_run);
    Ok(())
}

/// File values, overridden by flags given on the command line.
///
/// `state` comes from the file; flags cannot change it. The result is
/// validated here, before sysdumpdev is looked up.
fn desired_parameters(args: &ApplyArgs) -> Result<DesiredParameters> {
    let file = config::load(args.config.as_deref()).context("Failed to load desired state")?;
    let desired = file.overlay(args.overrides());
    desired.validate().map_err(|e| super::fail(e, args.json))?;
    Ok(desired)
}

fn print_result(ctx: &Context, result: &ReconciliationResult, dry_run: bool) {
    if !result.changed {
        if !ctx.quiet {
            ui::success(
                result
                    .message
                    .as_deref()
                    .unwrap_or(ReconciliationResult::NO_CHANGE_MESSAGE),
            );
        }
        return;
    }

    if dry_run {
        ui::info(&format!("Would run: {}", result.command.bold()));
        ui::dim("Dry run - no changes made");
        return;
    }

    ui::success(&format!("Ran: {}", result.command.bold()));
    if ctx.verbose > 0 {
        if !result.stdout.trim().is_empty() {
            println!("{}", ui::indent(result.stdout.trim_end()));
        }
        if !result.stderr.trim().is_empty() {
            ui::warn("sysdumpdev wrote to stderr:");
            println!("{}", ui::indent(result.stderr.trim_end()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use dumpconf::State;
    use std::fs;

    fn apply_args(argv: &[&str]) -> ApplyArgs {
        let mut full = vec!["sysdump", "apply"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Apply(args) => args,
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desired.toml");
        fs::write(
            &path,
            "primary = \"/dev/lg_dumplv\"\nalways_allow_dump = false\n",
        )
        .unwrap();
        let path_str = path.to_string_lossy().to_string();

        let args = apply_args(&["--config", &path_str, "--primary", "/dev/sysdump0"]);
        let desired = desired_parameters(&args).unwrap();
        assert_eq!(desired.primary.as_deref(), Some("/dev/sysdump0"));
        assert_eq!(desired.always_allow_dump, Some(false));
    }

    #[test]
    fn test_file_state_survives_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desired.toml");
        fs::write(&path, "state = \"fact\"\nalways_allow_dump = true\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let args = apply_args(&["--config", &path_str, "--nx-gzip", "false"]);
        let desired = desired_parameters(&args).unwrap();
        assert_eq!(desired.state, State::Fact);
        assert_eq!(desired.nx_gzip, Some(false));
    }

    #[test]
    fn test_contradictory_flags_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desired.toml");
        fs::write(&path, "").unwrap();
        let path_str = path.to_string_lossy().to_string();
        let args = apply_args(&["--config", &path_str, "--dump-mode", "allow"]);
        let err = desired_parameters(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<dumpconf::Error>(),
            Some(dumpconf::Error::Validation(_))
        ));
    }
}
