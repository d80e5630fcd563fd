//! `sysdump fact` - report the current dump configuration

use anyhow::Result;
use dumpconf::{Client, ConfigurationRecord};
use serde::Serialize;

use crate::Context;
use crate::ui;

#[derive(Serialize)]
struct FactsOutput<'a> {
    changed: bool,
    sysdumpdev_config: &'a ConfigurationRecord,
}

/// Run the fact command
pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let client = Client::new().map_err(|e| super::fail(e, json))?;
    let record = client.facts().map_err(|e| super::fail(e, json))?;
    report(ctx, &record, json)
}

/// Print a fetched record as a table or JSON
pub fn report(ctx: &Context, record: &ConfigurationRecord, json: bool) -> Result<()> {
    if json {
        let output = FactsOutput {
            changed: false,
            sysdumpdev_config: record,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_record(ctx, record);
    Ok(())
}

fn print_record(ctx: &Context, record: &ConfigurationRecord) {
    if !ctx.quiet {
        ui::header("System dump configuration");
    }
    ui::kv("primary", &record.primary);
    ui::kv("secondary", &record.secondary);
    ui::kv("copy directory", &record.copy_directory);
    ui::kv("forced copy flag", ui::on_off(record.forced_copy_flag));
    ui::kv("always allow dump", ui::on_off(record.always_allow_dump));
    ui::kv("dump compression", ui::on_off(record.dump_compression));
    ui::kv("type of dump", record.dump_type.as_str());
    ui::kv("full memory dump", record.dump_mode.as_str());
    match record.nx_gzip {
        Some(enabled) => ui::kv("enable NX GZIP", ui::on_off(enabled)),
        None => {
            if ctx.verbose > 0 {
                ui::dim("NX GZIP not available on this system");
            }
        }
    }
}
