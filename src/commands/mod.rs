//! Command implementations for the sysdump CLI

pub mod apply;
pub mod fact;

use serde::Serialize;

/// JSON shape printed when a command fails with `--json`
#[derive(Debug, Serialize)]
struct Failure<'a> {
    failed: bool,
    msg: String,
    cmd: &'a str,
    rc: Option<i32>,
    stdout: &'a str,
    stderr: &'a str,
}

/// Print a dumpconf error as JSON on stdout
fn print_failure(err: &dumpconf::Error) -> anyhow::Result<()> {
    let (cmd, stdout, stderr) = err.command_output().unwrap_or(("", "", ""));
    let failure = Failure {
        failed: true,
        msg: err.to_string(),
        cmd,
        rc: err.exit_code(),
        stdout,
        stderr,
    };
    println!("{}", serde_json::to_string_pretty(&failure)?);
    Ok(())
}

/// Convert a dumpconf error for the caller, printing it first in JSON mode
fn fail(err: dumpconf::Error, json: bool) -> anyhow::Error {
    if json {
        if let Err(e) = print_failure(&err) {
            log::warn!("could not render failure as JSON: {e}");
        }
    }
    anyhow::Error::new(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_shape() {
        let err = dumpconf::Error::CommandFailed {
            command: "/usr/bin/sysdumpdev -K".to_string(),
            rc: 1,
            stdout: String::new(),
            stderr: "0453-041 not authorized".to_string(),
        };
        let (cmd, stdout, stderr) = err.command_output().unwrap();
        let failure = Failure {
            failed: true,
            msg: err.to_string(),
            cmd,
            rc: err.exit_code(),
            stdout,
            stderr,
        };

        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["failed"], true);
        assert_eq!(
            json["msg"],
            "Failed to run sysdumpdev command: /usr/bin/sysdumpdev -K"
        );
        assert_eq!(json["rc"], 1);
        assert_eq!(json["stderr"], "0453-041 not authorized");
    }
}
