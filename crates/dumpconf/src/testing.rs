//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use crate::backend::{CommandOutput, CommandRunner};
use crate::error::Result;

/// `sysdumpdev -l` output from a POWER9 LPAR with NX GZIP.
pub const SAMPLE_REPORT: &str = "\
primary              /dev/lg_dumplv
secondary            /dev/sysdumpnull
copy directory       /var/adm/ras
forced copy flag     TRUE
always allow dump    FALSE
dump compression     ON
type of dump         fw-assisted
full memory dump     disallow
enable NX GZIP       ON
";

/// Same host class without the NX accelerator, traditional dump.
pub const SAMPLE_REPORT_NO_NX: &str = "\
primary              /dev/hd6
secondary            /dev/sysdumpnull
copy directory       /var/adm/ras
forced copy flag     TRUE
always allow dump    FALSE
dump compression     ON
type of dump         traditional
full memory dump     disallow
";

const PROGRAM: &str = "/usr/bin/sysdumpdev";

/// Runner that returns canned output and records apply calls.
pub struct FakeRunner {
    report: Mutex<String>,
    query_rc: i32,
    apply_rc: i32,
    queries: Mutex<usize>,
    applies: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(report: &str) -> Self {
        Self {
            report: Mutex::new(report.to_string()),
            query_rc: 0,
            apply_rc: 0,
            queries: Mutex::new(0),
            applies: Mutex::new(Vec::new()),
        }
    }

    pub fn with_query_rc(mut self, rc: i32) -> Self {
        self.query_rc = rc;
        self
    }

    pub fn with_apply_rc(mut self, rc: i32) -> Self {
        self.apply_rc = rc;
        self
    }

    /// Replace the report returned by later queries
    pub fn set_report(&self, report: &str) {
        *self.report.lock().unwrap() = report.to_string();
    }

    pub fn query_calls(&self) -> usize {
        *self.queries.lock().unwrap()
    }

    pub fn apply_calls(&self) -> Vec<Vec<String>> {
        self.applies.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn query(&self) -> Result<CommandOutput> {
        *self.queries.lock().unwrap() += 1;
        Ok(CommandOutput {
            command: format!("{PROGRAM} -l"),
            rc: self.query_rc,
            stdout: self.report.lock().unwrap().clone(),
            stderr: String::new(),
        })
    }

    fn apply(&self, args: &[String]) -> Result<CommandOutput> {
        self.applies.lock().unwrap().push(args.to_vec());
        Ok(CommandOutput {
            command: format!("{PROGRAM} {}", args.join(" ")),
            rc: self.apply_rc,
            stdout: "sample stdout".to_string(),
            stderr: "sample stderr".to_string(),
        })
    }
}
