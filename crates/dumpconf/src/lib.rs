//! # dumpconf
//!
//! Declarative management of AIX system dump settings.
//!
//! The crate reads the current dump configuration with `sysdumpdev -l`,
//! compares it with a set of desired parameters, and converges the two
//! with a single `sysdumpdev` call carrying only the options that
//! actually change something.
//!
//! ## Example
//!
//! ```no_run
//! use dumpconf::{Client, DesiredParameters};
//!
//! let client = Client::new().expect("sysdumpdev not available");
//!
//! let desired = DesiredParameters {
//!     primary: Some("/dev/sysdump0".into()),
//!     secondary: Some("/dev/sysdump1".into()),
//!     permanent: true,
//!     ..Default::default()
//! };
//!
//! // Preview only; nothing is executed
//! let preview = client.reconcile(&desired, true).expect("reconcile failed");
//! println!("{}", preview.command);
//! ```
//!
//! ## Concurrency
//!
//! Dump settings are host-global. Nothing here serializes concurrent
//! callers, so two uncoordinated reconciliations on one host can act on
//! stale state. Serialize them outside this crate.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

/// Runner abstraction over the sysdumpdev command.
pub mod backend;
/// Ordered sysdumpdev option builder.
pub mod changeset;
/// Error types for dump configuration operations.
pub mod error;
/// Desired-state reconciliation.
pub mod reconcile;
/// `sysdumpdev -l` report parsing.
pub mod report;
/// Configuration and request types.
pub mod types;

#[cfg(test)]
mod testing;

pub use backend::{CommandOutput, CommandRunner};
pub use changeset::ChangeSet;
pub use error::{Error, Result};
pub use types::{
    ConfigurationRecord, DesiredParameters, DumpMode, DumpType, ReconciliationResult, State,
};

/// What a request produced, depending on its `state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `state=fact`: the current configuration, verbatim
    Facts(ConfigurationRecord),
    /// `state=present`: the reconciliation result
    Reconciled(ReconciliationResult),
}

/// High-level client for dump configuration.
///
/// Every call fetches a fresh configuration; nothing is cached.
pub struct Client {
    runner: Box<dyn CommandRunner>,
}

impl Client {
    /// Create a client that runs the sysdumpdev found in `PATH`.
    pub fn new() -> Result<Self> {
        let runner = backend::default_runner()?;
        Ok(Self {
            runner: Box::new(runner),
        })
    }

    /// Create a client with a custom runner (useful for testing).
    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Read the current configuration. Read-only.
    pub fn facts(&self) -> Result<ConfigurationRecord> {
        report::fetch(self.runner.as_ref())
    }

    /// Converge the host to `desired`.
    ///
    /// The parameters are validated first, then the current configuration
    /// is fetched and diffed. With `dry_run` set, the resulting command is
    /// reported but not executed.
    pub fn reconcile(
        &self,
        desired: &DesiredParameters,
        dry_run: bool,
    ) -> Result<ReconciliationResult> {
        desired.validate()?;
        let current = self.facts()?;
        reconcile::reconcile(self.runner.as_ref(), desired, &current, dry_run)
    }

    /// Dispatch a request on its `state`.
    ///
    /// Validation runs before anything is queried, for both states.
    pub fn run(&self, desired: &DesiredParameters, dry_run: bool) -> Result<Outcome> {
        match desired.state {
            State::Fact => {
                desired.validate()?;
                self.facts().map(Outcome::Facts)
            }
            State::Present => self.reconcile(desired, dry_run).map(Outcome::Reconciled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRunner, SAMPLE_REPORT};
    use std::sync::Arc;

    #[test]
    fn test_second_run_is_idempotent() {
        let runner = Arc::new(FakeRunner::new(SAMPLE_REPORT));
        let client = Client::with_runner(Box::new(Arc::clone(&runner)));
        let desired = DesiredParameters {
            always_allow_dump: Some(true),
            ..Default::default()
        };

        let first = client.reconcile(&desired, false).unwrap();
        assert!(first.changed);

        // Host now reports the applied value
        runner.set_report(&SAMPLE_REPORT.replace(
            "always allow dump    FALSE",
            "always allow dump    TRUE",
        ));

        let second = client.reconcile(&desired, false).unwrap();
        assert!(!second.changed);
        assert_eq!(runner.apply_calls().len(), 1);
        assert_eq!(runner.query_calls(), 2);
    }

    #[test]
    fn test_validation_runs_before_query() {
        let runner = Arc::new(FakeRunner::new(SAMPLE_REPORT));
        let client = Client::with_runner(Box::new(Arc::clone(&runner)));
        let desired = DesiredParameters {
            dump_mode: Some(DumpMode::Allow),
            ..Default::default()
        };

        assert!(matches!(
            client.reconcile(&desired, false),
            Err(Error::Validation(_))
        ));
        let facts_request = DesiredParameters {
            state: State::Fact,
            ..desired
        };
        assert!(client.run(&facts_request, false).is_err());
        assert_eq!(runner.query_calls(), 0);
    }

    #[test]
    fn test_run_dispatches_on_state() {
        let runner = Arc::new(FakeRunner::new(SAMPLE_REPORT));
        let client = Client::with_runner(Box::new(Arc::clone(&runner)));

        let facts = DesiredParameters {
            state: State::Fact,
            primary: Some("/dev/sysdump0".to_string()),
            ..Default::default()
        };
        match client.run(&facts, false).unwrap() {
            Outcome::Facts(record) => assert_eq!(record.primary, "/dev/lg_dumplv"),
            other => panic!("expected facts, got {other:?}"),
        }
        assert!(runner.apply_calls().is_empty());

        let present = DesiredParameters {
            state: State::Present,
            ..facts
        };
        match client.run(&present, true).unwrap() {
            Outcome::Reconciled(result) => {
                assert_eq!(result.command, "sysdumpdev -p /dev/sysdump0");
            }
            other => panic!("expected reconciliation, got {other:?}"),
        }
        assert!(runner.apply_calls().is_empty());
    }
}
