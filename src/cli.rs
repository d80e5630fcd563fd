use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use dumpconf::{DesiredParameters, DumpMode, DumpType, State};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sysdump")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative manager for AIX system dump settings", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the current dump configuration
    Fact {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Converge dump settings to the desired state
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Apply
// ============================================================================

#[derive(Args)]
pub struct ApplyArgs {
    /// Desired state file (TOML or JSON); defaults to ~/.config/sysdump/desired.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Primary dump device
    #[arg(long)]
    pub primary: Option<String>,

    /// Secondary dump device
    #[arg(long)]
    pub secondary: Option<String>,

    /// Make dump device changes permanent
    #[arg(long)]
    pub permanent: bool,

    /// Directory the dump is copied to at boot
    #[arg(long)]
    pub copy_directory: Option<String>,

    /// Copy to external media if the boot-time copy fails (requires --copy-directory)
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub forced_copy_flag: Option<bool>,

    /// Allow forcing a dump with the key switch in normal position
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub always_allow_dump: Option<bool>,

    /// Dump type
    #[arg(long, value_enum)]
    pub dump_type: Option<DumpTypeArg>,

    /// Full memory dump mode (requires --dump-type fw-assisted)
    #[arg(long, value_enum)]
    pub dump_mode: Option<DumpModeArg>,

    /// NX GZIP accelerated dump compression
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub nx_gzip: Option<bool>,

    /// Show what would change without running sysdumpdev
    #[arg(short = 'n', long, visible_alias = "check")]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ApplyArgs {
    /// Parameters given on the command line, for layering over a file.
    ///
    /// `state` is not settable by flag; the file decides it.
    pub fn overrides(&self) -> DesiredParameters {
        DesiredParameters {
            state: State::Present,
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            permanent: self.permanent,
            copy_directory: self.copy_directory.clone(),
            forced_copy_flag: self.forced_copy_flag,
            always_allow_dump: self.always_allow_dump,
            dump_type: self.dump_type.map(Into::into),
            dump_mode: self.dump_mode.map(Into::into),
            nx_gzip: self.nx_gzip,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DumpTypeArg {
    Traditional,
    #[value(name = "fw-assisted")]
    FwAssisted,
}

impl From<DumpTypeArg> for DumpType {
    fn from(arg: DumpTypeArg) -> Self {
        match arg {
            DumpTypeArg::Traditional => DumpType::Traditional,
            DumpTypeArg::FwAssisted => DumpType::FwAssisted,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum DumpModeArg {
    Disallow,
    Allow,
    AllowKernel,
    RequireKernel,
    AllowFull,
    RequireFull,
}

impl From<DumpModeArg> for DumpMode {
    fn from(arg: DumpModeArg) -> Self {
        match arg {
            DumpModeArg::Disallow => DumpMode::Disallow,
            DumpModeArg::Allow => DumpMode::Allow,
            DumpModeArg::AllowKernel => DumpMode::AllowKernel,
            DumpModeArg::RequireKernel => DumpMode::RequireKernel,
            DumpModeArg::AllowFull => DumpMode::AllowFull,
            DumpModeArg::RequireFull => DumpMode::RequireFull,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_apply_flags_map_to_parameters() {
        let cli = Cli::parse_from([
            "sysdump",
            "apply",
            "--primary",
            "/dev/sysdump0",
            "--permanent",
            "--forced-copy-flag",
            "false",
            "--copy-directory",
            "/var/adm/dump",
            "--dump-type",
            "fw-assisted",
            "--dump-mode",
            "require_full",
            "--check",
        ]);

        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        assert!(args.dry_run);

        let desired = args.overrides();
        assert_eq!(desired.primary.as_deref(), Some("/dev/sysdump0"));
        assert!(desired.permanent);
        assert_eq!(desired.forced_copy_flag, Some(false));
        assert_eq!(desired.dump_type, Some(DumpType::FwAssisted));
        assert_eq!(desired.dump_mode, Some(DumpMode::RequireFull));
        assert_eq!(desired.secondary, None);
    }

    #[test]
    fn test_rejects_unknown_dump_mode() {
        let result = Cli::try_parse_from(["sysdump", "apply", "--dump-mode", "full"]);
        assert!(result.is_err());
    }
}
