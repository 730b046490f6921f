//! xps-inspect - look inside XNALara/XPS scene files
//!
//! Decodes a `.scene` file and either dumps the decoded document, or shows what an import of
//! it would build, in target space coordinates.

use clap::{ArgAction, Args, Parser, Subcommand};
use commands::{dump::DumpCommand, plan::PlanCommand};
use log::LevelFilter;
use std::path::PathBuf;
use xps_scene::Version;
use xps_utils::{ok, AnyResult};

pub mod commands;
pub mod config;

pub use config::Settings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// TOML file with decoder and import settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Oldest accepted format version, e.g. 1.21
    #[arg(long, global = true)]
    pub min_version: Option<Version>,
    /// Find the end of bone lists by looking for a zero byte instead of trusting their count
    #[arg(long, global = true)]
    pub lookahead_bones: bool,
    /// Accept input files without the .scene extension
    #[arg(long, global = true)]
    pub any_extension: bool,
    /// Fail if anything was reported as a warning
    #[arg(long, global = true)]
    pub strict: bool,
    /// More log output, can be repeated
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl GlobalArgs {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Decodes a scene file and prints its contents
    Dump(DumpCommand),
    /// Shows everything an import of the scene would build
    Plan(PlanCommand),
}

pub trait Command {
    fn run(self, settings: &Settings) -> AnyResult;
}

/// Runs `xps-inspect` as if it was ran from the command line.
pub fn run(cli: Cli) -> AnyResult {
    let settings = Settings::load(&cli.global)?;
    match cli.command {
        CliCommand::Dump(c) => c.run(&settings)?,
        CliCommand::Plan(c) => c.run(&settings)?,
    }
    ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "xps-inspect",
            "dump",
            "lara.scene",
            "--min-version",
            "1.9",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.global.min_version, Some(Version::new(1, 9)));
        assert_eq!(cli.global.log_level(), LevelFilter::Debug);
        assert!(matches!(cli.command, CliCommand::Dump(_)));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["xps-inspect", "-q", "-v", "plan", "a.scene"]).is_err());
    }
}
