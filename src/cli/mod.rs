//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no sequencing logic - that belongs in the [`crate::core`] module.

pub mod output;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};

use crate::config::defaults::{ENV_BUILD_PATH, ENV_BUILD_TYPE, ENV_GENERATOR};
use crate::core::options::{
    default_parallel_jobs, parse_jobs, BuildType, Generator, OptionOverrides, Options,
};
use crate::core::project_config::ProjectConfig;
use crate::core::sequencer::Sequencer;
use crate::core::step::{render_step_list, Step};
use crate::infra::filesystem;
use crate::infra::process::{DryRunLauncher, SystemLauncher};
use crate::infra::toolchain::{Host, SystemHost};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nbuilt ",
    env!("VERGEN_BUILD_DATE"),
    " for ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    "\nrustc ",
    env!("VERGEN_RUSTC_SEMVER"),
);

/// Help for `-J`, showing the job count it resolves to on this machine
fn parallel_help() -> String {
    format!(
        "Enables parallel compilation with {} processes",
        default_parallel_jobs(SystemHost.logical_cpus())
    )
}

/// Buildseq - runs CMake build steps in order
///
/// Multiple steps are executed in order, except 'help', which will always
/// be the only one executed if included.
#[derive(Parser, Debug)]
#[command(name = "buildseq")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// List of one or more steps to run sequentially
    #[arg(value_enum, value_name = "STEP", hide_possible_values = true)]
    pub steps: Vec<Step>,

    /// Prints more info during execution (-v for info logs, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Forces compiler output to be ANSI-colored
    #[arg(short, long)]
    pub colorize: bool,

    /// Enables the generation of the deb package
    #[arg(short = 'd', long)]
    pub package_deb: bool,

    /// Enables the generation of the rpm package
    #[arg(short = 'r', long)]
    pub package_rpm: bool,

    /// Uses the provided CMake generator to build the project [default: Ninja]
    #[arg(short = 'G', long, value_enum, env = ENV_GENERATOR)]
    pub generator: Option<Generator>,

    #[arg(short = 'J', long, help = parallel_help())]
    pub parallel: bool,

    /// Enables parallel compilation with JOBS processes
    #[arg(short, long, value_parser = parse_jobs, allow_negative_numbers = true)]
    pub jobs: Option<usize>,

    /// Specifies which version of the project to build [default: release]
    #[arg(short, long, value_enum, env = ENV_BUILD_TYPE)]
    pub build_type: Option<BuildType>,

    /// Specifies which path to use to build the project [default: build]
    #[arg(short = 'p', long, value_name = "PATH", env = ENV_BUILD_PATH)]
    pub build_path: Option<PathBuf>,

    /// Project source directory [default: current directory]
    #[arg(short = 'S', long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Project config file [default: <source-dir>/buildseq.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Prints the commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppresses the per-step banner
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Clap command with the step list appended to the help text
    pub fn usage_command() -> clap::Command {
        <Self as CommandFactory>::command().after_help(render_step_list())
    }

    /// Parse arguments from an iterator, reporting errors as clap does
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::usage_command();
        let matches = command.try_get_matches_from_mut(args)?;
        Self::from_arg_matches(&matches).map_err(|e| e.format(&mut command))
    }

    /// Parse the process arguments, exiting on invalid input
    pub fn parse_args() -> Self {
        Self::try_parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Whether this invocation only prints usage
    pub fn wants_help(&self) -> bool {
        self.steps.is_empty() || self.steps.contains(&Step::Help)
    }

    /// Execute the requested steps
    pub fn run(self) -> Result<()> {
        if self.wants_help() {
            Self::usage_command().print_help()?;
            return Ok(());
        }

        let source_dir = filesystem::resolve_dir(
            self.source_dir.as_deref().unwrap_or_else(|| Path::new(".")),
        )
        .context("Invalid source directory")?;

        let config = match &self.config {
            Some(path) => ProjectConfig::load_required(path)?,
            None => ProjectConfig::load(&source_dir)?,
        };

        let options = Options::resolve(&self.overrides(source_dir), &config, &SystemHost)?;
        tracing::debug!(?options, "Resolved options");

        if self.dry_run {
            Sequencer::new(&options, DryRunLauncher::new(io::stdout()))
                .quiet(self.quiet)
                .run(&self.steps)?;
        } else {
            Sequencer::new(&options, SystemLauncher)
                .quiet(self.quiet)
                .run(&self.steps)?;
        }
        Ok(())
    }

    fn overrides(&self, source_dir: PathBuf) -> OptionOverrides {
        OptionOverrides {
            source_dir,
            build_path: self.build_path.clone(),
            generator: self.generator,
            build_type: self.build_type,
            jobs: self.jobs,
            parallel: self.parallel,
            verbose: self.verbose,
            colorize: self.colorize,
            package_deb: self.package_deb,
            package_rpm: self.package_rpm,
        }
    }
}
