//! Options record
//!
//! Resolves the settings shared by every step, with priority
//! CLI (or environment) > project config > built-in default.
//! The result is read-only for the rest of the run.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    DEFAULT_BUILD_PATH, DEFAULT_ELEVATE, INSTALL_MANIFEST_NAME, PARALLEL_SHARE,
};
use crate::core::project_config::ProjectConfig;
use crate::error::ConfigError;
use crate::infra::toolchain::Host;

/// CMake generator backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Generator {
    /// Ninja build files
    #[value(name = "Ninja")]
    #[serde(rename = "Ninja")]
    Ninja,
    /// Makefiles for make
    #[value(name = "Unix Makefiles")]
    #[serde(rename = "Unix Makefiles")]
    UnixMakefiles,
}

impl Generator {
    /// Name CMake expects after `-G`
    pub fn cmake_name(self) -> &'static str {
        match self {
            Self::Ninja => "Ninja",
            Self::UnixMakefiles => "Unix Makefiles",
        }
    }

    /// Executable the generated files are driven by
    pub fn executable(self) -> &'static str {
        match self {
            Self::Ninja => "ninja",
            Self::UnixMakefiles => "make",
        }
    }

    /// Generator to fall back to when this one's executable is missing
    pub fn alternate(self) -> Self {
        match self {
            Self::Ninja => Self::UnixMakefiles,
            Self::UnixMakefiles => Self::Ninja,
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmake_name())
    }
}

/// Which flavour of the project to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildType {
    /// Optimized build
    Release,
    /// Unoptimized build with debug info
    Debug,
    /// Optimized build with debug info
    ReleaseWdebug,
}

impl BuildType {
    /// Value passed through as `CMAKE_BUILD_TYPE` and `ctest -C`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
            Self::ReleaseWdebug => "release-wdebug",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a flag the way CMake cache variables expect it
pub fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

/// Values given on the command line (or through the environment)
///
/// `None` and `false` mean "not given", so project config can fill them in.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub source_dir: PathBuf,
    pub build_path: Option<PathBuf>,
    pub generator: Option<Generator>,
    pub build_type: Option<BuildType>,
    pub jobs: Option<usize>,
    pub parallel: bool,
    pub verbose: u8,
    pub colorize: bool,
    pub package_deb: bool,
    pub package_rpm: bool,
}

/// Resolved settings shared by every step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Project source directory (`cmake -S`)
    pub source_dir: PathBuf,
    /// Build output directory (`cmake -B`)
    pub build_path: PathBuf,
    pub build_type: BuildType,
    pub generator: Generator,
    /// Parallel job count handed to the build tool
    pub jobs: usize,
    pub verbose: bool,
    pub colorize: bool,
    pub package_deb: bool,
    pub package_rpm: bool,
    /// Program prefixed to privileged commands, if any
    pub elevate: Option<String>,
    /// User that should own generated packages
    pub user: Option<String>,
}

impl Options {
    /// Options for `source_dir` with every default applied
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            build_path: PathBuf::from(DEFAULT_BUILD_PATH),
            build_type: BuildType::Release,
            generator: Generator::Ninja,
            jobs: 1,
            verbose: false,
            colorize: false,
            package_deb: false,
            package_rpm: false,
            elevate: Some(DEFAULT_ELEVATE.to_string()),
            user: None,
        }
    }

    /// Merge CLI values, project config and host facts into one record
    pub fn resolve(
        overrides: &OptionOverrides,
        config: &ProjectConfig,
        host: &dyn Host,
    ) -> Result<Self, ConfigError> {
        let cpus = host.logical_cpus();
        let build = &config.build;

        let config_jobs = build.jobs.map(positive_jobs).transpose()?;
        let jobs = resolve_jobs(
            overrides.jobs.or(config_jobs),
            overrides.parallel || build.parallel.unwrap_or(false),
            cpus,
        );

        let requested = overrides
            .generator
            .or(build.generator)
            .unwrap_or(Generator::Ninja);

        let elevate = match &config.privilege.elevate {
            Some(program) if program.trim().is_empty() => None,
            Some(program) => Some(program.trim().to_string()),
            None => Some(DEFAULT_ELEVATE.to_string()),
        };

        Ok(Self {
            source_dir: overrides.source_dir.clone(),
            build_path: overrides
                .build_path
                .clone()
                .or_else(|| build.build_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_PATH)),
            build_type: overrides
                .build_type
                .or(build.build_type)
                .unwrap_or(BuildType::Release),
            generator: resolve_generator(requested, host),
            jobs,
            verbose: overrides.verbose > 0,
            colorize: overrides.colorize || build.colorize.unwrap_or(false),
            package_deb: overrides.package_deb || config.package.deb.unwrap_or(false),
            package_rpm: overrides.package_rpm || config.package.rpm.unwrap_or(false),
            elevate,
            user: host.current_user(),
        })
    }

    /// Where CMake records installed files
    pub fn install_manifest_path(&self) -> PathBuf {
        self.build_path.join(INSTALL_MANIFEST_NAME)
    }

    /// Build directory as a path reference
    pub fn build_dir(&self) -> &Path {
        &self.build_path
    }
}

/// Parse a `--jobs` value, rejecting zero and negative numbers
///
/// Clamping to the CPU count happens during [`Options::resolve`].
pub fn parse_jobs(raw: &str) -> Result<usize, String> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a valid number of CPUs"))?;
    positive_jobs(value).map_err(|e| e.to_string())
}

fn positive_jobs(value: i64) -> Result<usize, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidJobs { value });
    }
    usize::try_from(value).map_err(|_| ConfigError::InvalidJobs { value })
}

/// Job count used by `-J` when no explicit count is given
pub fn default_parallel_jobs(cpus: usize) -> usize {
    let (num, den) = PARALLEL_SHARE;
    (cpus * num / den).max(1)
}

/// Pick the job count: explicit (clamped) > `-J` share > 1
pub fn resolve_jobs(explicit: Option<usize>, parallel: bool, cpus: usize) -> usize {
    let cpus = cpus.max(1);
    match explicit {
        Some(jobs) => jobs.clamp(1, cpus),
        None if parallel => default_parallel_jobs(cpus),
        None => 1,
    }
}

/// Fall back to the alternate generator when the requested one is unusable
pub fn resolve_generator(requested: Generator, host: &dyn Host) -> Generator {
    if host.has_executable(requested.executable()) {
        return requested;
    }
    let alternate = requested.alternate();
    if host.has_executable(alternate.executable()) {
        tracing::warn!(
            "{} not found, falling back to {} generator",
            requested.executable(),
            alternate
        );
        return alternate;
    }
    tracing::warn!(
        "neither {} nor {} found on PATH, keeping {} generator",
        requested.executable(),
        alternate.executable(),
        requested
    );
    requested
}
