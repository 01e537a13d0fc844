//! Command sequencer
//!
//! Runs the requested steps in order. A step already in the ledger is
//! skipped; `clean` always runs and empties the ledger. Composite steps
//! perform their prerequisite's action first without touching the ledger.
//! The first failing command aborts the whole run.

use std::io::{self, Write};

use crate::config::defaults::REMOVE_BATCH_BYTES;
use crate::core::install_manifest::InstallManifest;
use crate::core::ledger::Ledger;
use crate::core::options::{on_off, Options};
use crate::core::step::Step;
use crate::error::StepError;
use crate::infra::process::{CommandLine, Launcher};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Usage was requested; nothing ran
    Help,
    /// Every requested step finished
    Completed(RunSummary),
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Ledger at the end of the run
    pub ledger: Ledger,
    /// Number of command lines handed to the launcher
    pub launched: usize,
}

/// Executes a sequence of steps against one options record
pub struct Sequencer<'a, L: Launcher> {
    options: &'a Options,
    launcher: L,
    console: Box<dyn Write + 'a>,
    banners: bool,
    ledger: Ledger,
    launched: usize,
}

impl<'a, L: Launcher> Sequencer<'a, L> {
    /// Create a sequencer printing progress to stdout
    pub fn new(options: &'a Options, launcher: L) -> Self {
        Self {
            options,
            launcher,
            console: Box::new(io::stdout()),
            banners: true,
            ledger: Ledger::new(),
            launched: 0,
        }
    }

    /// Send user-facing progress to `console` instead of stdout
    #[must_use]
    pub fn with_console(mut self, console: impl Write + 'a) -> Self {
        self.console = Box::new(console);
        self
    }

    /// Suppress the per-step banner
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.banners = !quiet;
        self
    }

    /// Run `steps` in order
    ///
    /// An empty sequence, or one naming `help` anywhere, runs nothing and
    /// reports [`RunOutcome::Help`].
    pub fn run(mut self, steps: &[Step]) -> Result<RunOutcome, StepError> {
        if steps.is_empty() || steps.contains(&Step::Help) {
            return Ok(RunOutcome::Help);
        }

        for &step in steps {
            if !step.is_rerunnable() && self.ledger.contains(step) {
                tracing::debug!("Skipping step {step}: already ran");
                continue;
            }

            if self.banners {
                writeln!(self.console, " +------- Running step {step}")?;
                writeln!(self.console)?;
            }
            tracing::info!("Running step {step}");

            self.perform(step)?;
            self.ledger.record(step);
        }

        tracing::info!(
            executed = ?self.ledger.steps(),
            launched = self.launched,
            "Sequence complete"
        );
        Ok(RunOutcome::Completed(RunSummary {
            ledger: self.ledger,
            launched: self.launched,
        }))
    }

    /// Perform `step`'s prerequisite chain, then its own action
    fn perform(&mut self, step: Step) -> Result<(), StepError> {
        if let Some(prerequisite) = step.prerequisite() {
            tracing::debug!("Step {step} first performs {prerequisite}");
            self.perform(prerequisite)?;
        }

        match step {
            Step::Help => Ok(()),
            Step::Configure => self.configure(),
            Step::Build => self.build(),
            Step::Clean => self.clean(),
            Step::Install => self.install(),
            Step::Uninstall => self.uninstall(),
            Step::Package => self.package(),
            Step::Test => self.test(),
        }
    }

    fn launch(&mut self, command: &CommandLine) -> Result<(), StepError> {
        self.launched += 1;
        self.launcher.launch(command)
    }

    fn elevate(&self) -> Option<&'a str> {
        self.options.elevate.as_deref()
    }

    fn configure(&mut self) -> Result<(), StepError> {
        let o = self.options;
        let cmd = CommandLine::new("cmake")
            .arg("-S")
            .path_arg(&o.source_dir)
            .arg("-B")
            .path_arg(o.build_dir())
            .arg("-G")
            .arg(o.generator.cmake_name())
            .arg(format!("-DCMAKE_BUILD_TYPE={}", o.build_type))
            .arg(format!("-DCMAKE_VERBOSE_MAKEFILE:BOOL={}", on_off(o.verbose)))
            .arg(format!("-DCPACK_ENABLE_DEB={}", on_off(o.package_deb)))
            .arg(format!("-DCPACK_ENABLE_RPM={}", on_off(o.package_rpm)))
            .arg(format!("-DCMAKE_FORCE_COLORED_OUTPUT={}", on_off(o.colorize)));
        self.launch(&cmd)
    }

    fn build(&mut self) -> Result<(), StepError> {
        let o = self.options;
        let cmd = CommandLine::new("cmake")
            .arg("--build")
            .path_arg(o.build_dir())
            .arg("--parallel")
            .arg(o.jobs.to_string());
        self.launch(&cmd)
    }

    fn clean(&mut self) -> Result<(), StepError> {
        let cmd = CommandLine::new("rm")
            .args(["-rf", "--"])
            .path_arg(self.options.build_dir());
        self.launch(&cmd)?;
        tracing::debug!("Clearing ledger after clean");
        self.ledger.clear();
        Ok(())
    }

    fn install(&mut self) -> Result<(), StepError> {
        let cmd = CommandLine::privileged(self.elevate(), "cmake")
            .arg("--build")
            .path_arg(self.options.build_dir())
            .args(["--target", "install"]);
        self.launch(&cmd)
    }

    fn uninstall(&mut self) -> Result<(), StepError> {
        let manifest_path = self.options.install_manifest_path();

        // The manifest only exists after an install into this build dir.
        if !manifest_path.is_file() {
            tracing::info!(
                "No install manifest at {}, installing first",
                manifest_path.display()
            );
            self.perform(Step::Install)?;
        }

        if !manifest_path.is_file() {
            if self.launcher.is_dry_run() {
                writeln!(
                    self.console,
                    "Would remove the files listed in {}",
                    manifest_path.display()
                )?;
                return Ok(());
            }
            return Err(StepError::ManifestMissing {
                path: manifest_path,
            });
        }

        let manifest = InstallManifest::load(&manifest_path)?;
        writeln!(self.console, "Removing the following files:")?;
        for entry in manifest.entries() {
            writeln!(self.console, "{}", entry.display())?;
        }

        if manifest.is_empty() {
            tracing::info!("Install manifest is empty, nothing to remove");
            return Ok(());
        }

        let batches = manifest.batches(REMOVE_BATCH_BYTES);
        tracing::debug!("Removing installed files in {} batch(es)", batches.len());
        for batch in batches {
            let mut cmd = CommandLine::privileged(self.elevate(), "rm").args(["-f", "--"]);
            for entry in batch {
                cmd = cmd.path_arg(entry);
            }
            self.launch(&cmd)?;
        }
        Ok(())
    }

    fn package(&mut self) -> Result<(), StepError> {
        let o = self.options;
        let build_dir = o.build_dir();
        let cpack = CommandLine::privileged(self.elevate(), "cpack").current_dir(build_dir);
        self.launch(&cpack)?;

        match &o.user {
            Some(user) => {
                let chown = CommandLine::privileged(self.elevate(), "chown")
                    .arg("-R")
                    .arg(format!("{user}:{user}"))
                    .arg(".")
                    .current_dir(build_dir);
                self.launch(&chown)
            }
            None => {
                tracing::warn!("Cannot determine the current user, package ownership left as is");
                Ok(())
            }
        }
    }

    fn test(&mut self) -> Result<(), StepError> {
        let o = self.options;
        let mut cmd = CommandLine::new("ctest")
            .arg("-C")
            .arg(o.build_type.as_str())
            .arg(if o.verbose { "-V" } else { "--progress" })
            .current_dir(o.build_dir());
        if o.colorize {
            cmd = cmd.env("GTEST_COLOR", "1");
        }
        self.launch(&cmd)
    }
}
