//! External process invocation
//!
//! Every step ends up as one or more [`CommandLine`]s handed to a
//! [`Launcher`]. Arguments are passed to the child as separate argv
//! entries; no shell is involved.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::StepError;

/// A program with its arguments, working directory and extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl CommandLine {
    /// Start a command line for `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Start a command line that runs `program` through `elevate`
    ///
    /// With no elevation program the command runs directly.
    pub fn privileged(elevate: Option<&str>, program: impl Into<String>) -> Self {
        let program: String = program.into();
        match elevate {
            Some(elevate) => Self::new(elevate).arg(program),
            None => Self::new(program),
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append a path argument, keeping its bytes as they are
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Run the child in `dir` instead of the current directory
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Set an environment variable for the child
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn environment(&self) -> &[(String, String)] {
        &self.env
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandLine {
    /// Renders as a shell-equivalent line, quoting where needed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cwd) = &self.cwd {
            write!(f, "cd {} && ", shell_words::quote(&cwd.to_string_lossy()))?;
        }
        for (key, value) in &self.env {
            write!(f, "{key}={} ", shell_words::quote(value))?;
        }
        f.write_str(&shell_words::quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_words::quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Executes command lines on behalf of the sequencer
pub trait Launcher {
    /// Run `command` to completion; any non-zero exit is an error
    fn launch(&mut self, command: &CommandLine) -> Result<(), StepError>;

    /// Whether commands are only reported, not executed
    fn is_dry_run(&self) -> bool {
        false
    }
}

impl<T: Launcher + ?Sized> Launcher for &mut T {
    fn launch(&mut self, command: &CommandLine) -> Result<(), StepError> {
        (**self).launch(command)
    }

    fn is_dry_run(&self) -> bool {
        (**self).is_dry_run()
    }
}

/// Runs commands as child processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&mut self, command: &CommandLine) -> Result<(), StepError> {
        tracing::info!("Running: {command}");

        let status = command
            .to_command()
            .status()
            .map_err(|source| StepError::Launch {
                program: command.program().to_string(),
                source,
            })?;

        if status.success() {
            tracing::debug!("Finished: {command}");
            return Ok(());
        }

        // Killed by a signal: no exit code to forward.
        let code = status.code().unwrap_or(1);
        tracing::debug!("Command exited with {code}: {command}");
        Err(StepError::CommandFailed {
            command: command.to_string(),
            code,
        })
    }
}

/// Prints command lines instead of running them
#[derive(Debug)]
pub struct DryRunLauncher<W: Write> {
    out: W,
}

impl<W: Write> DryRunLauncher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer, e.g. to inspect captured output
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Launcher for DryRunLauncher<W> {
    fn launch(&mut self, command: &CommandLine) -> Result<(), StepError> {
        writeln!(self.out, "{command}")?;
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_display_quotes_only_when_needed() {
        let cmd = CommandLine::new("cmake")
            .arg("-G")
            .arg("Unix Makefiles")
            .arg("--parallel")
            .arg("4");
        assert_eq!(cmd.to_string(), "cmake -G 'Unix Makefiles' --parallel 4");
    }

    #[test]
    fn test_display_includes_cwd_and_env() {
        let cmd = CommandLine::new("ctest")
            .args(["-C", "debug", "-V"])
            .current_dir("my build")
            .env("GTEST_COLOR", "1");
        assert_eq!(
            cmd.to_string(),
            "cd 'my build' && GTEST_COLOR=1 ctest -C debug -V"
        );
    }

    #[test]
    fn test_privileged_prefixes_elevation_program() {
        let cmd = CommandLine::privileged(Some("sudo"), "cpack");
        assert_eq!(cmd.program(), "sudo");
        assert_eq!(cmd.arguments(), &["cpack"]);

        let direct = CommandLine::privileged(None, "cpack");
        assert_eq!(direct.program(), "cpack");
        assert!(direct.arguments().is_empty());
    }

    #[test]
    fn test_dry_run_writes_one_line_per_command() {
        let mut launcher = DryRunLauncher::new(Vec::new());
        launcher
            .launch(&CommandLine::new("rm").args(["-rf", "--", "build"]))
            .unwrap();
        launcher
            .launch(&CommandLine::new("cmake").args(["--build", "build"]))
            .unwrap();
        assert!(launcher.is_dry_run());

        let out = String::from_utf8(launcher.into_inner()).unwrap();
        assert_eq!(out, "rm -rf -- build\ncmake --build build\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_launcher_success() {
        let mut launcher = SystemLauncher;
        launcher.launch(&CommandLine::new("true")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_system_launcher_forwards_exit_code() {
        let mut launcher = SystemLauncher;
        let err = launcher
            .launch(&CommandLine::new("sh").args(["-c", "exit 7"]))
            .unwrap_err();
        assert_eq!(err.exit_code(), 7);
        assert!(matches!(err, StepError::CommandFailed { code: 7, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_launcher_runs_in_working_dir() {
        let dir = TempDir::new().unwrap();
        let before = std::env::current_dir().unwrap();

        let mut launcher = SystemLauncher;
        launcher
            .launch(
                &CommandLine::new("sh")
                    .args(["-c", "echo \"$MARK\" > marker.txt"])
                    .current_dir(dir.path())
                    .env("MARK", "here"),
            )
            .unwrap();

        let marker = std::fs::read_to_string(dir.path().join("marker.txt")).unwrap();
        assert_eq!(marker.trim(), "here");
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_launcher_signal_exits_one() {
        let mut launcher = SystemLauncher;
        let err = launcher
            .launch(&CommandLine::new("sh").args(["-c", "kill -9 $$"]))
            .unwrap_err();
        assert!(matches!(err, StepError::CommandFailed { code: 1, .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_path_arg_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"bu\xffild");
        let cmd = CommandLine::new("rm").path_arg(Path::new(raw));
        assert_eq!(cmd.arguments()[0].as_bytes(), b"bu\xffild");
        assert_eq!(cmd.to_string(), "rm 'bu\u{fffd}ild'");
    }

    #[test]
    fn test_system_launcher_missing_program() {
        let mut launcher = SystemLauncher;
        let err = launcher
            .launch(&CommandLine::new("buildseq-no-such-program-x9"))
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NOT_FOUND);
    }
}
