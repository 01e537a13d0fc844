//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Name of the log file fake tools append their invocations to
pub const TOOL_LOG: &str = "tool-calls.log";

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Directory of fake tools placed in front of `PATH`
    tools: Option<PathBuf>,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            tools: None,
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Invocations recorded by fake tools, one per line
    pub fn tool_calls(&self) -> Vec<String> {
        if !self.file_exists(TOOL_LOG) {
            return Vec::new();
        }
        self.read_file(TOOL_LOG).lines().map(str::to_string).collect()
    }

    /// Install fake executables that log their arguments and exit 0
    ///
    /// `sudo` is always provided and simply runs its arguments.
    #[cfg(unix)]
    pub fn with_fake_tools(mut self, names: &[&str]) -> Self {
        let bin = self.dir.path().join(".fake-bin");
        std::fs::create_dir_all(&bin).expect("Failed to create fake bin directory");
        for name in names {
            write_script(&bin, name, &logging_script(name, "exit 0"));
        }
        write_script(
            &bin,
            "sudo",
            &logging_script("sudo", "exec \"$@\""),
        );
        self.tools = Some(bin);
        self
    }

    /// Replace one fake tool with a script that exits with `code`
    #[cfg(unix)]
    pub fn failing_tool(&self, name: &str, code: i32) {
        let bin = self.tools.as_ref().expect("Fake tools not installed");
        write_script(bin, name, &logging_script(name, &format!("exit {code}")));
    }

    /// Run buildseq in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute buildseq")
    }

    /// Build the buildseq command without running it
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_buildseq"));
        cmd.current_dir(self.path());
        cmd.args(args);
        cmd.env_remove("BUILDSEQ_BUILD_PATH");
        cmd.env_remove("BUILDSEQ_GENERATOR");
        cmd.env_remove("BUILDSEQ_BUILD_TYPE");
        cmd.env_remove("RUST_LOG");
        cmd.env("USER", "builder");
        cmd.env("TOOL_LOG", self.dir.path().join(TOOL_LOG));
        if let Some(bin) = &self.tools {
            let path = std::env::var_os("PATH").unwrap_or_default();
            let mut dirs = vec![bin.clone()];
            dirs.extend(std::env::split_paths(&path));
            cmd.env("PATH", std::env::join_paths(dirs).expect("Invalid PATH"));
        }
        cmd
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Shell script body that records `name "$@"` then runs `tail`
fn logging_script(name: &str, tail: &str) -> String {
    format!("#!/bin/sh\necho \"{name} $*\" >> \"$TOOL_LOG\"\n{tail}\n")
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).expect("Failed to write fake tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake tool executable");
}

/// Stdout of a finished run as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished run as a string
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Sample project config for testing
pub const SAMPLE_CONFIG: &str = r#"
[build]
generator = "Unix Makefiles"
build_type = "debug"
build_path = "out"

[package]
deb = true

[privilege]
elevate = ""
"#;
