//! Install manifest
//!
//! CMake writes the list of installed files to `install_manifest.txt`
//! in the build directory, one absolute path per line.

use std::path::{Path, PathBuf};

use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Files recorded by the last install
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallManifest {
    entries: Vec<PathBuf>,
}

impl InstallManifest {
    /// Parse manifest text
    ///
    /// Blank lines are skipped. Other whitespace is kept since it is part
    /// of the path.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(PathBuf::from)
            .collect();
        Self { entries }
    }

    /// Read and parse the manifest at `path`
    pub fn load(path: &Path) -> Result<Self, FilesystemError> {
        let content = filesystem::read_file(path)?;
        Ok(Self::parse(&content))
    }

    /// Installed paths in manifest order
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Split the entries into consecutive runs whose argument bytes stay
    /// within `budget`
    ///
    /// Each path costs its length plus a terminating NUL. A single path
    /// larger than the budget gets a batch of its own.
    pub fn batches(&self, budget: usize) -> Vec<&[PathBuf]> {
        let mut batches = Vec::new();
        let mut start = 0;
        let mut used = 0;
        for (i, entry) in self.entries.iter().enumerate() {
            let cost = entry.as_os_str().len() + 1;
            if i > start && used + cost > budget {
                batches.push(&self.entries[start..i]);
                start = i;
                used = 0;
            }
            used += cost;
        }
        if start < self.entries.len() {
            batches.push(&self.entries[start..]);
        }
        batches
    }

    /// Whether the manifest lists nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
