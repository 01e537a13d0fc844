//! Buildseq - CMake step sequencer
//!
//! This library runs a user-chosen sequence of build steps (configure,
//! build, install, uninstall, package, test, clean) by launching CMake,
//! CTest and CPack with arguments derived from one options record.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Step registry, options and the sequencer
//! - [`infra`] - Infrastructure layer (filesystem, host probes, processes)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
