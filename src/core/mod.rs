//! Core business logic module
//!
//! This module contains the step sequencing logic for buildseq.
//! Process launching lives in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`step`] - Step registry (names, help text, prerequisites)
//! - [`options`] - Options record resolution
//! - [`project_config`] - `buildseq.toml` project defaults
//! - [`ledger`] - Execution ledger used for deduplication
//! - [`install_manifest`] - CMake install manifest parsing
//! - [`sequencer`] - Ordered step execution

pub mod install_manifest;
pub mod ledger;
pub mod options;
pub mod project_config;
pub mod sequencer;
pub mod step;
