//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem, host probes and external processes.

pub mod filesystem;
pub mod process;
pub mod toolchain;
