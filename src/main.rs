//! Buildseq CLI - CMake step sequencer
//!
//! Entry point for the buildseq command-line application.

use buildseq::cli::output::{display_error, exit_code, init_logging};
use buildseq::cli::Cli;

fn main() {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    // Run the steps and forward the failing command's exit code
    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(exit_code(&e));
    }
}
