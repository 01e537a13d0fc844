//! Default configuration values

/// Default build output directory, relative to the current directory
pub const DEFAULT_BUILD_PATH: &str = "build";

/// Project config file looked up in the source directory
pub const CONFIG_FILE_NAME: &str = "buildseq.toml";

/// Program used to run privileged commands
pub const DEFAULT_ELEVATE: &str = "sudo";

/// File CMake writes into the build directory on install
pub const INSTALL_MANIFEST_NAME: &str = "install_manifest.txt";

/// Argument bytes per `rm` invocation during uninstall, well under `ARG_MAX`
pub const REMOVE_BATCH_BYTES: usize = 64 * 1024;

/// `-J` uses this share of the logical CPUs (numerator / denominator)
pub const PARALLEL_SHARE: (usize, usize) = (6, 8);

/// Environment variable overriding the build path
pub const ENV_BUILD_PATH: &str = "BUILDSEQ_BUILD_PATH";

/// Environment variable overriding the generator
pub const ENV_GENERATOR: &str = "BUILDSEQ_GENERATOR";

/// Environment variable overriding the build type
pub const ENV_BUILD_TYPE: &str = "BUILDSEQ_BUILD_TYPE";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
