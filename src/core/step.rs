//! Step registry
//!
//! The fixed set of named steps a user can request, with their help text
//! and the prerequisite each composite step performs first.

use std::fmt;

use clap::ValueEnum;

/// A named unit of work in the requested sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Step {
    /// Prints this help message and exits
    Help,
    /// (Re-)Configures the project
    Configure,
    /// (Re-)Builds the project
    Build,
    /// Cleans the project build directory
    Clean,
    /// (Re-)Installs the project
    Install,
    /// Removes the installed files from paths
    Uninstall,
    /// Generates the desired packages (see options)
    Package,
    /// Runs automated testing
    Test,
}

impl Step {
    /// Every step, in the order they are listed in usage text
    pub const ALL: [Step; 8] = [
        Step::Help,
        Step::Configure,
        Step::Build,
        Step::Clean,
        Step::Install,
        Step::Uninstall,
        Step::Package,
        Step::Test,
    ];

    /// Name as typed on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Clean => "clean",
            Self::Install => "install",
            Self::Uninstall => "uninstall",
            Self::Package => "package",
            Self::Test => "test",
        }
    }

    /// One-line help text shown in usage
    pub fn description(self) -> &'static str {
        match self {
            Self::Help => "Prints this help message and exits",
            Self::Configure => "(Re-)Configures the project",
            Self::Build => "(Re-)Builds the project",
            Self::Clean => "Cleans the project build directory",
            Self::Install => "(Re-)Installs the project",
            Self::Uninstall => "Removes the installed files from paths",
            Self::Package => "Generates the desired packages (see options)",
            Self::Test => "Runs automated testing",
        }
    }

    /// Step whose action runs first, outside of ledger tracking
    ///
    /// `uninstall` is not listed here: it only installs when the install
    /// manifest is missing, which is decided at run time.
    pub fn prerequisite(self) -> Option<Step> {
        match self {
            Self::Build => Some(Self::Configure),
            Self::Install | Self::Package | Self::Test => Some(Self::Build),
            Self::Help | Self::Configure | Self::Clean | Self::Uninstall => None,
        }
    }

    /// Whether the step runs every time it is requested
    pub fn is_rerunnable(self) -> bool {
        matches!(self, Self::Clean)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render the step list shown after the option help
pub fn render_step_list() -> String {
    let width = Step::ALL
        .iter()
        .map(|step| step.name().len())
        .max()
        .unwrap_or(0);
    let mut out = String::from("List of valid steps:\n");
    for step in Step::ALL {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            step.name(),
            step.description()
        ));
    }
    out.push_str(
        "\nSteps are executed in order, except 'help', which will always be the only one \
         executed if included.",
    );
    out
}
