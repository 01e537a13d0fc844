//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use crate::core::step::Step;
    use proptest::prelude::*;

    /// Generate any step, `help` included
    pub fn step() -> impl Strategy<Value = Step> {
        prop::sample::select(Step::ALL.to_vec())
    }

    /// Generate a step that runs without needing files on disk
    ///
    /// Excludes `help` (short-circuits) and `uninstall` (reads the
    /// install manifest).
    pub fn plain_step() -> impl Strategy<Value = Step> {
        prop::sample::select(vec![
            Step::Configure,
            Step::Build,
            Step::Clean,
            Step::Install,
            Step::Package,
            Step::Test,
        ])
    }

    /// Generate a requested step sequence of any steps
    pub fn step_sequence() -> impl Strategy<Value = Vec<Step>> {
        prop::collection::vec(step(), 0..12)
    }

    /// Generate a non-empty sequence of [`plain_step`]s
    pub fn plain_step_sequence() -> impl Strategy<Value = Vec<Step>> {
        prop::collection::vec(plain_step(), 1..12)
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::core::step::Step;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_step_sequence_bounded(steps in step_sequence()) {
            prop_assert!(steps.len() < 12);
        }

        #[test]
        fn test_plain_steps_exclude_help_and_uninstall(steps in plain_step_sequence()) {
            prop_assert!(!steps.is_empty());
            prop_assert!(!steps.contains(&Step::Help));
            prop_assert!(!steps.contains(&Step::Uninstall));
        }
    }
}
