//! Execution ledger
//!
//! Remembers which steps already ran during one invocation so repeated
//! requests become no-ops. Owned by a single sequencer run.

use crate::core::step::Step;

/// Ordered set of steps executed so far
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ledger {
    ran: Vec<Step>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `step` already ran since the last clean
    pub fn contains(&self, step: Step) -> bool {
        self.ran.contains(&step)
    }

    /// Record a completed step
    ///
    /// Re-runnable steps never enter the ledger and duplicates are ignored.
    pub fn record(&mut self, step: Step) {
        if !step.is_rerunnable() && !self.contains(step) {
            self.ran.push(step);
        }
    }

    /// Forget every recorded step
    pub fn clear(&mut self) {
        self.ran.clear();
    }

    /// Recorded steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.ran
    }
}
