//! Verdict types and aggregation

use crate::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::executor::Termination;

/// Outcome of comparing normalized outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCheck {
    Correct,
    Incorrect {
        /// Normalized reference output
        expected: String,
        /// Normalized interpreter output
        actual: String,
    },
}

/// Outcome of the memory-checked run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryCheck {
    Clean,
    Error {
        /// Raw checker output
        report: String,
    },
}

/// Verdict for a single test case.
///
/// The two checks are independent: one failing never hides the other.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub output: OutputCheck,
    pub memory: MemoryCheck,
    /// How the unchecked run ended
    pub termination: Termination,
}

impl Verdict {
    pub fn output_matched(&self) -> bool {
        self.output == OutputCheck::Correct
    }

    pub fn memory_clean(&self) -> bool {
        self.memory == MemoryCheck::Clean
    }

    /// Check if both checks passed
    pub fn is_pass(&self) -> bool {
        self.output_matched() && self.memory_clean()
    }
}

/// Aggregated result for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of test cases evaluated
    pub total: usize,
    /// Test cases that passed both checks
    pub passed: usize,
    /// Names of test cases that failed a check or hit a harness error
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn record_pass(&mut self) {
        self.total += 1;
        self.passed += 1;
    }

    pub fn record_failure(&mut self, name: &str) {
        self.total += 1;
        self.failed.push(name.to_string());
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }
}
