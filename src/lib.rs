//! Interp Judge - Conformance harness for interpreter submissions
//!
//! Runs an interpreter over a directory of test programs, compares its
//! normalized output against reference answers, and re-runs every program
//! under a memory checker to catch errors output comparison would miss.
//!
//! # Architecture
//!
//! - **Normalize**: text rewriting applied to both outputs before comparison
//! - **Executor**: subprocess launch, timeout, crash classification
//! - **Evaluator**: both checks for one test case
//! - **Judge**: discovery, sequential evaluation, report and exit status

pub mod config;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod judge;
pub mod normalize;
pub mod testcase;
pub mod verdict;

// Re-export commonly used types
pub use config::Config;
pub use error::{HarnessError, HarnessResult};
pub use judge::Judge;
pub use verdict::RunSummary;
