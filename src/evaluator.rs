//! Evaluation of a single test case

use crate::error::HarnessResult;
use crate::executor::Executor;
use crate::normalize::normalize;
use crate::testcase::TestCase;
use crate::verdict::{MemoryCheck, OutputCheck, Verdict};

/// Runs one test case through both checks
#[derive(Debug, Clone)]
pub struct Evaluator {
    executor: Executor,
}

impl Evaluator {
    /// Create a new evaluator
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Evaluate a test case.
    ///
    /// The interpreter runs twice: once plainly for the output comparison and
    /// once under the memory checker. Timeouts and crashes are final; nothing
    /// is retried.
    pub async fn evaluate(&self, testcase: &TestCase) -> HarnessResult<Verdict> {
        let execution = self.executor.run(&testcase.input_path).await?;
        let actual = normalize(&execution.output);

        let expected = normalize(&testcase.load_expected().await?);

        let output = if actual == expected {
            OutputCheck::Correct
        } else {
            OutputCheck::Incorrect { expected, actual }
        };

        // A checker that cannot run fails the memory check only, so the
        // output check above is still reported.
        let memory = match self.executor.run_with_memcheck(&testcase.input_path).await {
            Ok(memcheck) if memcheck.error_detected => MemoryCheck::Error {
                report: memcheck.output,
            },
            Ok(_) => MemoryCheck::Clean,
            Err(e) => {
                tracing::error!(test = %testcase.name, error = %e, "Memory check could not run");
                MemoryCheck::Error {
                    report: e.to_string(),
                }
            }
        };

        tracing::debug!(
            test = %testcase.name,
            output_matched = output == OutputCheck::Correct,
            memory_clean = memory == MemoryCheck::Clean,
            "Evaluated test case"
        );

        Ok(Verdict {
            output,
            memory,
            termination: execution.termination,
        })
    }
}
