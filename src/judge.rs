//! Test suite orchestration
//!
//! Discovers the suite, evaluates each test case in name order and prints a
//! plain-text report. A failing test case never stops the run; the overall
//! outcome is only decided once every case has been evaluated.

use std::io::Write;

use crate::config::{Config, SuiteConfig};
use crate::error::HarnessResult;
use crate::evaluator::Evaluator;
use crate::executor::{Executor, Termination};
use crate::testcase::{discover_testcases, TestCase};
use crate::verdict::{MemoryCheck, OutputCheck, RunSummary, Verdict};

/// Drives the evaluator over a whole suite
pub struct Judge {
    suite: SuiteConfig,
    evaluator: Evaluator,
}

impl Judge {
    /// Create a new judge
    pub fn new(config: Config) -> Self {
        let executor = Executor::new(config.execution, config.memcheck);
        Self {
            suite: config.suite,
            evaluator: Evaluator::new(executor),
        }
    }

    /// Evaluate every test case, writing the report to `out`.
    ///
    /// Fails only if the suite cannot be listed or the report cannot be
    /// written; per-case harness errors are reported and counted as failures.
    pub async fn run_all<W: Write>(&self, out: &mut W) -> HarnessResult<RunSummary> {
        let testcases = discover_testcases(&self.suite).await?;
        let mut summary = RunSummary::default();

        for testcase in &testcases {
            writeln!(out, "------Test {} ------", testcase.name)?;

            match self.evaluator.evaluate(testcase).await {
                Ok(verdict) => {
                    write_verdict(out, &verdict)?;
                    if verdict.is_pass() {
                        summary.record_pass();
                    } else {
                        summary.record_failure(&testcase.name);
                    }
                }
                Err(e) => {
                    tracing::error!(test = %testcase.name, error = %e, "Harness error");
                    write_harness_error(out, testcase, &e.to_string())?;
                    summary.record_failure(&testcase.name);
                }
            }
        }

        writeln!(out, "{}/{} test cases passed", summary.passed, summary.total)?;
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed.len(),
            "Test run complete"
        );

        Ok(summary)
    }
}

fn write_verdict<W: Write>(out: &mut W, verdict: &Verdict) -> std::io::Result<()> {
    match &verdict.output {
        OutputCheck::Correct => writeln!(out, "---OUTPUT CORRECT---")?,
        OutputCheck::Incorrect { expected, actual } => {
            writeln!(out, "---OUTPUT INCORRECT---")?;
            writeln!(out, "Correct output:")?;
            writeln!(out, "{}", expected)?;
            writeln!(out, "Student output:")?;
            writeln!(out, "{}", actual)?;
        }
    }

    // Unsuccessful exits are compared like any other run, but noted.
    match verdict.termination {
        Termination::Normal { exit_code: Some(0) } => {}
        Termination::Normal { exit_code: Some(code) } => writeln!(out, "Exit status: {}", code)?,
        Termination::Normal { exit_code: None } => writeln!(out, "Exit status: killed by signal")?,
        Termination::CrashedBySignal | Termination::TimedOut => {}
    }

    match &verdict.memory {
        MemoryCheck::Clean => writeln!(out, "---VALGRIND NO ERROR---")?,
        MemoryCheck::Error { report } => {
            writeln!(out, "---VALGRIND ERROR---")?;
            writeln!(out, "Valgrind test results")?;
            writeln!(out, "{}", report)?;
        }
    }

    Ok(())
}

fn write_harness_error<W: Write>(out: &mut W, testcase: &TestCase, message: &str) -> std::io::Result<()> {
    writeln!(out, "---HARNESS ERROR---")?;
    writeln!(out, "{} ({}): {}", testcase.name, testcase.input_path.display(), message)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use super::*;
    use crate::config::{ExecutionConfig, MemcheckConfig};
    use crate::error::HarnessError;

    fn judge(dir: &Path, script: &str, memcheck: MemcheckConfig) -> Judge {
        let config = Config {
            execution: ExecutionConfig {
                interpreter_path: PathBuf::from("/bin/sh"),
                interpreter_args: vec!["-c".to_string(), script.to_string()],
                timeout: Duration::from_millis(1500),
            },
            memcheck,
            ..Config::default()
        };
        Judge::new(config.with_test_dir(dir))
    }

    fn passthrough_memcheck() -> MemcheckConfig {
        MemcheckConfig {
            program: PathBuf::from("env"),
            args: Vec::new(),
            error_exit_code: 99,
        }
    }

    fn add_case(dir: &Path, name: &str, input: &str, expected: &str) {
        std::fs::write(dir.join(format!("{}.scm", name)), input).unwrap();
        std::fs::write(dir.join(format!("{}.output", name)), expected).unwrap();
    }

    async fn run(judge: &Judge) -> (RunSummary, String) {
        let mut out = Vec::new();
        let summary = judge.run_all(&mut out).await.unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_passing_suite_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "add", "(+ 1 2)", "3\n");

        let (summary, report) = run(&judge(dir.path(), "echo 3", passthrough_memcheck())).await;
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.total, 1);
        assert_eq!(
            report,
            "------Test add ------\n---OUTPUT CORRECT---\n---VALGRIND NO ERROR---\n1/1 test cases passed\n"
        );
    }

    #[tokio::test]
    async fn test_hanging_interpreter_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "loop", "(define (f) (f)) (f)", "#<void>\n");

        let (summary, report) = run(&judge(dir.path(), "sleep 30", passthrough_memcheck())).await;
        assert_eq!(summary.exit_code(), 1);
        assert!(report.contains("---OUTPUT INCORRECT---\nCorrect output:\n#<void>\nStudent output:\nTimed out\n"));
        assert!(report.contains("---VALGRIND ERROR---\nValgrind test results\nTimed out\n"));
    }

    #[tokio::test]
    async fn test_segfault_reports_both_failures() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "crash", "(car '())", "Evaluation error\n");

        let memcheck = MemcheckConfig {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), "echo 'Invalid read'; exit 99".to_string(), "memcheck".to_string()],
            error_exit_code: 99,
        };
        let (summary, report) = run(&judge(dir.path(), "echo partial; kill -s SEGV $$", memcheck)).await;
        assert_eq!(summary.failed, vec!["crash".to_string()]);
        assert!(report.contains("Student output:\nSegmentation fault\n"));
        assert!(report.contains("---VALGRIND ERROR---\nValgrind test results\nInvalid read\n"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_noted() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "bad-arity", "(car 1 2)", "Evaluation error\n");

        let (summary, report) = run(&judge(
            dir.path(),
            "echo 'Evaluation error: car takes one argument'; exit 2",
            passthrough_memcheck(),
        ))
        .await;
        assert_eq!(summary.exit_code(), 0);
        assert!(report.contains("---OUTPUT CORRECT---\nExit status: 2\n---VALGRIND NO ERROR---\n"));
    }

    #[tokio::test]
    async fn test_every_case_evaluated_in_order() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "b-second", "", "ok\n");
        add_case(dir.path(), "a-first", "", "wrong\n");
        add_case(dir.path(), "c-third", "", "ok");

        let (summary, report) = run(&judge(dir.path(), "echo ok", passthrough_memcheck())).await;
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, vec!["a-first".to_string()]);

        let first = report.find("Test a-first").unwrap();
        let second = report.find("Test b-second").unwrap();
        let third = report.find("Test c-third").unwrap();
        assert!(first < second && second < third);
        assert!(report.ends_with("2/3 test cases passed\n"));
    }

    #[tokio::test]
    async fn test_harness_error_does_not_abort_run() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "add", "(+ 1 2)", "3\n");

        let mut config = Config::default().with_test_dir(dir.path());
        config.execution.interpreter_path = PathBuf::from("/nonexistent/interpreter");
        let (summary, report) = run(&Judge::new(config)).await;
        assert_eq!(summary.exit_code(), 1);
        assert!(report.contains("---HARNESS ERROR---"));
        assert!(report.ends_with("0/1 test cases passed\n"));
    }

    #[tokio::test]
    async fn test_missing_checker_still_reports_output() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "add", "(+ 1 2)", "3\n");

        let memcheck = MemcheckConfig {
            program: PathBuf::from("/nonexistent/valgrind"),
            args: Vec::new(),
            error_exit_code: 99,
        };
        let (summary, report) = run(&judge(dir.path(), "echo 4", memcheck)).await;
        assert_eq!(summary.exit_code(), 1);
        assert!(report.contains("---OUTPUT INCORRECT---\nCorrect output:\n3\nStudent output:\n4\n"));
        assert!(report.contains("---VALGRIND ERROR---\nValgrind test results\nFailed to launch /nonexistent/valgrind"));
        assert!(!report.contains("---HARNESS ERROR---"));
    }

    #[tokio::test]
    async fn test_dangling_link_does_not_abort_run() {
        let dir = tempfile::tempdir().unwrap();
        add_case(dir.path(), "add", "(+ 1 2)", "3\n");
        std::os::unix::fs::symlink("/nonexistent/x", dir.path().join("stale-link")).unwrap();

        let (summary, report) = run(&judge(dir.path(), "echo 3", passthrough_memcheck())).await;
        assert_eq!(summary.exit_code(), 0);
        assert!(report.ends_with("1/1 test cases passed\n"));
    }

    #[tokio::test]
    async fn test_empty_suite_passes() {
        let dir = tempfile::tempdir().unwrap();

        let (summary, report) = run(&judge(dir.path(), "echo 3", passthrough_memcheck())).await;
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(report, "0/0 test cases passed\n");
    }

    #[tokio::test]
    async fn test_missing_suite_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let judge = judge(&dir.path().join("missing"), "echo 3", passthrough_memcheck());

        let mut out = Vec::new();
        let err = judge.run_all(&mut out).await.unwrap_err();
        assert!(matches!(err, HarnessError::TestDirectory { .. }));
    }
}
