//! Harness configuration
//!
//! Defaults come from [`crate::constants`]; `Config::from_env` layers
//! environment overrides on top of them. The command line may further
//! replace the test directory.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_INTERPRETER_PATH, DEFAULT_MEMCHECK_ERROR_EXIT_CODE, DEFAULT_MEMCHECK_PROGRAM,
    DEFAULT_TEST_DIR, DEFAULT_TIMEOUT_SECS, EXPECTED_EXTENSION, INPUT_EXTENSION,
    MEMCHECK_LEAK_FLAGS,
};

/// Main harness configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub execution: ExecutionConfig,
    pub memcheck: MemcheckConfig,
    pub suite: SuiteConfig,
}

/// How the interpreter under test is launched
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Interpreter executable
    pub interpreter_path: PathBuf,

    /// Arguments passed to the interpreter (none by default)
    pub interpreter_args: Vec<String>,

    /// Wall-clock limit per run, measured from launch
    pub timeout: Duration,
}

/// How the memory checker wraps the interpreter
#[derive(Debug, Clone)]
pub struct MemcheckConfig {
    /// Checker executable
    pub program: PathBuf,

    /// Checker arguments, placed before the interpreter command
    pub args: Vec<String>,

    /// Exit code signalling a detected memory error
    pub error_exit_code: i32,
}

/// Where test cases live and how their files are named
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub test_dir: PathBuf,
    pub input_extension: String,
    pub expected_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            execution: ExecutionConfig {
                interpreter_path: PathBuf::from(DEFAULT_INTERPRETER_PATH),
                interpreter_args: Vec::new(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
            memcheck: MemcheckConfig::with_error_exit_code(
                PathBuf::from(DEFAULT_MEMCHECK_PROGRAM),
                DEFAULT_MEMCHECK_ERROR_EXIT_CODE,
            ),
            suite: SuiteConfig {
                test_dir: PathBuf::from(DEFAULT_TEST_DIR),
                input_extension: INPUT_EXTENSION.to_string(),
                expected_extension: EXPECTED_EXTENSION.to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from `lookup`, which maps a variable name to its value.
    ///
    /// Unparseable numbers fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let interpreter_path = lookup("JUDGE_INTERPRETER")
            .map(PathBuf::from)
            .unwrap_or(defaults.execution.interpreter_path);
        let timeout = lookup("JUDGE_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.execution.timeout);

        let memcheck_program = lookup("JUDGE_MEMCHECK_PROGRAM")
            .map(PathBuf::from)
            .unwrap_or(defaults.memcheck.program);
        let error_exit_code = lookup("JUDGE_MEMCHECK_ERROR_EXIT_CODE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.memcheck.error_exit_code);

        let test_dir = lookup("JUDGE_TEST_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.suite.test_dir);

        Self {
            execution: ExecutionConfig {
                interpreter_path,
                interpreter_args: defaults.execution.interpreter_args,
                timeout,
            },
            memcheck: MemcheckConfig::with_error_exit_code(memcheck_program, error_exit_code),
            suite: SuiteConfig {
                test_dir,
                ..defaults.suite
            },
        }
    }

    /// Replace the test directory, e.g. from the command line
    pub fn with_test_dir(mut self, test_dir: impl Into<PathBuf>) -> Self {
        self.suite.test_dir = test_dir.into();
        self
    }
}

impl MemcheckConfig {
    /// Full leak checking, exiting with `error_exit_code` on any detected error
    pub fn with_error_exit_code(program: PathBuf, error_exit_code: i32) -> Self {
        let mut args: Vec<String> = MEMCHECK_LEAK_FLAGS.iter().map(|f| f.to_string()).collect();
        args.push(format!("--error-exitcode={}", error_exit_code));

        Self {
            program,
            args,
            error_exit_code,
        }
    }
}
