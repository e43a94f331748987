//! Application-wide constants
//!
//! Defaults for the harness configuration, grouped by purpose.

// =============================================================================
// SUBJECT DEFAULTS
// =============================================================================

/// Default path of the interpreter under test
pub const DEFAULT_INTERPRETER_PATH: &str = "./interpreter";

/// Default wall-clock limit for a single run, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// TEST SUITE LAYOUT
// =============================================================================

/// Default directory holding the test cases
pub const DEFAULT_TEST_DIR: &str = "tests";

/// Extension of input programs
pub const INPUT_EXTENSION: &str = "scm";

/// Extension of reference outputs
pub const EXPECTED_EXTENSION: &str = "output";

// =============================================================================
// MEMORY CHECKER
// =============================================================================

/// Memory checker executable, resolved through `PATH`
pub const DEFAULT_MEMCHECK_PROGRAM: &str = "valgrind";

/// Exit code the checker is told to use when it finds an error
pub const DEFAULT_MEMCHECK_ERROR_EXIT_CODE: i32 = 99;

/// Leak-detection flags passed before the error exit code flag
pub const MEMCHECK_LEAK_FLAGS: &[&str] = &["--leak-check=full", "--show-leak-kinds=all"];

// =============================================================================
// SENTINEL OUTPUTS
// =============================================================================

/// Output recorded for a run that hit the deadline
pub const TIMED_OUT_OUTPUT: &str = "Timed out";

/// Output recorded for a run killed by SIGSEGV
pub const SEGFAULT_OUTPUT: &str = "Segmentation fault";

// =============================================================================
// EXIT CODES
// =============================================================================

/// Every test case passed both checks
pub const EXIT_SUCCESS: u8 = 0;

/// At least one test case failed a check
pub const EXIT_FAILURE: u8 = 1;
