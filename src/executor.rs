//! Process execution for the interpreter under test
//!
//! Every run gets the test input on stdin and one pipe shared by stdout and
//! stderr, so output arrives as a single interleaved stream. Children are
//! placed in their own process group; whatever path a run takes, the whole
//! group is killed and the child reaped before the run returns.

use std::io::Read;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tokio::time::timeout;

use crate::config::{ExecutionConfig, MemcheckConfig};
use crate::constants::{SEGFAULT_OUTPUT, TIMED_OUT_OUTPUT};
use crate::error::{HarnessError, HarnessResult};

/// How a run of the interpreter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited on its own, or was killed by a signal other than SIGSEGV
    Normal { exit_code: Option<i32> },
    /// Killed by SIGSEGV
    CrashedBySignal,
    /// Still running at the deadline
    TimedOut,
}

/// Result of running the interpreter once
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Combined stdout and stderr, or a fixed sentinel for crashes and timeouts
    pub output: String,
    pub termination: Termination,
}

/// Result of running the interpreter under the memory checker
#[derive(Debug, Clone)]
pub struct MemoryCheckResult {
    /// Raw checker output
    pub output: String,
    pub error_detected: bool,
}

/// Map a platform exit status to a [`Termination`].
///
/// `None` means the deadline expired before the process exited.
pub fn classify(status: Option<ExitStatus>) -> Termination {
    let Some(status) = status else {
        return Termination::TimedOut;
    };

    match status.signal().map(Signal::try_from) {
        Some(Ok(Signal::SIGSEGV)) => Termination::CrashedBySignal,
        _ => Termination::Normal {
            exit_code: status.code(),
        },
    }
}

/// Raw outcome of a launched process
enum Launch {
    Exited { status: ExitStatus, output: Vec<u8> },
    TimedOut,
}

/// Owns a spawned child and its process group.
///
/// Dropping the guard kills the group, so no descendant outlives the run.
struct ChildGuard {
    child: Child,
    pgid: Option<Pid>,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        // The child leads its own group, so its pid is the group id.
        let pgid = child.id().map(|id| Pid::from_raw(id as i32));
        Self { child, pgid }
    }

    fn kill_group(&self) {
        let Some(pgid) = self.pgid else {
            return;
        };

        match killpg(pgid, Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => tracing::warn!(pgid = %pgid, error = %e, "Failed to kill process group"),
        }
    }

    /// Kill the group and reap the child
    async fn terminate(&mut self) {
        self.kill_group();
        if let Err(e) = self.child.wait().await {
            tracing::warn!(error = %e, "Failed to reap timed out process");
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill_group();
    }
}

/// Runs the interpreter directly and under the memory checker
#[derive(Debug, Clone)]
pub struct Executor {
    execution: ExecutionConfig,
    memcheck: MemcheckConfig,
}

impl Executor {
    /// Create a new executor
    pub fn new(execution: ExecutionConfig, memcheck: MemcheckConfig) -> Self {
        Self {
            execution,
            memcheck,
        }
    }

    /// Run the interpreter with `input_path` as its stdin.
    ///
    /// A SIGSEGV crash reports `"Segmentation fault"` and a timeout reports
    /// `"Timed out"`; in both cases any partial output is discarded.
    pub async fn run(&self, input_path: &Path) -> HarnessResult<ExecutionResult> {
        let mut command = Command::new(&self.execution.interpreter_path);
        command.args(&self.execution.interpreter_args);

        let result = match self.launch(command, input_path).await? {
            Launch::TimedOut => {
                tracing::warn!(input = %input_path.display(), "Interpreter timed out");
                ExecutionResult {
                    output: TIMED_OUT_OUTPUT.to_string(),
                    termination: Termination::TimedOut,
                }
            }
            Launch::Exited { status, output } => match classify(Some(status)) {
                Termination::CrashedBySignal => {
                    tracing::warn!(input = %input_path.display(), "Interpreter crashed with SIGSEGV");
                    ExecutionResult {
                        output: SEGFAULT_OUTPUT.to_string(),
                        termination: Termination::CrashedBySignal,
                    }
                }
                termination => {
                    if !status.success() {
                        tracing::warn!(
                            input = %input_path.display(),
                            status = %status,
                            "Interpreter exited unsuccessfully"
                        );
                    }
                    ExecutionResult {
                        output: String::from_utf8_lossy(&output).into_owned(),
                        termination,
                    }
                }
            },
        };

        Ok(result)
    }

    /// Run the interpreter under the memory checker with `input_path` as stdin.
    ///
    /// An error is detected when the checker exits with its error exit code,
    /// when the run dies of SIGSEGV, or when it times out.
    pub async fn run_with_memcheck(&self, input_path: &Path) -> HarnessResult<MemoryCheckResult> {
        let mut command = Command::new(&self.memcheck.program);
        command
            .args(&self.memcheck.args)
            .arg(&self.execution.interpreter_path)
            .args(&self.execution.interpreter_args);

        let result = match self.launch(command, input_path).await? {
            Launch::TimedOut => {
                tracing::warn!(input = %input_path.display(), "Memory check timed out");
                MemoryCheckResult {
                    output: TIMED_OUT_OUTPUT.to_string(),
                    error_detected: true,
                }
            }
            Launch::Exited { status, output } => {
                let error_detected = status.code() == Some(self.memcheck.error_exit_code)
                    || classify(Some(status)) == Termination::CrashedBySignal;
                MemoryCheckResult {
                    output: String::from_utf8_lossy(&output).into_owned(),
                    error_detected,
                }
            }
        };

        Ok(result)
    }

    /// Spawn `command` and wait for it under the configured deadline
    async fn launch(&self, mut command: Command, input_path: &Path) -> HarnessResult<Launch> {
        let program = command.as_std().get_program().to_string_lossy().into_owned();

        let input = std::fs::File::open(input_path).map_err(|source| HarnessError::Input {
            path: input_path.to_path_buf(),
            source,
        })?;
        let (mut reader, writer) = std::io::pipe()?;

        command
            .stdin(Stdio::from(input))
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .process_group(0)
            .kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|source| HarnessError::Spawn { program: program.clone(), source })?;
        // The command still holds write ends of the pipe; drop them so the
        // reader sees EOF once the child's group is gone.
        drop(command);

        let mut guard = ChildGuard::new(child);
        tracing::debug!(program = %program, pid = ?guard.pgid, "Spawned process");

        let capture = tokio::task::spawn_blocking(move || {
            let mut output = Vec::new();
            reader.read_to_end(&mut output).map(|_| output)
        });

        match timeout(self.execution.timeout, guard.child.wait()).await {
            Ok(status) => {
                let status = status?;
                // Stragglers still holding the pipe would block the reader.
                guard.kill_group();
                let output = capture.await.map_err(std::io::Error::other)??;
                tracing::debug!(program = %program, status = %status, bytes = output.len(), "Process exited");
                Ok(Launch::Exited { status, output })
            }
            Err(_) => {
                guard.terminate().await;
                Ok(Launch::TimedOut)
            }
        }
    }
}
