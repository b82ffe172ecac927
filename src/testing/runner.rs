//! Test runner implementation
//!
//! Runs each scenario as one invocation of the harness binary, strictly one
//! child process at a time. A failing scenario is reported and the runner
//! moves on to the next one.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command as TokioCommand;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::common::{Error, Result};
use crate::protocol::build_args;

use super::config::TestScenario;

/// How a single scenario ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// The binary exited with status 0
    Passed { stdout: String },
    /// The binary exited with a non-zero status (or was killed by a signal)
    Failed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The binary (or a process holding its output pipes) did not finish
    /// within the timeout; the binary was killed
    TimedOut {
        after: Duration,
        stdout: String,
        stderr: String,
    },
    /// The binary could not be started
    SpawnFailed { error: String },
}

/// Result of a scenario run
#[derive(Debug)]
pub struct TestResult {
    /// Position of the scenario in the set
    pub index: usize,
    pub name: String,
    pub outcome: CaseOutcome,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Passed { .. })
    }
}

/// Drives the harness binary
#[derive(Debug, Clone)]
pub struct Runner {
    binary: PathBuf,
    root: PathBuf,
    timeout: Duration,
    verbose: bool,
}

impl Runner {
    /// Create a runner for `binary`, executed with `root` as working directory
    ///
    /// Fails if the binary does not exist; build the project first.
    /// Relative paths are made absolute against the current directory, since
    /// the binary is spawned from inside `root`.
    pub fn new(binary: PathBuf, root: PathBuf, timeout: Duration) -> Result<Self> {
        let binary = absolute(&binary)?;
        let root = absolute(&root)?;
        if !binary.is_file() {
            return Err(Error::Config(format!(
                "Harness binary not found at '{}'. Build the project first",
                binary.display()
            )));
        }
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "Project root '{}' is not a directory",
                root.display()
            )));
        }

        Ok(Self {
            binary,
            root,
            timeout,
            verbose: false,
        })
    }

    /// Print the argument vector before each run
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run every scenario in order, printing output and failure banners
    pub async fn run_all(&self, scenarios: &[TestScenario]) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(scenarios.len());

        for (index, scenario) in scenarios.iter().enumerate() {
            println!(
                "{} {}",
                format!("Running test {}:", index).blue().bold(),
                scenario.name.white().bold()
            );
            if let Some(desc) = &scenario.description {
                println!("  {}", desc.dimmed());
            }

            let outcome = match self.run_case(scenario).await {
                Ok(outcome) => outcome,
                Err(e) => CaseOutcome::SpawnFailed {
                    error: e.to_string(),
                },
            };

            let result = TestResult {
                index,
                name: scenario.name.clone(),
                outcome,
            };
            print_result(&result);
            results.push(result);
        }

        results
    }

    /// Run a single scenario and collect its outcome
    ///
    /// Only a failure to start the binary is an `Err`; a non-zero exit or a
    /// timeout is a [`CaseOutcome`].
    pub async fn run_case(&self, scenario: &TestScenario) -> Result<CaseOutcome> {
        let args = build_args(&scenario.ops);

        tracing::debug!(
            binary = %self.binary.display(),
            cwd = %self.root.display(),
            ?args,
            "Spawning harness binary"
        );
        if self.verbose {
            println!("  $ {} {}", self.binary.display(), args.join(" ").dimmed());
        }

        let mut child = TokioCommand::new(&self.binary)
            .args(&args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::spawn(&self.binary, &e))?;

        let stdout_buf = Arc::new(Mutex::new(Vec::new()));
        let stderr_buf = Arc::new(Mutex::new(Vec::new()));
        let mut stdout_task = tokio::spawn(read_stream(child.stdout.take(), stdout_buf.clone()));
        let mut stderr_task = tokio::spawn(read_stream(child.stderr.take(), stderr_buf.clone()));

        // The deadline covers draining the pipes too: a backgrounded
        // grandchild can keep them open after the binary exits
        let waited = timeout(self.timeout, async {
            let status = child.wait().await?;
            let _ = (&mut stdout_task).await;
            let _ = (&mut stderr_task).await;
            Ok::<_, std::io::Error>(status)
        })
        .await;

        let status = match waited {
            Ok(status) => status?,
            Err(_) => {
                tracing::warn!(
                    scenario = %scenario.name,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Harness binary timed out, killing it"
                );
                stdout_task.abort();
                stderr_task.abort();
                match child.try_wait() {
                    Ok(None) => {
                        if let Err(e) = child.kill().await {
                            tracing::warn!("Failed to kill harness binary: {}", e);
                        }
                    }
                    Ok(Some(status)) => tracing::debug!(
                        code = ?status.code(),
                        "Harness binary exited but its output pipes stayed open"
                    ),
                    Err(e) => tracing::warn!("Failed to poll harness binary: {}", e),
                }
                return Ok(CaseOutcome::TimedOut {
                    after: self.timeout,
                    stdout: take_text(&stdout_buf).await,
                    stderr: take_text(&stderr_buf).await,
                });
            }
        };

        let stdout = take_text(&stdout_buf).await;
        let stderr = take_text(&stderr_buf).await;

        tracing::debug!(code = ?status.code(), "Harness binary exited");

        if status.success() {
            Ok(CaseOutcome::Passed { stdout })
        } else {
            Ok(CaseOutcome::Failed {
                exit_code: status.code(),
                stdout,
                stderr,
            })
        }
    }
}

/// Make `path` absolute against the current directory
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        Error::Config(format!("Invalid path '{}': {}", path.display(), e))
    })
}

/// Drain a child pipe into `buf` chunk by chunk, so a partial read survives an abort
async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>, buf: Arc<Mutex<Vec<u8>>>) {
    let Some(mut stream) = stream else {
        return;
    };
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.lock().await.extend_from_slice(&chunk[..n]),
            Err(e) => {
                tracing::debug!("Failed to read child output: {}", e);
                break;
            }
        }
    }
}

/// Captured bytes as text, replacing invalid UTF-8
async fn take_text(buf: &Mutex<Vec<u8>>) -> String {
    String::from_utf8_lossy(&buf.lock().await).into_owned()
}

/// Print the outcome of one scenario
fn print_result(result: &TestResult) {
    match &result.outcome {
        CaseOutcome::Passed { stdout } => {
            print!("{}", stdout);
            if !stdout.is_empty() && !stdout.ends_with('\n') {
                println!();
            }
        }
        CaseOutcome::Failed {
            exit_code,
            stdout,
            stderr,
        } => {
            let code = exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none (terminated by signal)".to_string());
            print_error_banner(result, &format!("exit code {}", code));
            print_stream("stdout", stdout);
            print_stream("stderr", stderr);
        }
        CaseOutcome::TimedOut {
            after,
            stdout,
            stderr,
        } => {
            print_error_banner(
                result,
                &format!("timed out after {}s, process killed", after.as_secs_f64()),
            );
            print_stream("stdout", stdout);
            print_stream("stderr", stderr);
        }
        CaseOutcome::SpawnFailed { error } => {
            print_error_banner(result, error);
        }
    }
}

fn print_error_banner(result: &TestResult, details: &str) {
    println!(
        "{} test {} ({}) failed",
        "ERROR:".red().bold(),
        result.index,
        result.name
    );
    println!("{} {}", "ERROR: details:".red(), details);
}

fn print_stream(label: &str, content: &str) {
    if content.is_empty() {
        println!("  {}: {}", label, "<empty>".dimmed());
    } else {
        println!("  {}:", label);
        for line in content.lines() {
            println!("    {}", line);
        }
    }
}

/// Print the pass/fail totals
pub fn print_summary(results: &[TestResult]) {
    let passed = results.iter().filter(|r| r.passed()).count();
    let failed = results.len() - passed;

    let line = format!("{} passed, {} failed", passed, failed);
    if failed == 0 {
        println!("\n{} {}\n", "✓".green().bold(), line.green().bold());
    } else {
        println!("\n{} {}\n", "✗".red().bold(), line.red().bold());
    }
}
