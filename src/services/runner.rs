//! External command runner
//!
//! Runs a command to completion and captures its combined output

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, -1 when terminated by a signal
    pub exit_code: i32,
    /// Stdout followed by stderr on a new line, trimmed
    pub output: String,
}

impl CommandOutput {
    /// Build from exit code and raw streams
    pub fn new(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            exit_code,
            output: combine_output(stdout, stderr),
        }
    }

    /// Whether the command exited cleanly
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Failure to run a command at all
#[derive(Error, Debug)]
pub enum RunError {
    #[error("empty command")]
    EmptyCommand,

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {seconds} seconds")]
    Timeout { program: String, seconds: u64 },

    #[error("failed to collect output of {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs external commands
///
/// A nonzero exit code is a normal [`CommandOutput`]; only failures to run
/// the command at all are reported as [`RunError`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `argv` and wait at most `timeout` for it to finish
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput, RunError>;
}

/// Runs commands as child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput, RunError> {
        let (program, args) = argv.split_first().ok_or(RunError::EmptyCommand)?;

        debug!("Running command: {}", argv.join(" "));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future (client went away, timeout) kills the child
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: program.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| RunError::Io {
                program: program.clone(),
                source,
            })?,
            Err(_) => {
                warn!("Command {} timed out after {:?}", program, timeout);
                return Err(RunError::Timeout {
                    program: program.clone(),
                    seconds: timeout.as_secs(),
                });
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        debug!("Command {} exited with code {}", program, exit_code);

        Ok(CommandOutput::new(exit_code, &stdout, &stderr))
    }
}

/// Join stdout and stderr the way both consumers expect
fn combine_output(stdout: &str, stderr: &str) -> String {
    let mut combined = stdout.to_string();
    if !stderr.is_empty() {
        combined.push('\n');
        combined.push_str(stderr);
    }
    combined.trim().to_string()
}
