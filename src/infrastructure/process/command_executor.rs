use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, trace};

use crate::common::error::GkError;
use crate::common::result::async_helpers::with_timeout;

/// Command executor errors
#[derive(Debug, Error)]
pub enum CommandExecutorError {
    #[error("Command timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Process spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process termination failed: {0}")]
    TerminationFailed(String),
}

/// Configuration for command execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Timeout for command execution in seconds
    pub timeout_seconds: Option<u64>,
}

impl ExecutionConfig {
    /// Create a new execution config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Set timeout only when one is given
    pub fn with_optional_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code of the process (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Standard output
    pub stdout: String,

    /// Standard error output
    pub stderr: String,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,

    /// Whether the command was successful (exit code 0)
    pub success: bool,
}

impl ExecutionResult {
    /// Create a new execution result
    pub fn new(exit_code: i32, stdout: String, stderr: String, execution_time_ms: u64) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            execution_time_ms,
            success: exit_code == 0,
        }
    }
}

/// Command executor for running external processes
pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute a program with arguments, capturing stdout and stderr
    pub async fn execute<S: AsRef<str>>(
        program: &str,
        args: &[S],
        config: &ExecutionConfig,
    ) -> Result<ExecutionResult, CommandExecutorError> {
        if program.trim().is_empty() {
            return Err(CommandExecutorError::InvalidCommand(
                "Program is empty".to_string(),
            ));
        }

        let start_time = Instant::now();
        let command_line = Self::display_command(program, args);
        debug!(command = %command_line, "Running command");

        let mut cmd = Command::new(program);
        cmd.args(args.iter().map(|a| a.as_ref()));

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            CommandExecutorError::SpawnFailed(format!("Failed to spawn '{}': {}", command_line, e))
        })?;

        let (exit_code, stdout, stderr) = match config.timeout_seconds {
            Some(timeout_secs) => with_timeout(Self::wait_for_completion(child), timeout_secs)
                .await
                .map_err(|e| match e {
                    GkError::Timeout { timeout_secs } => CommandExecutorError::Timeout {
                        timeout_seconds: timeout_secs,
                    },
                    other => CommandExecutorError::TerminationFailed(other.to_string()),
                })??,
            None => Self::wait_for_completion(child).await?,
        };

        let execution_time = start_time.elapsed().as_millis() as u64;
        trace!(command = %command_line, exit_code, execution_time, "Command finished");

        Ok(ExecutionResult::new(exit_code, stdout, stderr, execution_time))
    }

    /// Render a program and its arguments as a single line for messages
    pub fn display_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg.as_ref());
        }
        line
    }

    /// Wait for child process to complete and capture output
    async fn wait_for_completion(
        mut child: Child,
    ) -> Result<(i32, String, String), CommandExecutorError> {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained together so a full stderr never blocks stdout
        let (stdout_data, stderr_data) =
            tokio::try_join!(Self::read_all(stdout), Self::read_all(stderr))?;

        let exit_status = child.wait().await.map_err(|e| {
            CommandExecutorError::TerminationFailed(format!("Failed to wait for process: {}", e))
        })?;

        Ok((exit_status.code().unwrap_or(-1), stdout_data, stderr_data))
    }

    async fn read_all<R>(pipe: Option<R>) -> Result<String, CommandExecutorError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        // Invalid UTF-8 is replaced rather than rejected
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
