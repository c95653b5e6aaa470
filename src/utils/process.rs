//! Process execution utilities
//!
//! Provides safe process execution with proper error handling and logging.

use crate::error::{PublisherError, Result};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Utility for running external processes
#[derive(Debug)]
pub struct ProcessRunner {
    debug: bool,
}

/// Result of a process execution
#[derive(Debug)]
pub struct ProcessResult {
    /// Exit status code
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Whether the process was successful
    pub success: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Run a command with arguments, inheriting stdout/stderr
    #[instrument(skip(self))]
    pub fn run_command(&self, command: &str, args: &[&str]) -> Result<()> {
        self.run_command_with_env(command, args, &[])
    }

    /// Run a command with arguments and environment variables
    #[instrument(skip(self, env_vars))]
    pub fn run_command_with_env(
        &self,
        command: &str,
        args: &[&str],
        env_vars: &[(String, String)],
    ) -> Result<()> {
        let cmd_str = format!("{} {}", command, args.join(" "));

        if self.debug {
            debug!("Running command: {}", cmd_str);
            if !env_vars.is_empty() {
                debug!("Environment variables: {:?}", env_vars);
            }
        } else {
            info!("+ {}", cmd_str);
        }

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Add environment variables
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let status = cmd.status().map_err(|e| {
            PublisherError::process(
                cmd_str.clone(),
                None,
                String::new(),
                format!("Failed to execute command: {e}"),
            )
        })?;

        if !status.success() {
            let exit_code = status.code();
            return Err(PublisherError::process(
                cmd_str,
                exit_code,
                String::new(),
                format!("Command failed with exit code: {exit_code:?}"),
            ));
        }

        debug!("Command completed successfully");
        Ok(())
    }

    /// Run a command with inherited stdio from the given working directory
    #[instrument(skip(self))]
    pub fn run_command_in_dir(
        &self,
        dir: &std::path::Path,
        command: &str,
        args: &[&str],
    ) -> Result<()> {
        let cmd_str = format!("{} {}", command, args.join(" "));

        if self.debug {
            debug!("Running command in {}: {}", dir.display(), cmd_str);
        } else {
            info!("+ {}", cmd_str);
        }

        let status = Command::new(command)
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                PublisherError::process(
                    cmd_str.clone(),
                    None,
                    String::new(),
                    format!("Failed to execute command: {e}"),
                )
            })?;

        if !status.success() {
            let exit_code = status.code();
            return Err(PublisherError::process(
                cmd_str,
                exit_code,
                String::new(),
                format!("Command failed with exit code: {exit_code:?}"),
            ));
        }

        debug!("Command completed successfully");
        Ok(())
    }

    /// Run a command with inherited stdio, killing it when the deadline passes.
    ///
    /// With no timeout this blocks until the child exits, same as
    /// [`run_command`](Self::run_command).
    #[instrument(skip(self))]
    pub fn run_command_with_timeout(
        &self,
        command: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<()> {
        let Some(timeout) = timeout else {
            return self.run_command(command, args);
        };

        let cmd_str = format!("{} {}", command, args.join(" "));
        info!("+ {} (timeout: {}s)", cmd_str, timeout.as_secs());

        let mut child = Command::new(command)
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                PublisherError::process(
                    cmd_str.clone(),
                    None,
                    String::new(),
                    format!("Failed to execute command: {e}"),
                )
            })?;

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!("Command exceeded {}s timeout, killing it", timeout.as_secs());
                        if let Err(e) = child.kill() {
                            warn!("Failed to kill timed-out process: {}", e);
                        }
                        // Reap the child before reporting the timeout
                        let _ = child.wait();
                        return Err(PublisherError::process(
                            cmd_str,
                            None,
                            String::new(),
                            format!("Command timed out after {}s", timeout.as_secs()),
                        ));
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => {
                    return Err(PublisherError::process(
                        cmd_str,
                        None,
                        String::new(),
                        format!("Failed to wait for command: {e}"),
                    ));
                }
            }
        };

        if !status.success() {
            let exit_code = status.code();
            return Err(PublisherError::process(
                cmd_str,
                exit_code,
                String::new(),
                format!("Command failed with exit code: {exit_code:?}"),
            ));
        }

        debug!("Command completed successfully");
        Ok(())
    }

    /// Run a command and capture its output
    #[instrument(skip(self))]
    pub fn run_command_with_output(&self, command: &str, args: &[&str]) -> Result<ProcessResult> {
        let cmd_str = format!("{} {}", command, args.join(" "));

        debug!("Running command with output capture: {}", cmd_str);

        let mut cmd = Command::new(command);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| {
            PublisherError::process(
                cmd_str.clone(),
                None,
                String::new(),
                format!("Failed to execute command: {e}"),
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let success = output.status.success();
        let exit_code = output.status.code();

        debug!(
            "Command finished: success={}, exit_code={:?}, stdout_len={}, stderr_len={}",
            success,
            exit_code,
            stdout.len(),
            stderr.len()
        );

        if !success {
            debug!("Command stderr: {}", stderr);
            return Err(PublisherError::process(cmd_str, exit_code, stdout, stderr));
        }

        Ok(ProcessResult {
            exit_code,
            stdout,
            stderr,
            success,
        })
    }

    /// Check if a command exists in PATH
    #[instrument(skip(self))]
    pub fn command_exists(&self, command: &str) -> bool {
        debug!("Checking if command exists: {}", command);

        let result = Command::new("which")
            .arg(command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) => {
                let exists = status.success();
                debug!("Command '{}' exists: {}", command, exists);
                exists
            }
            Err(e) => {
                debug!("Failed to check if command '{}' exists: {}", command, e);
                false
            }
        }
    }

    /// Check availability of a tool given either a bare name or an explicit path
    pub fn tool_available(&self, command: &str) -> bool {
        let path = std::path::Path::new(command);
        if path.components().count() > 1 {
            path.exists()
        } else {
            self.command_exists(command)
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}
