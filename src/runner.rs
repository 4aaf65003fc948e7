use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::session::Session;

/// One external invocation: program, argument vector and an optional file
/// that standard output streams into. The orchestrator never parses tool
/// output, so this is the whole contract with every wrapped scanner.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: &'static str,
    pub args: Vec<String>,
    pub stdout_to: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: &'static str, args: Vec<String>) -> Self {
        Self {
            program,
            args,
            stdout_to: None,
        }
    }

    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.stdout_to = Some(path);
        self
    }

    /// Rendering used for the command log and console output.
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("exited with status {code}: {stderr}")]
    Failed { code: i32, stderr: String },
    #[error("timed out after {0} seconds")]
    TimedOut(u64),
}

/// Executes external commands with a flat timeout ceiling. Failures are
/// returned to the caller, never escalated; a failing phase must not stop
/// the run.
#[derive(Debug, Clone)]
pub struct Runner {
    timeout_secs: u64,
}

impl Runner {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Logs the invocation, runs it to completion or the timeout ceiling,
    /// and classifies the result. A non-zero exit with nothing on stderr
    /// still counts as success; several of the wrapped tools exit non-zero
    /// on unremarkable conditions.
    pub async fn run(&self, session: &Session, spec: &CommandSpec) -> Result<(), RunError> {
        let line = spec.command_line();
        if let Err(err) = session.log_command(&line, spec.stdout_to.as_deref()) {
            warn!("could not record invocation in command log: {err:#}");
        }
        debug!(command = %line, timeout = self.timeout_secs, "executing");

        let mut cmd = Command::new(spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match &spec.stdout_to {
            Some(path) => {
                let file = std::fs::File::create(path).map_err(|source| RunError::Spawn {
                    program: spec.program.to_string(),
                    source,
                })?;
                cmd.stdout(Stdio::from(file));
            }
            None => {
                cmd.stdout(Stdio::null());
            }
        }

        let child = cmd.spawn().map_err(|source| RunError::Spawn {
            program: spec.program.to_string(),
            source,
        })?;

        // Dropping the future on timeout kills the child via kill_on_drop.
        let output = match timeout(Duration::from_secs(self.timeout_secs), child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| RunError::Spawn {
                program: spec.program.to_string(),
                source,
            })?,
            Err(_) => return Err(RunError::TimedOut(self.timeout_secs)),
        };

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() && !stderr.is_empty() {
            return Err(RunError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(())
    }
}
