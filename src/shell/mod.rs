//! Privileged command execution.
//!
//! Provisioning and shell dispatch only need "run these command lines as
//! root and tell me what happened". That capability is the
//! [`PrivilegedExecutor`] trait; [`SuExecutor`] implements it by feeding the
//! lines to a `su` session.

mod su;

pub use su::SuExecutor;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Captured result of one privileged session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the session was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Text to report when the session failed: stderr if there is any,
    /// otherwise a note about the exit status.
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.status {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Errors that prevent a privileged session from producing output at all.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to privileged shell: {0}")]
    Io(#[from] std::io::Error),

    #[error("privileged shell did not finish within {0:?}")]
    Timeout(Duration),
}

/// Runs command lines in a single privileged session.
#[async_trait]
pub trait PrivilegedExecutor: Send + Sync {
    async fn execute(&self, commands: &[String]) -> Result<CommandOutput, ShellError>;
}
