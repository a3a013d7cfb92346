use super::{CommandOutput, PrivilegedExecutor, ShellError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default upper bound for one privileged session.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes commands by piping them into an interactive `su` shell.
///
/// Each call starts a fresh session, writes every command line followed by
/// `exit`, and waits for the shell to finish. A session that outlives the
/// timeout is killed.
#[derive(Debug, Clone)]
pub struct SuExecutor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for SuExecutor {
    fn default() -> Self {
        Self::new("su", Vec::new(), DEFAULT_TIMEOUT)
    }
}

impl SuExecutor {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn script(commands: &[String]) -> String {
        let mut script = String::new();
        for command in commands {
            script.push_str(command);
            script.push('\n');
        }
        script.push_str("exit\n");
        script
    }
}

#[async_trait]
impl PrivilegedExecutor for SuExecutor {
    async fn execute(&self, commands: &[String]) -> Result<CommandOutput, ShellError> {
        log::debug!("Running {} command(s) via {}", commands.len(), self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ShellError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = async {
                stdin.write_all(Self::script(commands).as_bytes()).await?;
                stdin.flush().await
            }
            .await;
            // A shell that refuses us may exit before reading; its stderr
            // still explains why.
            match written {
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    log::debug!("{} closed stdin before reading commands", self.program);
                }
                other => other?,
            }
            // Dropping stdin closes the pipe so the shell sees EOF after `exit`.
        }

        // On timeout the future owning the child is dropped, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                log::error!(
                    "{} session exceeded {:?}; killing it",
                    self.program,
                    self.timeout
                );
                ShellError::Timeout(self.timeout)
            })??;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::debug!(
            "Session finished: status={:?}, stdout={:?}, stderr={:?}",
            result.status,
            result.stdout,
            result.stderr
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(timeout: Duration) -> SuExecutor {
        SuExecutor::new("sh", Vec::new(), timeout)
    }

    #[tokio::test]
    async fn captures_stdout_and_status() {
        let output = sh(DEFAULT_TIMEOUT)
            .execute(&["echo hello".to_string(), "echo world".to_string()])
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "hello\nworld\n");
    }

    #[tokio::test]
    async fn reports_failure_with_stderr() {
        let output = sh(DEFAULT_TIMEOUT)
            .execute(&["echo broken >&2".to_string(), "exit 3".to_string()])
            .await
            .unwrap();
        assert!(!output.success());
        assert_eq!(output.status, Some(3));
        assert_eq!(output.failure_message(), "broken");
    }

    #[tokio::test]
    async fn times_out_hung_sessions() {
        let started = std::time::Instant::now();
        let err = sh(Duration::from_millis(200))
            .execute(&["sleep 5".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ShellError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn refusing_shell_still_reports_stderr() {
        let executor = SuExecutor::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo 'Permission denied' >&2; exit 1".to_string(),
            ],
            DEFAULT_TIMEOUT,
        );
        // Larger than a pipe buffer so the write outlives the shell.
        let output = executor
            .execute(&["x".repeat(256 * 1024)])
            .await
            .unwrap();
        assert_eq!(output.status, Some(1));
        assert_eq!(output.failure_message(), "Permission denied");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let executor = SuExecutor::new("/nonexistent/su", Vec::new(), DEFAULT_TIMEOUT);
        let err = executor.execute(&[]).await.unwrap_err();
        assert!(matches!(err, ShellError::Spawn { .. }));
    }

    #[test]
    fn failure_message_falls_back_to_status() {
        let output = CommandOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "  \n".to_string(),
        };
        assert_eq!(output.failure_message(), "exited with status 1");
    }
}
