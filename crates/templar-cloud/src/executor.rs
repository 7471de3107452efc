use std::process::Stdio;

use crate::error::ExecError;

/// Abstraction over CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait Executor: Send + Sync {
    /// Execute a command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, ExecError>;

    /// Execute a command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), ExecError>;

    /// Execute a command with data piped to stdin.
    async fn exec_with_stdin(&self, args: &[String], stdin_data: &[u8])
    -> Result<String, ExecError>;
}

/// Runs a real CLI binary directly, without a shell.
///
/// Children are killed when their future is dropped, so a timed-out
/// template does not leave a build running.
#[derive(Debug, Clone)]
pub struct RealExecutor {
    program: String,
}

impl RealExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn docker() -> Self {
        Self::new("docker")
    }

    pub fn gcloud() -> Self {
        Self::new("gcloud")
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args).kill_on_drop(true);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> ExecError {
        ExecError::NotFound {
            program: self.program.clone(),
            source,
        }
    }

    fn failed(&self, args: &[String], stderr: String) -> ExecError {
        ExecError::CommandFailed {
            program: self.program.clone(),
            args: args.to_vec(),
            stderr,
        }
    }
}

impl Executor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, ExecError> {
        tracing::debug!(program = %self.program, ?args, "exec");

        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.not_found(e))?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ExecError::InvalidUtf8 {
                program: self.program.clone(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(self.failed(args, stderr))
        }
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), ExecError> {
        tracing::debug!(program = %self.program, ?args, "exec (streaming)");

        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(self.failed(args, format!("exit code: {status}")))
        }
    }

    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, ExecError> {
        use tokio::io::AsyncWriteExt;

        tracing::debug!(program = %self.program, ?args, bytes = stdin_data.len(), "exec (stdin)");

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let stdin_err = |e| ExecError::StdinWrite {
                program: self.program.clone(),
                source: e,
            };
            stdin.write_all(stdin_data).await.map_err(stdin_err)?;
            stdin.shutdown().await.map_err(stdin_err)?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.not_found(e))?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ExecError::InvalidUtf8 {
                program: self.program.clone(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(self.failed(args, stderr))
        }
    }
}
