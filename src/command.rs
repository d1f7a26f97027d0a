//! Helpers for running external tools (kind, helm, docker/podman)

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// Run a prepared command to completion and return its stdout.
///
/// A non-zero exit status becomes [`Error::CommandFailed`] carrying the
/// program name and its stderr.
#[async_trait]
pub trait CommandExt {
    async fn output_checked(&mut self) -> Result<String>;

    /// Same as [`CommandExt::output_checked`], writing `input` to stdin first.
    async fn output_checked_with_stdin(&mut self, input: &[u8]) -> Result<String>;
}

#[async_trait]
impl CommandExt for Command {
    async fn output_checked(&mut self) -> Result<String> {
        debug!(command = ?self.as_std(), "Running command");
        let output = self.stdin(Stdio::null()).output().await?;
        check_output(&program_name(self), output)
    }

    async fn output_checked_with_stdin(&mut self, input: &[u8]) -> Result<String> {
        debug!(command = ?self.as_std(), "Running command with stdin");
        let mut child = self
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input).await?;
            // closes stdin so the child sees EOF
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        check_output(&program_name(self), output)
    }
}

fn program_name(cmd: &Command) -> String {
    cmd.as_std().get_program().to_string_lossy().into_owned()
}

fn check_output(program: &str, output: std::process::Output) -> Result<String> {
    if !output.status.success() {
        return Err(Error::command_failed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
