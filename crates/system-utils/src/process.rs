use std::process::{Output, Stdio};

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Runs a command to completion with both output streams captured.
///
/// There is deliberately no timeout: a hung external command blocks the
/// caller until it terminates.
pub async fn run_command(cmd: &mut Command, label: &str) -> anyhow::Result<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {label}"))?;
    child
        .wait_with_output()
        .await
        .with_context(|| format!("{label} failed"))
}

/// Runs a command to completion, feeding `input` to its stdin first.
pub async fn run_command_with_stdin(
    cmd: &mut Command,
    input: &[u8],
    label: &str,
) -> anyhow::Result<Output> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {label}"))?;
    let mut stdin = child
        .stdin
        .take()
        .with_context(|| format!("{label} stdin unavailable"))?;
    stdin
        .write_all(input)
        .await
        .with_context(|| format!("failed to write {label} stdin"))?;
    stdin
        .shutdown()
        .await
        .with_context(|| format!("failed to close {label} stdin"))?;
    drop(stdin);
    child
        .wait_with_output()
        .await
        .with_context(|| format!("{label} failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_status() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("printf hello");
        let output = run_command(&mut cmd, "sh").await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"hello");
    }

    #[tokio::test]
    async fn reports_nonzero_exit_without_error() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo oops >&2; exit 3");
        let output = run_command(&mut cmd, "sh").await.unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stderr, b"oops\n");
    }

    #[tokio::test]
    async fn pipes_input_to_stdin() {
        let mut cmd = Command::new("sh");
        cmd.arg("-s");
        let output = run_command_with_stdin(&mut cmd, b"printf from-script\n", "sh")
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"from-script");
    }

    #[tokio::test]
    async fn spawn_failure_is_an_error() {
        let mut cmd = Command::new("/nonexistent/definitely-not-a-binary");
        assert!(run_command(&mut cmd, "missing").await.is_err());
    }
}
