use std::process::Output;

use anyhow::Context;
use tracing::info;

use system_utils::process::run_command_with_stdin;

use crate::proxy::HTTP_PROXY_PORT;
use crate::ssh::SshCommand;

const INSTALL_SCRIPT: &str = "install-python.sh";

/// Streams the local install script into a remote `sh -s` session. When the
/// proxy tunnel is up, the proxy port is passed as the script's argument so
/// the remote package manager can reach it.
///
/// The child's exit status is returned to the caller rather than checked
/// here; the probe that follows is the authoritative interpreter check.
pub(crate) async fn install_interpreter(
    ssh: &SshCommand,
    http_proxy: bool,
) -> anyhow::Result<Output> {
    let script = tokio::fs::read(INSTALL_SCRIPT)
        .await
        .with_context(|| format!("failed to read {INSTALL_SCRIPT}"))?;
    let remote_cmd = remote_shell_command(http_proxy);
    info!(
        event = "install.start",
        script = INSTALL_SCRIPT,
        remote_cmd = %remote_cmd,
        "installing interpreter on remote host"
    );
    let mut cmd = ssh.command(&remote_cmd);
    run_command_with_stdin(&mut cmd, &script, "remote install script").await
}

fn remote_shell_command(http_proxy: bool) -> String {
    if http_proxy {
        format!("sh -s {HTTP_PROXY_PORT}")
    } else {
        "sh -s".to_string()
    }
}
