use std::process::Output;

use tracing::info;

use system_utils::process::run_command;

use crate::error::StepError;
use crate::ssh::SshCommand;

const PROBE_COMMAND: &str = "python -c 'import platform ; print(platform.system())'";

/// Asks the remote host what it is running. The identifier decides whether
/// ansible needs a BSD interpreter path override. A failed probe aborts the
/// run with exit code -1 before any playbook is attempted.
pub(crate) async fn probe_system(ssh: &SshCommand) -> anyhow::Result<String> {
    let mut cmd = ssh.command(PROBE_COMMAND);
    let output = run_command(&mut cmd, "system probe").await?;
    let system = evaluate_probe(output)?;
    info!(event = "probe.system", system = %system, "probed remote system");
    Ok(system)
}

fn evaluate_probe(output: Output) -> anyhow::Result<String> {
    if !output.status.success() {
        print!("{}", String::from_utf8_lossy(&output.stderr));
        return Err(StepError::new("probe_system", -1).into());
    }
    Ok(parse_identifier(&output.stdout))
}

/// Probe output minus its trailing newline; no further normalization.
fn parse_identifier(raw: &[u8]) -> String {
    let trimmed = raw.strip_suffix(b"\n").unwrap_or(raw);
    String::from_utf8_lossy(trimmed).to_string()
}
