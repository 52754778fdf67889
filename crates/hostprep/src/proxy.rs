use tokio::process::Command;
use tracing::info;

use system_utils::process::run_command;

use crate::error::{status_code, StepError};

/// Port tinyproxy listens on locally, tunneled to the same port remotely.
pub(crate) const HTTP_PROXY_PORT: u16 = 8888;

const PROXY_SERVICE: &str = "tinyproxy.service";

/// A remote port forward of the form `<port>:127.0.0.1:<port>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RemoteForward {
    port: u16,
}

impl RemoteForward {
    pub(crate) fn http_proxy() -> Self {
        Self {
            port: HTTP_PROXY_PORT,
        }
    }

    pub(crate) fn spec(&self) -> String {
        format!("{}:127.0.0.1:{}", self.port, self.port)
    }
}

/// Starts the local forwarding proxy through the service manager. Runs
/// before any remote contact; a refusal here aborts the whole run with the
/// service manager's exit code.
pub(crate) async fn start_http_proxy() -> anyhow::Result<()> {
    info!(event = "proxy.start", service = PROXY_SERVICE, "starting http proxy service");
    let mut cmd = Command::new("sudo");
    cmd.arg("systemctl").arg("start").arg(PROXY_SERVICE);
    let output = run_command(&mut cmd, "systemctl start").await?;
    if !output.status.success() {
        print!("{}", String::from_utf8_lossy(&output.stderr));
        return Err(StepError::new("start_http_proxy", status_code(&output.status)).into());
    }
    print!("{}", String::from_utf8_lossy(&output.stdout));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_spec_embeds_proxy_port_twice() {
        assert_eq!(RemoteForward::http_proxy().spec(), "8888:127.0.0.1:8888");
    }
}
