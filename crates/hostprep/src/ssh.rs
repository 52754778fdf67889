use tokio::process::Command;

use crate::proxy::RemoteForward;

/// Typed ssh invocation for the target host. Built once from the run
/// configuration; every remote step derives its subprocess from it.
pub(crate) struct SshCommand {
    host: String,
    http_proxy: bool,
    user: Option<String>,
    remote_forward: Option<RemoteForward>,
}

impl SshCommand {
    pub(crate) fn new(
        host: String,
        http_proxy: bool,
        user: Option<String>,
        remote_forward: Option<RemoteForward>,
    ) -> Self {
        Self {
            host,
            http_proxy,
            user,
            remote_forward,
        }
    }

    /// Ordered argv, host always last.
    pub(crate) fn argv(&self) -> Vec<String> {
        let mut argv = vec!["ssh".to_string(), "-4".to_string()];
        if self.http_proxy {
            // A multiplexed connection cached from before the tunnel
            // existed must not be reused.
            argv.push("-o".to_string());
            argv.push("ControlPath=none".to_string());
        }
        if let Some(forward) = &self.remote_forward {
            argv.push("-R".to_string());
            argv.push(forward.spec());
        }
        if let Some(user) = &self.user {
            argv.push("-l".to_string());
            argv.push(user.clone());
        }
        argv.push(self.host.clone());
        argv
    }

    /// Subprocess running `remote_cmd` on the target host.
    pub(crate) fn command(&self, remote_cmd: &str) -> Command {
        let argv = self.argv();
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        cmd.arg(remote_cmd);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ssh(
        http_proxy: bool,
        user: Option<&str>,
        remote_forward: Option<RemoteForward>,
    ) -> SshCommand {
        SshCommand::new(
            "example.com".to_string(),
            http_proxy,
            user.map(str::to_string),
            remote_forward,
        )
    }

    #[test]
    fn minimal_invocation_forces_ipv4() {
        assert_eq!(ssh(false, None, None).argv(), ["ssh", "-4", "example.com"]);
    }

    #[test]
    fn proxy_disables_connection_multiplexing() {
        assert_eq!(
            ssh(true, None, None).argv(),
            ["ssh", "-4", "-o", "ControlPath=none", "example.com"]
        );
    }

    #[test]
    fn remote_forward_adds_r_argument() {
        assert_eq!(
            ssh(true, None, Some(RemoteForward::http_proxy())).argv(),
            [
                "ssh",
                "-4",
                "-o",
                "ControlPath=none",
                "-R",
                "8888:127.0.0.1:8888",
                "example.com"
            ]
        );
    }

    #[test]
    fn user_adds_login_argument() {
        assert_eq!(
            ssh(false, Some("admin"), None).argv(),
            ["ssh", "-4", "-l", "admin", "example.com"]
        );
    }

    #[test]
    fn host_is_always_the_final_argument() {
        for argv in [
            ssh(false, None, None).argv(),
            ssh(true, None, None).argv(),
            ssh(false, Some("admin"), None).argv(),
            ssh(true, Some("admin"), Some(RemoteForward::http_proxy())).argv(),
        ] {
            assert_eq!(argv.last().map(String::as_str), Some("example.com"));
        }
    }

    #[test]
    fn all_options_combine_in_order() {
        assert_eq!(
            ssh(true, Some("admin"), Some(RemoteForward::http_proxy())).argv(),
            [
                "ssh",
                "-4",
                "-o",
                "ControlPath=none",
                "-R",
                "8888:127.0.0.1:8888",
                "-l",
                "admin",
                "example.com"
            ]
        );
    }
}
