use tokio::process::Command;
use tracing::info;

use system_utils::process::run_command;

use crate::error::{status_code, StepError};

const BSD_INTERPRETER: &str = "ansible_python_interpreter=/usr/local/bin/python";

/// Typed ansible-playbook invocation shared by every playbook run.
pub(crate) struct AnsibleCommand {
    ask_pass: bool,
    host: String,
    user: Option<String>,
    verbosity: u8,
    system: String,
}

impl AnsibleCommand {
    pub(crate) fn new(
        ask_pass: bool,
        host: String,
        user: Option<String>,
        verbosity: u8,
        system: String,
    ) -> Self {
        Self {
            ask_pass,
            host,
            user,
            verbosity,
            system,
        }
    }

    /// Base argv; each run appends a playbook suffix.
    pub(crate) fn argv(&self) -> Vec<String> {
        let mut argv = vec!["ansible-playbook".to_string()];
        if self.ask_pass {
            argv.push("-k".to_string());
        }
        match self.user.as_deref() {
            Some("root") => {
                argv.push("-u".to_string());
                argv.push("root".to_string());
            }
            Some(user) => {
                argv.push("-b".to_string());
                argv.push("-u".to_string());
                argv.push(user.to_string());
            }
            None => {}
        }
        // Trailing comma marks a single-entry inventory.
        argv.push("-i".to_string());
        argv.push(format!("{},", self.host));
        if self.verbosity > 0 {
            argv.push(format!("-{}", "v".repeat(usize::from(self.verbosity))));
        }
        // Ansible's default interpreter path is wrong on the BSDs.
        if self.system == "OpenBSD" || self.system == "FreeBSD" {
            argv.push("-e".to_string());
            argv.push(BSD_INTERPRETER.to_string());
        }
        argv
    }
}

pub(crate) enum Playbook {
    Bootstrap,
    Clean,
    Key(String),
}

impl Playbook {
    pub(crate) fn step_name(&self) -> &'static str {
        match self {
            Playbook::Bootstrap => "run_bootstrap_playbook",
            Playbook::Clean => "run_clean_playbook",
            Playbook::Key(_) => "run_key_playbook",
        }
    }

    pub(crate) fn suffix(&self) -> Vec<String> {
        match self {
            Playbook::Bootstrap => vec!["bootstrap.yml".to_string()],
            Playbook::Clean => vec!["clean.yml".to_string()],
            Playbook::Key(path) => vec![
                "-e".to_string(),
                format!("ssh_key={path}"),
                "key.yml".to_string(),
            ],
        }
    }
}

/// Runs one playbook against the target host. Success prints the tool's
/// stdout; failure prints stdout then stderr (ansible reports errors on
/// stdout) and aborts the run with the tool's exit code.
pub(crate) async fn run_playbook(base: &AnsibleCommand, playbook: &Playbook) -> anyhow::Result<()> {
    let mut argv = base.argv();
    argv.extend(playbook.suffix());
    info!(event = "playbook.run", argv = ?argv, "running playbook");
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    let output = run_command(&mut cmd, "ansible-playbook").await?;
    if !output.status.success() {
        print!("{}", String::from_utf8_lossy(&output.stdout));
        print!("{}", String::from_utf8_lossy(&output.stderr));
        return Err(StepError::new(playbook.step_name(), status_code(&output.status)).into());
    }
    print!("{}", String::from_utf8_lossy(&output.stdout));
    Ok(())
}
