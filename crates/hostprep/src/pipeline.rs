use std::time::Instant;

use tracing::{info, warn};

use crate::ansible::{run_playbook, AnsibleCommand, Playbook};
use crate::cli::Args;
use crate::error::status_code;
use crate::install::install_interpreter;
use crate::probe::probe_system;
use crate::proxy::{start_http_proxy, RemoteForward};
use crate::ssh::SshCommand;

/// The whole bootstrap, top to bottom. Strictly sequential; the first
/// failing step aborts the rest, and nothing is rolled back.
pub(crate) async fn run(args: &Args) -> anyhow::Result<()> {
    let remote_forward = if args.http_proxy {
        run_step("start_http_proxy", start_http_proxy()).await?;
        Some(RemoteForward::http_proxy())
    } else {
        None
    };

    let ssh = SshCommand::new(
        args.host.clone(),
        args.http_proxy,
        args.user(),
        remote_forward,
    );

    let install = run_step(
        "install_interpreter",
        install_interpreter(&ssh, args.http_proxy),
    )
    .await?;
    print!("{}", install_diagnostics(&install));
    if !install.status.success() {
        // The probe right after is the authoritative interpreter check, so
        // a failed install is reported but not fatal.
        warn!(
            event = "install.failed",
            code = status_code(&install.status),
            "install script reported failure, continuing"
        );
    }

    let system = run_step("probe_system", probe_system(&ssh)).await?;

    let ansible = AnsibleCommand::new(
        args.ask_pass,
        args.host.clone(),
        args.user(),
        args.verbosity,
        system,
    );
    for playbook in planned_playbooks(args) {
        run_step(playbook.step_name(), run_playbook(&ansible, &playbook)).await?;
    }
    Ok(())
}

/// Installer output for the operator, both streams verbatim. The script
/// writes progress to stderr, so it is kept even on success.
fn install_diagnostics(output: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Playbooks this run will apply, in order.
fn planned_playbooks(args: &Args) -> Vec<Playbook> {
    let mut playbooks = vec![Playbook::Bootstrap];
    if args.clean {
        playbooks.push(Playbook::Clean);
    }
    if let Some(key) = &args.key {
        playbooks.push(Playbook::Key(key.clone()));
    }
    playbooks
}

async fn run_step<T, Fut>(step: &'static str, fut: Fut) -> anyhow::Result<T>
where
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    info!(event = "step.start", step, "step start");
    let start = Instant::now();
    match fut.await {
        Ok(value) => {
            info!(
                event = "step.done",
                step,
                elapsed_ms = start.elapsed().as_millis(),
                "step done"
            );
            Ok(value)
        }
        Err(err) => {
            warn!(
                event = "step.failed",
                step,
                elapsed_ms = start.elapsed().as_millis(),
                error = %err,
                "step failed"
            );
            Err(err)
        }
    }
}
