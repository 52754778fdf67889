mod ansible;
mod cli;
mod error;
mod install;
mod pipeline;
mod probe;
mod proxy;
mod ssh;

use clap::Parser;
use tracing::{error, info};

use crate::cli::Args;
use crate::error::StepError;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing();
    if let Err(err) = args.validate() {
        error!(error = %err, "invalid arguments");
        std::process::exit(2);
    }

    info!(
        host = %args.host,
        http_proxy = args.http_proxy,
        clean = args.clean,
        "bootstrapping host"
    );
    match pipeline::run(&args).await {
        Ok(()) => {
            info!(host = %args.host, "bootstrap complete");
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "bootstrap failed");
            // External command failures carry their own exit code.
            let code = err
                .downcast_ref::<StepError>()
                .map(|step| step.code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so captured subprocess output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
