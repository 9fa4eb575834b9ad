mod args;
mod error;
mod report;

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use nvrcheck_core::{ConnectionTarget, Runner, WebSdk};

use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    // Without a server address there is nothing to do.
    let Some(target) = args::parse(std::env::args_os().skip(1)) else {
        return;
    };

    if let Err(err) = run(&target).await {
        let code = err.exit_code();
        let report = miette::Report::new(err);
        if code == exit_code::SUCCESS {
            println!("{report:?}");
        } else {
            eprintln!("{report:?}");
            std::process::exit(code);
        }
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(target: &ConnectionTarget) -> Result<(), CliError> {
    let path = nvrcheck_config::config_path();
    let settings =
        nvrcheck_config::load_settings_from(&path).map_err(|e| CliError::config(&path, e))?;

    init_tracing(&settings.log_level);
    debug!(config = %path.display(), "configuration loaded");

    let run_settings = settings
        .run_settings()
        .map_err(|e| CliError::config(&path, e))?;
    let sdk_config = settings
        .web_sdk_config()
        .map_err(|e| CliError::config(&path, e))?;

    let runner = Runner::new(WebSdk::new(sdk_config), run_settings).on_registration_error(
        |endpoint, _| println!("{}", report::registration_failed(endpoint)),
    );
    cancel_on_interrupt(runner.cancel_token());

    debug!(address = %target.address, expected = target.expected_devices, "starting check");
    let report = runner.run(target).await?;

    for line in report::render(&report) {
        println!("{line}");
    }
    Ok(())
}

/// Cancel the in-flight wait on Ctrl-C; the runner still tears down. A
/// second Ctrl-C exits at once.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if second_interrupt(&token, tokio::signal::ctrl_c).await {
            std::process::exit(exit_code::INTERRUPTED);
        }
    });
}

/// Cancels `token` on the first interrupt and returns true once a second
/// one arrives.
async fn second_interrupt<F, Fut>(token: &CancellationToken, mut interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if interrupt().await.is_err() {
        return false;
    }
    warn!("interrupted, cancelling; press Ctrl-C again to exit immediately");
    token.cancel();
    interrupt().await.is_ok()
}
