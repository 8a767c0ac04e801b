use anyhow::Result;
use shepherd_core::LaunchConfig;
use shepherd_supervisor::Supervisor;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Log to stderr so the child's stdout passes through untouched.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!(error = %e, "Supervisor terminated abnormally");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let config = LaunchConfig::from_env()?;

    info!(
        entry = %config.entry_point.display(),
        port = %config.port(),
        run_mode = %config.run_mode(),
        "Starting supervised process"
    );

    let supervisor = Supervisor::new(config);
    Ok(supervisor.run().await?)
}
