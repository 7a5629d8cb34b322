// Main entry point - Logging, configuration and command dispatch
use clap::Parser;
use scan_client::infrastructure::config::load_client_config;
use scan_client::presentation::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = load_client_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    run(cli, config).await
}
