use clap::Parser;

use fisc_core::ErrorResponse;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        print_error_envelope(&format!("{error:#}"));
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = fisc_config::FiscConfig::load_with_dotenv()?;
    tracing::debug!(
        default_country = %config.general.default_country,
        model = %config.ai.model,
        "configuration loaded"
    );

    match &cli.command {
        cli::Commands::Store(args) => commands::store::handle(args, &config).await,
        cli::Commands::Fetch(args) => commands::fetch::handle(args, &config).await,
        cli::Commands::Extract(args) => commands::extract::handle(args),
        cli::Commands::Explain(args) => commands::explain::handle(args, &config).await,
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FISC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Failures leave through one shape: the `{"status":"error", ...}` envelope.
fn print_error_envelope(message: &str) {
    match serde_json::to_string(&ErrorResponse::new(message)) {
        Ok(envelope) => eprintln!("{envelope}"),
        Err(_) => eprintln!("{message}"),
    }
}
