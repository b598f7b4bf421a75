use anyhow::Result;
use clap::Parser;
use forge_server::config::ServerConfig;
use forge_server::http::{router, AppState};
use forge_server::jobs::create_job_store;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "forge-server")]
#[command(version)]
#[command(about = "HTTP runner for forensic evidence tools", long_about = None)]
struct Cli {
    /// Configuration file; without it, environment variables and defaults
    /// are used.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            ServerConfig::from_file(path)?
        }
        None => ServerConfig::from_env(),
    };

    tracing::info!(
        "Initializing job storage at {}",
        config.storage.job_root.display()
    );
    let jobs = create_job_store(&config.storage).await?;

    let addr: SocketAddr = config.server.address.parse()?;
    let state = AppState {
        config: Arc::new(config),
        jobs,
    };
    let app = router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "forge_server=debug,forge_server_bin=debug"
    } else {
        "forge_server=info,forge_server_bin=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
