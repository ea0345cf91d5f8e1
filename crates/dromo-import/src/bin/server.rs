//! Import relay server binary
//!
//! Run with: cargo run -p dromo-import --bin dromo-import-server

use clap::Parser;
use dromo_import::{config::ImportConfig, server::ImportServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dromo-import-server", version, about = "Dromo headless import relay")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "DROMO_IMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Host address (overrides config and HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dromo_import=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => ImportConfig::from_file(path)?,
        None => ImportConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Dromo API: {}", config.dromo.api_base);
    tracing::info!(
        "  - Schema: {}",
        config.dromo.schema_id.as_deref().unwrap_or("<unset>")
    );
    tracing::info!(
        "  - S3 bucket: {}",
        config.s3.bucket.as_deref().unwrap_or("<unset>")
    );
    tracing::info!(
        "  - Store: {}",
        config
            .store
            .persist_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "in-memory".to_string())
    );

    let server = ImportServer::new(config).await?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /import-file             - Start an import");
    tracing::info!("  GET  /import-status/:id       - Import status");
    tracing::info!("  GET  /imports                 - List imports");
    tracing::info!("  POST /webhook                 - Dromo callback");
    tracing::info!("  GET  /health                  - Liveness");

    server.start().await?;

    Ok(())
}
