use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acervo_core::{
    load_config, validate_config, CatalogStore, FileStore, GithubStore, MetadataResolver,
    PriceScraper, PriceSource, StoreBackend,
};

use acervo_server::api::create_router;
use acervo_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ACERVO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Store backend: {:?}", config.store.backend);
    info!("Identity key: {:?}", config.catalog.identity_key);

    // Log a config fingerprint so deployments can be told apart
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Create the catalog store
    let store: Arc<dyn CatalogStore> = match config.store.backend {
        StoreBackend::Github => {
            let github_config = match &config.store.github {
                Some(c) => c.clone(),
                None => bail!("github backend selected but no [store.github] section provided"),
            };
            info!(
                "Using GitHub store ({} / {})",
                github_config.repo, github_config.path
            );
            Arc::new(GithubStore::new(github_config).context("Failed to create GitHub store")?)
        }
        StoreBackend::File => {
            let file_config = match &config.store.file {
                Some(c) => c.clone(),
                None => bail!("file backend selected but no [store.file] section provided"),
            };
            info!("Using file store at {:?}", file_config.path);
            Arc::new(FileStore::new(file_config))
        }
    };

    // Create the metadata resolver (providers tried in order)
    let resolver = Arc::new(
        MetadataResolver::from_config(&config.metadata)
            .context("Failed to create metadata resolver")?,
    );
    info!("Metadata resolver initialized");

    // Create the price scraper
    let price_source: Arc<dyn PriceSource> = Arc::new(
        PriceScraper::new(&config.pricing).context("Failed to create price scraper")?,
    );
    info!("Price scraper initialized ({})", config.pricing.base_url);

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), store, resolver, price_source));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
