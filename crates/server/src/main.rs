use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    load_config, validate_config, CatalogSource, CatalogView, ChangeNotifier, MovieStore,
    SqliteStore, SyncEngine, ThumbnailSource, TmdbClient, YoutubeClient,
};

use marquee_server::api::create_router;
use marquee_server::state::AppState;

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
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite movie store
    let store: Arc<dyn MovieStore> = Arc::new(
        SqliteStore::new(&config.database.path).context("Failed to create movie store")?,
    );
    info!("Movie store initialized");

    // Create remote clients
    let thumbnails: Arc<dyn ThumbnailSource> = Arc::new(
        YoutubeClient::new(config.youtube.clone())
            .context("Failed to create video-hosting client")?,
    );
    let source: Arc<dyn CatalogSource> = Arc::new(
        TmdbClient::new(config.tmdb.clone(), Arc::clone(&thumbnails))
            .context("Failed to create discovery client")?,
    );
    info!("Remote clients initialized");

    // Create sync engine and catalog view sharing one notifier
    let notifier = ChangeNotifier::new();
    let engine = Arc::new(SyncEngine::new(
        Arc::clone(&store),
        source,
        notifier.clone(),
    ));
    let view = CatalogView::new(Arc::clone(&store), notifier);

    // Warm the catalog in the background; the first read retries anyway.
    let warmup_engine = Arc::clone(&engine);
    tokio::spawn(async move {
        if let Err(e) = warmup_engine.ensure_catalog().await {
            warn!("Startup catalog sync failed: {}", e);
        }
    });

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), engine, view));

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

    info!("Server shutting down...");

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
