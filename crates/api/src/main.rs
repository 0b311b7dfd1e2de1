use landing_hub_api::{config, dispatcher::BroadcastRegistry, middleware, routes, state};
use landing_hub_core::events::bus::EventBus;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = config::AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}. Is DATABASE_URL set?"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting Landing Hub API server");

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;

    tracing::info!("Connected to PostgreSQL");

    // Run migrations
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;

    tracing::info!("Database migrations applied");

    // The media store and the /media file routes both need the root to exist
    std::fs::create_dir_all(&config.media_root)
        .map_err(|e| anyhow::anyhow!("Failed to create media root: {e}"))?;

    if config.whatsapp.is_some() {
        tracing::info!("WhatsApp gateway configured, broadcasts enabled");
    } else {
        tracing::warn!("WhatsApp gateway not configured, broadcasts are disabled");
    }

    // Create event bus
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build application state
    let state = state::AppState::new(pool, config.clone(), event_bus);

    // Keep broadcast snapshots current for the polling endpoint
    let monitor: BroadcastRegistry = state.broadcasts().clone();
    tokio::spawn(monitor.run_monitor(state.event_bus().subscribe()));

    // Build router with middleware
    let app = routes::build_router(state)
        .layer(middleware::trace_layer())
        .layer(middleware::cors_layer());

    // Start server
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
