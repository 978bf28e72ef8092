use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use laurels_core::content::ContentCache;
use laurels_db::content_source::PgContentSource;
use laurels_events::{ActivityPersistence, EventBus};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use laurels_api::background;
use laurels_api::bootstrap::{ensure_admin, BootstrapOutcome};
use laurels_api::config::ServerConfig;
use laurels_api::router::build_app_router;
use laurels_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "laurels_api=debug,laurels_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = laurels_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    laurels_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    let report = laurels_db::provision::provision_schema(&pool)
        .await
        .expect("Failed to provision database schema");
    tracing::info!(
        tables = report.verified_tables.len(),
        repaired = report.repaired,
        "Database schema verified"
    );

    // --- Bootstrap admin ---
    if let Some(admin) = &config.bootstrap_admin {
        match ensure_admin(&pool, admin).await {
            Ok(BootstrapOutcome::AdminPresent) => {
                tracing::debug!("Admin already present, skipping bootstrap")
            }
            Ok(outcome) => tracing::info!(?outcome, "Bootstrap admin provisioned"),
            Err(e) => tracing::error!(error = %e, "Bootstrap admin could not be provisioned"),
        }
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let persistence_handle = tokio::spawn(ActivityPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Activity persistence started");

    // --- Background jobs ---
    let jobs_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn(background::session_cleanup::run(
        pool.clone(),
        jobs_cancel.clone(),
    ));

    // --- Content cache ---
    let content = Arc::new(ContentCache::new(
        Arc::new(PgContentSource::new(pool.clone())),
        config.cache_config(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        content,
    };

    let app = build_app_router(state, &config)
        .unwrap_or_else(|e| panic!("Invalid configuration: {e}"));

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    jobs_cancel.cancel();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(drain, cleanup_handle).await;

    // Dropping the last sender closes the channel and ends the persistence loop.
    drop(event_bus);
    if tokio::time::timeout(drain, persistence_handle).await.is_err() {
        tracing::warn!(timeout_secs = config.shutdown_timeout_secs, "Activity persistence did not drain in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
