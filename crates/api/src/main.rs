use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gigbook_api::background;
use gigbook_api::config::ServerConfig;
use gigbook_api::router::build_app_router;
use gigbook_api::state::AppState;
use gigbook_db::DbPool;
use gigbook_events::{EventBus, EventPersistence};

/// Grace period for each background task after shutdown is signalled.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_LOG_FILTER: &str = "gigbook_api=debug,gigbook_events=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    init_tracing(config.log_json);
    tracing::info!(
        host = %config.host,
        port = config.port,
        platform_fee_percent = %config.marketplace.platform_fee_percent,
        dispute_window_days = config.marketplace.dispute_window_days,
        "Loaded server configuration"
    );

    let pool = prepare_database(&config).await;

    let cancel = CancellationToken::new();
    let event_bus = Arc::new(EventBus::default());
    let tasks = spawn_background_tasks(&pool, &event_bus, &config, &cancel);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };
    let app = build_app_router(state, &config);

    let host = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "GigBook API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, stopping background tasks");
    cancel.cancel();
    for (name, handle) in tasks {
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await.is_err() {
            tracing::warn!(task = name, "Background task did not stop in time");
        }
    }
    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, probe and migrate. Any failure aborts startup.
async fn prepare_database(config: &ServerConfig) -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = gigbook_db::create_pool(&database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    gigbook_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    gigbook_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready, migrations applied"
    );
    pool
}

fn spawn_background_tasks(
    pool: &DbPool,
    event_bus: &Arc<EventBus>,
    config: &ServerConfig,
    cancel: &CancellationToken,
) -> Vec<(&'static str, JoinHandle<()>)> {
    let tasks = vec![
        (
            "dispute_auto_resolve",
            tokio::spawn(background::dispute_auto_resolve::run(
                pool.clone(),
                Arc::clone(event_bus),
                config.marketplace.dispute_check_interval,
                cancel.child_token(),
            )),
        ),
        (
            "session_cleanup",
            tokio::spawn(background::session_cleanup::run(
                pool.clone(),
                cancel.child_token(),
            )),
        ),
        (
            "activity_persistence",
            tokio::spawn(EventPersistence::run(
                pool.clone(),
                event_bus.subscribe(),
                cancel.child_token(),
            )),
        ),
    ];
    tracing::info!(count = tasks.len(), "Background tasks started");
    tasks
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT, shutting down"),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Received Ctrl-C, shutting down");
    }
}
