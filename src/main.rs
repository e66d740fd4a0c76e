use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cache;
mod config;
mod db;
mod matching;
mod metrics;
mod models;
mod mq;
mod services;
mod store;

use crate::cache::{BoardCache, MemoryCache, RedisCache};
use crate::config::AppConfig;
use crate::db::Database;
use crate::mq::NotificationQueue;
use crate::services::OrderService;
use crate::store::{OrderRepository, PgOrderStore};

pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub service: Arc<OrderService>,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orderboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    tracing::info!("Starting orderboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);

    // Initialize Prometheus metrics
    let metrics_handle = metrics::init_metrics()?;
    tracing::info!("Prometheus metrics initialized");

    // Initialize database
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");
    let repo: Arc<dyn OrderRepository> =
        Arc::new(PgOrderStore::new(db.pool.clone(), config.take_timeout()));

    // Initialize board cache: Redis when configured, in-process for local
    // development
    let board_cache: Arc<dyn BoardCache> = match &config.redis_url {
        Some(url) => {
            let cache = RedisCache::connect(url).await?;
            tracing::info!("Board cache initialized with Redis at {}", url);
            Arc::new(cache)
        }
        None if config.is_production() => {
            anyhow::bail!("REDIS_URL is required when ENVIRONMENT=production");
        }
        None => {
            tracing::warn!("REDIS_URL not set, board cache running in-process");
            Arc::new(MemoryCache::new())
        }
    };

    // Start the notification worker
    let notifications = NotificationQueue::new(config.notification_queue_size).start_worker();
    tracing::info!("Notification worker started");

    // Build the order book service
    let service = Arc::new(OrderService::new(
        repo,
        board_cache,
        notifications,
        config.default_price,
        config.board_cache_ttl(),
    ));
    tracing::info!(
        "Order book service initialized (default price: {})",
        config.default_price
    );

    // Build application state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        service,
        metrics_handle,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(api::handlers::probes::health))
        .route("/ready", get(api::handlers::probes::ready))
        .route("/system/version", get(api::handlers::probes::version))
        .route("/metrics", get(api::handlers::probes::metrics))
        .nest("/api/v1", api::routes::create_router())
        .layer(middleware::from_fn(api::middleware::request_context))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
