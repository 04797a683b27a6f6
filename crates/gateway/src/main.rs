//! PaperNest API Gateway
//!
//! The main entry point for all external API requests.
//! Handles:
//! - Paper listing, search and detail
//! - Library and tag curation
//! - Manual and scheduled arXiv ingestion
//! - Rate limiting
//! - Observability (logging, metrics)

mod handlers;
mod middleware;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use papernest_common::{
    config::{AppConfig, ObservabilityConfig},
    db::DbPool,
    metrics::{self, FETCH_BUCKETS, LATENCY_BUCKETS, METRICS_PREFIX},
    Repository,
};
use papernest_ingestion::{Pipeline, Schedule, Scheduler};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use middleware::rate_limit::{rate_limit_middleware, RateLimitState};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub pipeline: Arc<Pipeline>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    let config = Arc::new(config);

    // Initialize tracing
    init_tracing(&config.observability);

    info!("Starting PaperNest API Gateway v{}", papernest_common::VERSION);

    // Initialize metrics
    init_metrics(&config.observability)?;
    metrics::register_metrics();

    // Initialize database connection
    let db = DbPool::connect_and_migrate(&config.database).await?;

    let store = Arc::new(Repository::new(db.clone()));
    let pipeline = Arc::new(Pipeline::from_config(&config.arxiv, store)?);

    let scheduler = if config.arxiv.schedule_enabled {
        Some(Scheduler::start(pipeline.clone(), Schedule::from_config(&config.arxiv)))
    } else {
        info!("Scheduled ingestion disabled");
        None
    };

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        pipeline,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        if tokio::time::timeout(config.shutdown_timeout(), scheduler.stop())
            .await
            .is_err()
        {
            warn!("Scheduler did not stop within the shutdown timeout");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Install the Prometheus exporter; port 0 disables it
fn init_metrics(config: &ObservabilityConfig) -> anyhow::Result<()> {
    if config.metrics_port == 0 {
        return Ok(());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_request_duration_seconds", METRICS_PREFIX)),
            LATENCY_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_fetch_duration_seconds", METRICS_PREFIX)),
            FETCH_BUCKETS,
        )?
        .install()?;

    info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Paper endpoints
        .route("/papers", get(handlers::papers::list_papers))
        .route("/papers/{id}", get(handlers::papers::get_paper))
        .route("/papers/{id}/tags", post(handlers::tags::add_tag))
        .route("/papers/{id}/tags/{tag_id}", delete(handlers::tags::remove_tag))

        // Library endpoints
        .route("/library", get(handlers::library::list_library))
        .route(
            "/library/{id}",
            post(handlers::library::save_paper).delete(handlers::library::remove_paper),
        )
        .route("/library/{id}/read", post(handlers::library::toggle_read))

        // Tags and stats
        .route("/tags", get(handlers::tags::list_tags))
        .route("/stats", get(handlers::papers::stats))

        // Ingestion
        .route("/admin/refresh", post(handlers::admin::refresh))
        .route_layer(from_fn(middleware::metrics::track_metrics));

    let mut app = Router::new().nest("/v1", api_routes);

    if state.config.rate_limit.enabled {
        let limiter = RateLimitState::new(
            state.config.rate_limit.requests_per_second,
            state.config.rate_limit.burst,
        );
        app = app.layer(from_fn_with_state(limiter, rate_limit_middleware));
    }

    // Compose the app
    app.layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
