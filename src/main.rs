use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use virtual_tryon::app_state::AppState;
use virtual_tryon::config::AppConfig;
use virtual_tryon::routes;
use virtual_tryon::services::runway::build_http_client;
use virtual_tryon::services::tryon::TryOnOrchestrator;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing virtual-tryon server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    metrics::describe_counter!("tryon_requests_total", "Total try-on requests received");
    metrics::describe_counter!(
        "tryon_requests_failed",
        "Try-on requests that failed, labelled by pipeline stage"
    );
    metrics::describe_counter!(
        "tryon_poll_attempts_total",
        "Runway task status checks issued"
    );
    metrics::describe_histogram!(
        "tryon_generation_seconds",
        "Time from request to generated image"
    );

    if config.runway_api_key.is_none() {
        tracing::warn!("RUNWAY_API_KEY not set; requests must supply their own api_key");
    }

    tracing::info!(
        api_base = %config.runway_api_base,
        garment_model = %config.garment_model,
        jewelry_model = %config.jewelry_model,
        "Initializing Runway client"
    );
    let http = build_http_client(&config).expect("Failed to build HTTP client");
    let orchestrator = TryOnOrchestrator::new(http, &config);

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, orchestrator);

    let app = Router::new()
        .merge(routes::api_router(state))
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(routes::MAX_BODY_BYTES));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
