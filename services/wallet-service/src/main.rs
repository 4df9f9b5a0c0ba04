mod config;
mod wallet;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    routing::{get, post},
};
use anyhow::Context;
use mv_api_types::WalletStatusResponse;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServiceConfig;

#[derive(Debug, Serialize)]
struct HealthResponse {
    service: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<WalletStatusResponse>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::from_env()?;
    let app = app(&config)?;

    info!("wallet-service listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(config: &ServiceConfig) -> anyhow::Result<Router> {
    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS origin: {origin}"))?,
            )
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    };

    Ok(Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/update_wallet", post(wallet::update_wallet))
        .route("/verify_wallet", post(wallet::verify_wallet))
        .layer(cors))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("wallet-service shutting down");
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "wallet-service",
        status: "ok",
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "wallet-service",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn bad_request(message: &str) -> (StatusCode, Json<WalletStatusResponse>) {
    (StatusCode::BAD_REQUEST, Json(WalletStatusResponse::error(message)))
}
