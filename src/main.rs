mod auth;
mod client;
mod config;
mod error;
mod handlers;
mod models;
mod persona;
mod relay;

use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use client::{CompletionService, OpenAiClient};
use config::Config;

// config is immutable after startup; the completion client is shared so
// every request reuses the same reqwest connection pool
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub completions: Arc<dyn CompletionService>
}

pub fn app(state: AppState) -> Router {

    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/api/chat", post(handlers::chat_handler))
        .route("/api/usage", get(handlers::usage_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(cors)
        .with_state(state)

}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {

    // Config already refuses these; a wildcard here would make tower-http panic
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            let parsed = config::is_valid_origin(origin)
                .then(|| origin.parse::<HeaderValue>().ok())
                .flatten();
            if parsed.is_none() {
                warn!(origin = %origin, "skipping invalid cors origin");
            }
            parsed
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(auth::API_KEY_HEADER),
            header::ORIGIN
        ])
        .allow_credentials(true)

}

#[tokio::main]
async fn main() {

    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()
        .unwrap_or_else(|e| {
            tracing::error!("invalid configuration: {}", e);
            std::process::exit(1);
        });

    let completions = OpenAiClient::new(
        reqwest::Client::new(),
        config.openai_api_key.clone(),
        config.openai_base_url.clone()
    );

    info!(origins = ?config.allowed_origins, "allowed cors origins");

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        completions: Arc::new(completions)
    };

    let app = app(state);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let listener = TcpListener::bind(addr).await
        .unwrap_or_else(|e| panic!("Failed to bind to port {}: {}", port, e));
    info!("listening on {}", listener.local_addr()
        .expect("Failed to get local address"));
    axum::serve(listener, app).await
        .expect("Server failed");

}
