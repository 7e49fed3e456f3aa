//! sse-bridge - a minimal server-push bridge
//!
//! A client opens a long-lived Server-Sent Events stream and receives the
//! address to post its requests to. Each posted request is decoded into one of
//! a closed set of variants and relayed to the stream that owns the session.

use axum::{
    http::{
        header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use session::SessionRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub env: Arc<Config>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            env: Arc::new(config),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}

/// Build the application router with its middleware layers.
pub fn create_app(state: AppState) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, CACHE_CONTROL, CONTENT_TYPE]);

    let cors = match state.env.client_origin.as_deref() {
        Some(origin) => cors.allow_origin(origin.parse::<HeaderValue>().map_err(|_| {
            AppError::ConfigError(format!("CLIENT_ORIGIN is not a valid origin: {}", origin))
        })?),
        None => cors.allow_origin(Any),
    };

    Ok(routes::bridge_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
