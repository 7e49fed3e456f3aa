// This file declares the bridge routes and the paths they are mounted on

use crate::{
    handlers::{health_handler, index_handler, message_handler, sse_handler},
    AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

pub const SSE_PATH: &str = "/sse";
pub const MESSAGE_PATH: &str = "/message";
pub const HEALTH_PATH: &str = "/health";

pub fn bridge_router() -> Router<AppState> {
    Router::new()
        // Event stream and the dispatch endpoint it advertises
        .route(SSE_PATH, get(sse_handler))
        .route(MESSAGE_PATH, post(message_handler))
        .route("/", get(index_handler))
        .route(HEALTH_PATH, get(health_handler))
}
