use axum::{extract::State, response::Html, response::Json};
use serde_json::{json, Value};
use std::io::ErrorKind;

use crate::{
    error::{AppError, Result},
    AppState,
};

/// Serve the configured static page.
pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>> {
    match tokio::fs::read_to_string(&state.env.index_path).await {
        Ok(content) => Ok(Html(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(AppError::NotFound("index page not found".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "active_sessions": state.sessions.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
