use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    error::{AppError, Result},
    session::dispatch,
    AppState,
};

/// Raw query pairs; a repeated `sessionid` resolves to its last value.
#[derive(Debug, Default)]
pub struct MessageQuery {
    pub sessionid: Option<String>,
}

impl MessageQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let sessionid = pairs
            .into_iter()
            .filter(|(key, _)| key == "sessionid")
            .map(|(_, value)| value)
            .last();
        Self { sessionid }
    }
}

/// Accept one request for an open session and queue it for its stream.
pub async fn message_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Result<Json<Value>> {
    let Query(pairs) =
        query.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;
    let query = MessageQuery::from_pairs(pairs);

    let method = dispatch(&state.sessions, query.sessionid.as_deref(), &body).await?;

    info!(
        "📨 Delivered {} request to session {}",
        method,
        query.sessionid.as_deref().unwrap_or_default()
    );

    Ok(Json(json!({ "status": "ok" })))
}
