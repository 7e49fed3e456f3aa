use tracing::{debug, warn};

use super::registry::{SessionId, SessionRegistry};
use crate::{
    error::{AppError, Result},
    models::{decode, RequestMethod},
};

/// Validate, decode and enqueue one posted request for its session.
///
/// Suspends while the session's single slot is still occupied, so concurrent
/// dispatches to one session are delivered one at a time in enqueue order.
pub async fn dispatch(
    registry: &SessionRegistry,
    session_id: Option<&str>,
    body: &[u8],
) -> Result<RequestMethod> {
    let raw_id = session_id
        .ok_or_else(|| AppError::ValidationError("sessionid is required".to_string()))?;

    if body.is_empty() {
        return Err(AppError::ValidationError("data is required".to_string()));
    }

    // Ids that do not even parse cannot name a live session
    let sender = raw_id
        .parse::<SessionId>()
        .ok()
        .and_then(|id| registry.lookup(&id))
        .ok_or_else(|| AppError::NotFound("sessionid not found".to_string()))?;

    let request = decode(body).map_err(|err| {
        warn!("⚠️  Rejected request for session {}: {}", raw_id, err);
        AppError::from(err)
    })?;
    let method = request.method();

    debug!(
        "Enqueueing {} request {} for session {}",
        method,
        request.request_id(),
        raw_id
    );

    sender.send(request).await.map_err(|_| {
        AppError::DeliveryError(format!("session {} is no longer receiving", raw_id))
    })?;

    Ok(method)
}
