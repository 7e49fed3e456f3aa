use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    routes::MESSAGE_PATH,
    session::{session_stream, StreamEvent},
    AppState,
};

/// Payload of the bootstrap frame.
#[derive(Debug, Serialize)]
struct EndpointPayload {
    event: &'static str,
    data: String,
}

fn to_sse_event(event: StreamEvent) -> Result<Event, axum::Error> {
    match event {
        StreamEvent::Endpoint(address) => Event::default().json_data(EndpointPayload {
            event: "endpoint",
            data: address,
        }),
        StreamEvent::Response(text) => Ok(Event::default().data(text)),
    }
}

/// Open an event stream for a new session.
pub async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (_session_id, events) = session_stream(Arc::clone(&state.sessions), MESSAGE_PATH);

    let sse = Sse::new(events.map(to_sse_event));
    match state.env.keep_alive {
        Some(interval) => sse.keep_alive(KeepAlive::new().interval(interval)),
        None => sse,
    }
}
