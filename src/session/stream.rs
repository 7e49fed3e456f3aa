use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::registry::{SessionGuard, SessionId, SessionRegistry};
use crate::models::ClientRequest;

/// One item of a session's push sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Bootstrap event: where the peer must post its requests.
    Endpoint(String),
    /// Response derived from one delivered request.
    Response(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Starting,
    Streaming,
    Closed,
}

struct SessionRelay {
    state: StreamState,
    endpoint: String,
    requests: mpsc::Receiver<ClientRequest>,
    guard: Option<SessionGuard>,
}

impl SessionRelay {
    async fn step(mut self) -> Option<(StreamEvent, Self)> {
        match self.state {
            StreamState::Starting => {
                self.state = StreamState::Streaming;
                let endpoint = std::mem::take(&mut self.endpoint);
                Some((StreamEvent::Endpoint(endpoint), self))
            }
            StreamState::Streaming => match self.requests.recv().await {
                Some(request) => {
                    debug!(
                        "Relaying {} request {} to session {}",
                        request.method(),
                        request.request_id(),
                        self.session_label()
                    );
                    Some((StreamEvent::Response(request.response()), self))
                }
                None => {
                    self.close();
                    None
                }
            },
            StreamState::Closed => None,
        }
    }

    fn close(&mut self) {
        self.state = StreamState::Closed;
        // Dropping the guard deregisters the session
        self.guard.take();
    }

    fn session_label(&self) -> String {
        self.guard
            .as_ref()
            .map(|guard| guard.id().to_string())
            .unwrap_or_default()
    }
}

/// Address the peer posts its requests to.
pub fn endpoint_address(dispatch_path: &str, id: &SessionId) -> String {
    format!("{}?sessionid={}", dispatch_path, id)
}

/// Open a session and return its push sequence.
///
/// The first item is always [`StreamEvent::Endpoint`]; after that one
/// [`StreamEvent::Response`] is produced per delivered request, in delivery
/// order. The session is deregistered when the sequence ends or is dropped,
/// whichever happens first.
pub fn session_stream(
    registry: Arc<SessionRegistry>,
    dispatch_path: &str,
) -> (SessionId, impl Stream<Item = StreamEvent> + Send + 'static) {
    let handle = registry.open_session();
    let id = handle.id;
    info!("📡 Session opened: {}", id);

    let relay = SessionRelay {
        state: StreamState::Starting,
        endpoint: endpoint_address(dispatch_path, &id),
        requests: handle.receiver,
        guard: Some(handle.guard),
    };

    (id, stream::unfold(relay, SessionRelay::step))
}
