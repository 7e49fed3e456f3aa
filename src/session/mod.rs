//! Session lifecycle: registration, the per-session push stream and
//! delivery of posted requests into it.

pub mod dispatch;
pub mod registry;
pub mod stream;

pub use dispatch::dispatch;
pub use registry::{SessionGuard, SessionHandle, SessionId, SessionRegistry, SESSION_CHANNEL_CAPACITY};
pub use stream::{endpoint_address, session_stream, StreamEvent, StreamState};
