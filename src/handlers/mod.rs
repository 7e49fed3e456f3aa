// This file declares the handler modules and re-exports their contents
// This allows other parts of the code to use `use crate::handlers::sse_handler`
// instead of `use crate::handlers::sse::sse_handler`

pub mod message;
pub mod pages;
pub mod sse;

pub use message::*;
pub use pages::*;
pub use sse::*;
