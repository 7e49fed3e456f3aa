// This file declares all model modules and re-exports their contents
// This allows other parts of the code to use `use crate::models::ClientRequest`
// instead of `use crate::models::request::ClientRequest`

pub mod request;

pub use request::*;
