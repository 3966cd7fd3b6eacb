//! HTTP host for product advisor sessions

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use routes::router;
pub use state::{AppState, SessionHandle, SessionMode};
