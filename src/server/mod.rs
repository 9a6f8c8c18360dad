//! HTTP front end for post generation.

mod handlers;
mod models;
mod state;

pub use handlers::{router, serve};
pub use models::{BatchRequest, ErrorResponse, PostRequest};
pub use state::AppState;
