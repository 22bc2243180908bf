// API server for the user directory
// REST surface over the authorization core, with OpenAPI documentation

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, Result};
pub use routes::create_router;
pub use server::{Server, ServerConfig};
pub use state::AppState;
