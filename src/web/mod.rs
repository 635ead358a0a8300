//! Web API module for Filebox.
//!
//! This module exposes the file workflow over HTTP under `/api/files`.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
