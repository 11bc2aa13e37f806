//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, static fallback)
//!     → request.rs (request id)
//!     → handlers.rs (routing table row → one upstream call)
//!     → response.rs (JSON / binary relay, error envelope, 404)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::{ErrorEnvelope, NOT_FOUND_MESSAGE};
pub use server::{AppState, HttpServer};
