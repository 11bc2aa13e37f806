//! Plant Growth Tracker web front end.
//!
//! Serves the tracker's static page and relays its API calls to the backend
//! service, plus the gallery client logic that drives the page.

// Proxy
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod upstream;

// Client
pub mod carousel;
pub mod gallery;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::WebConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
