//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path)
//!     → axum path match (registered from router.rs table)
//!     → captured path parameters
//!     → template.rs renders the upstream path onto the base URL
//!     → Return: upstream Url or TemplateError
//! ```
//!
//! # Design Decisions
//! - Routes are static, immutable at runtime
//! - Deterministic: same input always maps to the same upstream URL
//! - Anything the table does not name falls through to static assets, then 404

pub mod router;
pub mod template;

pub use router::{BodyMode, ProxyRoute, ReplyMode, RouteName, ROUTES};
pub use template::{PathTemplate, TemplateError};
