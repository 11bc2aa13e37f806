//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file named by PLANT_TRACKER_CONFIG (loader.rs)
//!     → PORT / API_BASE_URL overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → WebConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so an empty environment still boots
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError};
pub use schema::{
    LogFormat, ObservabilityConfig, ServerConfig, TimeoutConfig, UpstreamConfig, WebConfig,
};
