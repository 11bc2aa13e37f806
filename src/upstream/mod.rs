//! Upstream API access.
//!
//! # Data Flow
//! ```text
//! handler
//!     → client.rs (resolve url, send, buffer, classify status)
//!     → multipart.rs (read inbound upload form, rebuild outbound form)
//!     → UpstreamReply | UpstreamError
//! ```

pub mod client;
pub mod multipart;

pub use client::UpstreamClient;
pub use multipart::{plant_id_from_json, FilePart, UploadForm};
