//! The public → upstream routing table.
//!
//! # Responsibilities
//! - Declare every proxied endpoint: public path, upstream path, method
//! - Carry the per-route failure message used in the 500 envelope
//! - Say how each route treats request and response bodies
//!
//! # Design Decisions
//! - The table is static; nothing is configurable except the upstream base
//! - Public and upstream templates share parameter names, so captured path
//!   parameters flow straight into the upstream template
//! - Method is preserved between public and upstream sides

use axum::http::Method;
use url::Url;

use crate::routing::template::{PathTemplate, TemplateError};

/// Stable identifier for a proxied route, used in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Upload,
    PlantUpload,
    ListImages,
    Analyze,
    Timelapse,
    Share,
    Media,
}

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Upload => "upload",
            RouteName::PlantUpload => "plant_upload",
            RouteName::ListImages => "list_images",
            RouteName::Analyze => "analyze",
            RouteName::Timelapse => "timelapse",
            RouteName::Share => "share",
            RouteName::Media => "media",
        }
    }
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the inbound request body reaches the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// No body is sent.
    Empty,
    /// Body bytes are forwarded unchanged with the inbound content type.
    Passthrough,
    /// Multipart upload form or legacy JSON carrying `plantId`.
    UploadForm,
}

/// How a successful upstream reply is relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Always answered as `200` JSON.
    Json,
    /// Status, content type and bytes relayed as-is.
    Binary,
}

/// One row of the routing table.
#[derive(Debug)]
pub struct ProxyRoute {
    pub name: RouteName,
    pub method: Method,
    /// Axum path pattern on the public side.
    pub public_path: &'static str,
    /// Template appended to the upstream base URL.
    pub upstream_path: &'static str,
    pub body: BodyMode,
    pub reply: ReplyMode,
    /// Fixed `error` text of the failure envelope.
    pub error_message: &'static str,
}

impl ProxyRoute {
    /// Build the upstream URL for this route.
    pub fn upstream_url(&self, base: &Url, params: &[(&str, &str)]) -> Result<Url, TemplateError> {
        PathTemplate::parse(self.upstream_path).render(base, params)
    }
}

pub static UPLOAD: ProxyRoute = ProxyRoute {
    name: RouteName::Upload,
    method: Method::POST,
    public_path: "/api/upload",
    upstream_path: "/api/plants/{plant_id}/upload",
    body: BodyMode::UploadForm,
    reply: ReplyMode::Json,
    error_message: "Failed to upload image.",
};

pub static PLANT_UPLOAD: ProxyRoute = ProxyRoute {
    name: RouteName::PlantUpload,
    method: Method::POST,
    public_path: "/api/plants/{plant_id}/upload",
    upstream_path: "/api/plants/{plant_id}/upload",
    body: BodyMode::Passthrough,
    reply: ReplyMode::Json,
    error_message: "Failed to upload image.",
};

pub static LIST_IMAGES: ProxyRoute = ProxyRoute {
    name: RouteName::ListImages,
    method: Method::GET,
    public_path: "/api/plants/{plant_id}/images",
    upstream_path: "/api/plants/{plant_id}/images",
    body: BodyMode::Empty,
    reply: ReplyMode::Json,
    error_message: "Failed to load image list.",
};

pub static ANALYZE: ProxyRoute = ProxyRoute {
    name: RouteName::Analyze,
    method: Method::GET,
    public_path: "/api/analyze/{image_id}",
    upstream_path: "/api/analyze/{image_id}",
    body: BodyMode::Empty,
    reply: ReplyMode::Json,
    error_message: "Failed to analyze image.",
};

pub static TIMELAPSE: ProxyRoute = ProxyRoute {
    name: RouteName::Timelapse,
    method: Method::POST,
    public_path: "/api/timelapse",
    upstream_path: "/api/timelapse/create",
    body: BodyMode::Passthrough,
    reply: ReplyMode::Json,
    error_message: "Failed to create timelapse.",
};

pub static SHARE: ProxyRoute = ProxyRoute {
    name: RouteName::Share,
    method: Method::POST,
    public_path: "/api/share",
    upstream_path: "/api/share/sns",
    body: BodyMode::Passthrough,
    reply: ReplyMode::Json,
    error_message: "Failed to share to social media.",
};

pub static MEDIA: ProxyRoute = ProxyRoute {
    name: RouteName::Media,
    method: Method::GET,
    public_path: "/media/{filename}",
    upstream_path: "/static/{filename}",
    body: BodyMode::Empty,
    reply: ReplyMode::Binary,
    error_message: "Failed to fetch image file.",
};

/// Every proxied route, in registration order.
pub static ROUTES: [&ProxyRoute; 7] = [
    &UPLOAD,
    &PLANT_UPLOAD,
    &LIST_IMAGES,
    &ANALYZE,
    &TIMELAPSE,
    &SHARE,
    &MEDIA,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://upstream:8000").unwrap()
    }

    #[test]
    fn table_matches_upstream_contract() {
        let cases: [(&ProxyRoute, &[(&str, &str)], &str); 7] = [
            (&UPLOAD, &[("plant_id", "3")], "/api/plants/3/upload"),
            (&PLANT_UPLOAD, &[("plant_id", "3")], "/api/plants/3/upload"),
            (&LIST_IMAGES, &[("plant_id", "42")], "/api/plants/42/images"),
            (&ANALYZE, &[("image_id", "abc")], "/api/analyze/abc"),
            (&TIMELAPSE, &[], "/api/timelapse/create"),
            (&SHARE, &[], "/api/share/sns"),
            (&MEDIA, &[("filename", "leaf.png")], "/static/leaf.png"),
        ];
        for (route, params, expected) in cases {
            let url = route.upstream_url(&base(), params).unwrap();
            assert_eq!(url.path(), expected, "route {}", route.name);
        }
    }

    #[test]
    fn public_and_upstream_params_agree() {
        for route in ROUTES {
            let public: Vec<String> = PathTemplate::parse(route.public_path)
                .params()
                .map(str::to_string)
                .collect();
            let upstream: Vec<String> = PathTemplate::parse(route.upstream_path)
                .params()
                .map(str::to_string)
                .collect();
            if route.body == BodyMode::UploadForm {
                // plant id comes from the body, not the public path
                assert!(public.is_empty());
                assert_eq!(upstream, vec!["plant_id".to_string()]);
            } else {
                assert_eq!(public, upstream, "route {}", route.name);
            }
        }
    }

    #[test]
    fn route_names_are_unique() {
        let mut names: Vec<&str> = ROUTES.iter().map(|r| r.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ROUTES.len());
    }
}
