//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router from the routing table
//! - Serve static assets after all API routes, `GET /` from the index file
//! - Wire up middleware (request id, tracing, body limit)
//! - Run until the shutdown signal fires

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, get_service, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::WebConfig;
use crate::error::UpstreamError;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::not_found;
use crate::observability::spans::http_trace_layer;
use crate::routing::router::{ANALYZE, LIST_IMAGES, MEDIA, PLANT_UPLOAD, SHARE, TIMELAPSE, UPLOAD};
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub max_body_size: usize,
}

/// HTTP server for the plant tracker front end.
pub struct HttpServer {
    router: Router,
    config: WebConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: WebConfig) -> Result<Self, UpstreamError> {
        let state = AppState {
            upstream: Arc::new(UpstreamClient::new(&config)?),
            max_body_size: config.server.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Wrong-method requests on API paths fall through to the same 404 as
    /// unknown paths.
    fn build_router(config: &WebConfig, state: AppState) -> Router {
        let static_dir = PathBuf::from(&config.server.static_dir);
        let index = static_dir.join(&config.server.index_file);

        let assets = ServeDir::new(&static_dir)
            .append_index_html_on_directories(false)
            .call_fallback_on_method_not_allowed(true)
            .not_found_service(not_found.into_service());

        Router::new()
            .route(UPLOAD.public_path, post(handlers::upload).fallback(not_found))
            .route(PLANT_UPLOAD.public_path, post(handlers::plant_upload).fallback(not_found))
            .route(LIST_IMAGES.public_path, get(handlers::list_images).fallback(not_found))
            .route(ANALYZE.public_path, get(handlers::analyze).fallback(not_found))
            .route(TIMELAPSE.public_path, post(handlers::timelapse).fallback(not_found))
            .route(SHARE.public_path, post(handlers::share).fallback(not_found))
            .route(MEDIA.public_path, get(handlers::media).fallback(not_found))
            .route("/", get_service(ServeFile::new(index)).fallback(not_found))
            .fallback_service(assets)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.server.max_body_size))
            .layer(http_trace_layer())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            static_dir = %self.config.server.static_dir,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
