//! HTTP client for the plant tracker API.
//!
//! # Responsibilities
//! - Resolve route templates against the configured base URL
//! - Send one request per call, streaming the request body through
//! - Buffer the reply and classify non-2xx statuses as failures
//!
//! # Design Decisions
//! - Single shot: no retries, no backoff, no circuit breaking
//! - Timeouts only when configured; otherwise the network stack decides
//! - Multipart uploads go through reqwest, which assembles the form

use std::future::Future;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::config::WebConfig;
use crate::error::{error_detail, UpstreamError};
use crate::http::response::UpstreamReply;
use crate::routing::ProxyRoute;

/// Shared client for every proxied route.
#[derive(Clone)]
pub struct UpstreamClient {
    base: Url,
    http: Client<HttpConnector, Body>,
    forms: reqwest::Client,
    timeout: Option<Duration>,
    max_body_size: usize,
}

impl UpstreamClient {
    /// Build a client from validated configuration.
    pub fn new(config: &WebConfig) -> Result<Self, UpstreamError> {
        let base = Url::parse(&config.upstream.base_url)
            .map_err(|e| UpstreamError::Transport(format!("invalid base url: {e}")))?;
        let connect_timeout = config.timeouts.connect_secs.map(Duration::from_secs);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(connect_timeout);
        let http = Client::builder(TokioExecutor::new()).build(connector);

        let mut forms = reqwest::Client::builder().no_proxy();
        if let Some(timeout) = connect_timeout {
            forms = forms.connect_timeout(timeout);
        }

        Ok(Self {
            base,
            http,
            forms: forms.build()?,
            timeout: config.timeouts.upstream_secs.map(Duration::from_secs),
            max_body_size: config.server.max_body_size,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Upstream URL for `route` with the given path parameters.
    pub fn url_for(&self, route: &ProxyRoute, params: &[(&str, &str)]) -> Result<Url, UpstreamError> {
        Ok(route.upstream_url(&self.base, params)?)
    }

    /// Send a request and buffer the reply. Non-2xx replies are errors.
    pub async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Body,
        content_type: Option<HeaderValue>,
    ) -> Result<UpstreamReply, UpstreamError> {
        let mut builder = Request::builder().method(method).uri(url.as_str());
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(body)?;

        let response = self.with_timeout(self.http.request(request)).await??;
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.max_body_size)
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?;

        classify(UpstreamReply {
            status: parts.status,
            content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
            body,
        })
    }

    /// Post a multipart form and buffer the reply. Non-2xx replies are errors.
    pub async fn send_form(
        &self,
        url: &Url,
        form: reqwest::multipart::Form,
    ) -> Result<UpstreamReply, UpstreamError> {
        let request = self.forms.post(url.clone()).multipart(form);
        let response = self.with_timeout(request.send()).await??;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        if body.len() > self.max_body_size {
            return Err(UpstreamError::Body(format!(
                "reply of {} bytes exceeds the {} byte limit",
                body.len(),
                self.max_body_size
            )));
        }

        classify(UpstreamReply {
            status,
            content_type,
            body,
        })
    }

    async fn with_timeout<F: Future>(&self, fut: F) -> Result<F::Output, UpstreamError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| UpstreamError::Timeout(limit)),
            None => Ok(fut.await),
        }
    }
}

fn classify(reply: UpstreamReply) -> Result<UpstreamReply, UpstreamError> {
    if reply.status.is_success() {
        Ok(reply)
    } else {
        Err(UpstreamError::Status {
            status: reply.status,
            detail: error_detail(&reply.body, &["detail"]),
        })
    }
}
