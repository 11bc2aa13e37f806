//! The gallery's view of the plant tracker API.
//!
//! [`GalleryApi`] is the seam the dispatcher runs requests through.
//! [`HttpGalleryApi`] talks to the front-end proxy over HTTP; tests swap in
//! an in-memory implementation.

use std::future::Future;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::error::error_detail;
use crate::gallery::model::{
    AnalysisResponse, ImageId, ImageList, PlantId, SharePlatform, ShareReceipt, ShareRequest,
    TimelapseReceipt, TimelapseRequest, TimelapseWindow, UploadFile, UploadReceipt,
};

const DETAIL_KEYS: &[&str] = &["detail", "details", "error"];

/// A failed API call, as the gallery sees it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server answered {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Server-provided explanation, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text for an alert: the server's explanation or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Operations the gallery needs from the backend.
pub trait GalleryApi {
    fn list_images(
        &self,
        plant_id: PlantId,
    ) -> impl Future<Output = Result<ImageList, ClientError>> + Send;

    fn upload(
        &self,
        plant_id: PlantId,
        file: UploadFile,
        notes: Option<String>,
    ) -> impl Future<Output = Result<UploadReceipt, ClientError>> + Send;

    fn analyze(
        &self,
        image_id: &ImageId,
    ) -> impl Future<Output = Result<AnalysisResponse, ClientError>> + Send;

    fn share(
        &self,
        image_id: &ImageId,
        platform: SharePlatform,
    ) -> impl Future<Output = Result<ShareReceipt, ClientError>> + Send;

    fn create_timelapse(
        &self,
        plant_id: PlantId,
        window: TimelapseWindow,
    ) -> impl Future<Output = Result<TimelapseReceipt, ClientError>> + Send;
}

/// [`GalleryApi`] over HTTP, through the front-end proxy.
#[derive(Debug, Clone)]
pub struct HttpGalleryApi {
    base: Url,
    http: reqwest::Client,
}

impl HttpGalleryApi {
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base)?;
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Transport(format!("{} cannot be a base url", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl GalleryApi for HttpGalleryApi {
    async fn list_images(&self, plant_id: PlantId) -> Result<ImageList, ClientError> {
        let plant = plant_id.to_string();
        let url = self.endpoint(&["api", "plants", &plant, "images"])?;
        decode(self.http.get(url).send().await?).await
    }

    async fn upload(
        &self,
        plant_id: PlantId,
        file: UploadFile,
        notes: Option<String>,
    ) -> Result<UploadReceipt, ClientError> {
        let plant = plant_id.to_string();
        let url = self.endpoint(&["api", "plants", &plant, "upload"])?;

        let mut part = Part::bytes(file.bytes).file_name(file.filename);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| ClientError::Transport(e.to_string()))?;
        }
        let mut form = Form::new().part("file", part);
        if let Some(notes) = notes {
            form = form.text("notes", notes);
        }

        decode(self.http.post(url).multipart(form).send().await?).await
    }

    async fn analyze(&self, image_id: &ImageId) -> Result<AnalysisResponse, ClientError> {
        let url = self.endpoint(&["api", "analyze", image_id.as_str()])?;
        decode(self.http.get(url).send().await?).await
    }

    async fn share(
        &self,
        image_id: &ImageId,
        platform: SharePlatform,
    ) -> Result<ShareReceipt, ClientError> {
        let url = self.endpoint(&["api", "share"])?;
        let body = ShareRequest {
            image_id: image_id.clone(),
            platform,
        };
        decode(self.http.post(url).json(&body).send().await?).await
    }

    async fn create_timelapse(
        &self,
        plant_id: PlantId,
        window: TimelapseWindow,
    ) -> Result<TimelapseReceipt, ClientError> {
        let url = self.endpoint(&["api", "timelapse"])?;
        let body = TimelapseRequest {
            plant_id: plant_id.to_string(),
            window,
        };
        decode(self.http.post(url).json(&body).send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            detail: error_detail(&body, DETAIL_KEYS),
        });
    }
    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
