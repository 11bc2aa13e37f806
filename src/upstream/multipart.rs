//! Upload form relay.
//!
//! `POST /api/upload` carries the plant id inside the body, so the form has to
//! be read before the upstream URL is known. The file part is then re-posted
//! as a fresh multipart form to `/api/plants/{plant_id}/upload`.

use axum::body::Bytes;
use axum::extract::Multipart;
use reqwest::multipart::{Form, Part};

use crate::error::UpstreamError;

/// The file part of an upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A parsed upload form.
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub plant_id: String,
    pub file: FilePart,
    pub notes: Option<String>,
}

impl UploadForm {
    /// Read `plantId`, `file` and optional `notes` from an inbound form.
    ///
    /// `plant_id` and `image` are accepted as aliases. Unknown fields are
    /// skipped.
    pub async fn read(mut multipart: Multipart) -> Result<Self, UpstreamError> {
        let mut plant_id = None;
        let mut file = None;
        let mut notes = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| UpstreamError::Form(e.body_text()))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("plantId") | Some("plant_id") => {
                    let text = field.text().await.map_err(|e| UpstreamError::Form(e.body_text()))?;
                    plant_id = Some(text.trim().to_string());
                }
                Some("file") | Some("image") => {
                    let filename = field.file_name().unwrap_or("upload").to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| UpstreamError::Form(e.body_text()))?;
                    file = Some(FilePart {
                        filename,
                        content_type,
                        bytes,
                    });
                }
                Some("notes") => {
                    let text = field.text().await.map_err(|e| UpstreamError::Form(e.body_text()))?;
                    notes = Some(text);
                }
                other => {
                    tracing::debug!(field = ?other, "Skipping unknown upload field");
                }
            }
        }

        let plant_id = plant_id
            .filter(|id| !id.is_empty())
            .ok_or(UpstreamError::MissingField("plantId"))?;
        let file = file.ok_or(UpstreamError::MissingField("file"))?;

        Ok(Self {
            plant_id,
            file,
            notes,
        })
    }

    /// The outbound form: `file` plus `notes` when given.
    pub fn into_form(self) -> Result<Form, UpstreamError> {
        let mut part = Part::bytes(self.file.bytes.to_vec()).file_name(self.file.filename);
        if let Some(content_type) = &self.file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| UpstreamError::Form(e.to_string()))?;
        }

        let mut form = Form::new().part("file", part);
        if let Some(notes) = self.notes {
            form = form.text("notes", notes);
        }
        Ok(form)
    }
}

/// Plant id from a legacy JSON upload body (`{"plantId": 3, ...}`).
pub fn plant_id_from_json(body: &[u8]) -> Result<String, UpstreamError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| UpstreamError::Form(e.to_string()))?;
    let id = match value.get("plantId").or_else(|| value.get("plant_id")) {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Err(UpstreamError::MissingField("plantId")),
    };
    Ok(id)
}
