//! Wire types exchanged with the plant tracker API.

use serde::{Deserialize, Deserializer, Serialize};

/// Plant identifier. Supplied by the user; never validated here.
pub type PlantId = u64;

/// Opaque image identifier generated by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Older backends hand out integer ids.
impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ImageId(s),
            Raw::Number(n) => ImageId(n.to_string()),
        })
    }
}

/// One stored plant image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub filename: String,
    /// Upload timestamp as sent by the upstream; only ever displayed.
    #[serde(default, alias = "created_at")]
    pub uploaded_at: Option<String>,
}

/// Reply of `GET /api/plants/{id}/images`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageList {
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Analysis fields the gallery renders. Anything may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub health_score: Option<f64>,
    #[serde(default)]
    pub growth_stage: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Analysis {
    /// `health`, or the numeric `health_score` when only that is present.
    pub fn health_text(&self) -> Option<String> {
        self.health
            .clone()
            .or_else(|| self.health_score.map(|score| format!("{score}")))
    }
}

/// Reply of `GET /api/analyze/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

/// Social platform a share goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    #[default]
    Instagram,
}

/// Body of `POST /api/share`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareRequest {
    pub image_id: ImageId,
    pub platform: SharePlatform,
}

/// Reply of a successful share.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShareReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Reply of a successful upload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub image_id: Option<ImageId>,
}

/// Date bounds for a timelapse. The upstream compares them as strings
/// against each image's upload timestamp, so ISO-8601 dates work.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimelapseWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Body of `POST /api/timelapse`. The upstream expects the id as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelapseRequest {
    pub plant_id: String,
    #[serde(flatten)]
    pub window: TimelapseWindow,
}

/// Reply of a successful timelapse request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelapseReceipt {
    #[serde(default)]
    pub timelapse_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_accepts_created_at_and_numeric_ids() {
        let list: ImageList = serde_json::from_str(
            r#"{"success": true, "images": [
                {"id": "a1", "filename": "a.png", "created_at": "2024-05-01T10:00:00"},
                {"id": 7, "filename": "b.png", "uploaded_at": "2024-05-02T10:00:00", "analysis": {}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.images[0].id, ImageId::new("a1"));
        assert_eq!(list.images[0].uploaded_at.as_deref(), Some("2024-05-01T10:00:00"));
        assert_eq!(list.images[1].id, ImageId::new("7"));
    }

    #[test]
    fn missing_image_list_is_empty() {
        let list: ImageList = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(list.images.is_empty());
    }

    #[test]
    fn health_score_backs_up_health() {
        let resp: AnalysisResponse = serde_json::from_str(
            r#"{"analysis": {"health_score": 85, "growth_stage": "vegetative"}}"#,
        )
        .unwrap();
        let analysis = resp.analysis.unwrap();
        assert_eq!(analysis.health_text().as_deref(), Some("85"));
        assert_eq!(analysis.notes, None);
    }

    #[test]
    fn share_request_wire_format() {
        let body = serde_json::to_value(ShareRequest {
            image_id: ImageId::new("img-1"),
            platform: SharePlatform::Instagram,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"image_id": "img-1", "platform": "instagram"}));
    }

    #[test]
    fn timelapse_request_omits_open_bounds() {
        let whole = serde_json::to_value(TimelapseRequest {
            plant_id: "4".into(),
            window: TimelapseWindow::default(),
        })
        .unwrap();
        assert_eq!(whole, serde_json::json!({"plant_id": "4"}));

        let bounded = serde_json::to_value(TimelapseRequest {
            plant_id: "4".into(),
            window: TimelapseWindow {
                start_date: Some("2024-05-01".into()),
                end_date: None,
            },
        })
        .unwrap();
        assert_eq!(bounded, serde_json::json!({"plant_id": "4", "start_date": "2024-05-01"}));
    }
}
