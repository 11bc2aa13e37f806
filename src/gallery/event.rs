//! Inputs and outputs of the gallery state machine.

use crate::gallery::api::ClientError;
use crate::gallery::model::{
    AnalysisResponse, ImageId, ImageList, PlantId, SharePlatform, ShareReceipt, TimelapseReceipt,
    TimelapseWindow, UploadFile, UploadReceipt,
};
use crate::gallery::state::{AnalysisView, Card};

/// Something the user did, or a request that finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Page load or the refresh button.
    Refresh,
    GalleryLoaded(Result<ImageList, ClientError>),
    UploadSubmitted {
        plant_id: PlantId,
        file: Option<UploadFile>,
        notes: Option<String>,
    },
    UploadFinished(Result<UploadReceipt, ClientError>),
    ImageClicked {
        image_id: ImageId,
        filename: String,
    },
    AnalyzeClicked,
    AnalysisLoaded(Result<AnalysisResponse, ClientError>),
    ShareClicked,
    ShareFinished(Result<ShareReceipt, ClientError>),
    TimelapseClicked(TimelapseWindow),
    TimelapseFinished(Result<TimelapseReceipt, ClientError>),
}

/// A network call the controller wants made.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    ListImages {
        plant_id: PlantId,
    },
    Upload {
        plant_id: PlantId,
        file: UploadFile,
        notes: Option<String>,
    },
    Analyze {
        image_id: ImageId,
    },
    Share {
        image_id: ImageId,
        platform: SharePlatform,
    },
    CreateTimelapse {
        plant_id: PlantId,
        window: TimelapseWindow,
    },
}

impl ApiRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::ListImages { .. } => "list_images",
            ApiRequest::Upload { .. } => "upload",
            ApiRequest::Analyze { .. } => "analyze",
            ApiRequest::Share { .. } => "share",
            ApiRequest::CreateTimelapse { .. } => "create_timelapse",
        }
    }
}

/// Side effect produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderSpinner,
    RenderGallery(Vec<Card>),
    RenderEmpty(&'static str),
    OpenModal { image_url: String },
    ClearAnalysis,
    RenderAnalysis(AnalysisView),
    ResetUploadForm,
    /// Blocking user-facing message.
    Alert(String),
    /// Developer-facing log line.
    LogError(String),
    Request(ApiRequest),
}
