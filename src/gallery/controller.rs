//! The gallery state machine.
//!
//! [`GalleryController::handle`] is a pure transition: it updates the
//! controller's own state and returns the effects to perform. It never does
//! I/O, so every workflow can be driven and checked without a browser.

use url::Url;

use crate::gallery::api::ClientError;
use crate::gallery::event::{ApiRequest, Effect, Event};
use crate::gallery::model::{
    AnalysisResponse, ImageId, ImageList, PlantId, SharePlatform, ShareReceipt, TimelapseReceipt,
    TimelapseWindow, UploadFile, UploadReceipt,
};
use crate::gallery::state::{
    AnalysisView, Card, GalleryPhase, SelectedImage, Selection, EMPTY_GALLERY,
};

pub const LOAD_FAILED: &str = "Failed to load images.";
pub const NO_FILE_SELECTED: &str = "Please choose an image.";
pub const UPLOAD_SUCCEEDED: &str = "Image uploaded successfully!";
pub const UPLOAD_FAILED: &str = "Upload failed.";
pub const ANALYSIS_FAILED: &str = "Failed to analyze image.";
pub const SHARE_SUCCEEDED: &str = "Image shared successfully!";
pub const SHARE_FAILED: &str = "Sharing failed.";
pub const TIMELAPSE_FAILED: &str = "Timelapse failed.";

/// Controller settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Base URL of the front end; image files are loaded through its
    /// `/media` route.
    pub api_base: String,
    /// Plant whose images the gallery shows.
    pub plant_id: PlantId,
    pub share_platform: SharePlatform,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:3000".to_string(),
            plant_id: 1,
            share_platform: SharePlatform::Instagram,
        }
    }
}

/// Gallery, selection and analysis state for one page.
#[derive(Debug, Clone)]
pub struct GalleryController {
    config: GalleryConfig,
    phase: GalleryPhase,
    selection: Selection,
    analysis: Option<AnalysisView>,
}

impl GalleryController {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            phase: GalleryPhase::Idle,
            selection: Selection::NoSelection,
            analysis: None,
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn phase(&self) -> &GalleryPhase {
        &self.phase
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_image_id(&self) -> Option<&ImageId> {
        self.selection.image_id()
    }

    /// Analysis currently on display, if any.
    pub fn analysis(&self) -> Option<&AnalysisView> {
        self.analysis.as_ref()
    }

    /// Cards of the last successful load.
    pub fn cards(&self) -> &[Card] {
        match &self.phase {
            GalleryPhase::Loaded { cards } => cards,
            _ => &[],
        }
    }

    /// URL an image file is displayed from. The filename is one encoded
    /// path segment.
    pub fn image_url(&self, filename: &str) -> String {
        let base = &self.config.api_base;
        match Url::parse(base) {
            Ok(mut url) if !url.cannot_be_a_base() => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().extend(["media", filename]);
                }
                url.into()
            }
            _ => format!("{}/media/{}", base.trim_end_matches('/'), filename),
        }
    }

    /// Apply one event.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Refresh => self.load_gallery(),
            Event::GalleryLoaded(result) => self.gallery_loaded(result),
            Event::UploadSubmitted {
                plant_id,
                file,
                notes,
            } => self.submit_upload(plant_id, file, notes),
            Event::UploadFinished(result) => self.upload_finished(result),
            Event::ImageClicked { image_id, filename } => self.show_image(image_id, filename),
            Event::AnalyzeClicked => self.analyze_selected(),
            Event::AnalysisLoaded(result) => self.analysis_loaded(result),
            Event::ShareClicked => self.share_selected(),
            Event::ShareFinished(result) => self.share_finished(result),
            Event::TimelapseClicked(window) => vec![Effect::Request(ApiRequest::CreateTimelapse {
                plant_id: self.config.plant_id,
                window,
            })],
            Event::TimelapseFinished(result) => timelapse_finished(result),
        }
    }

    fn load_gallery(&mut self) -> Vec<Effect> {
        self.phase = GalleryPhase::Loading;
        vec![
            Effect::RenderSpinner,
            Effect::Request(ApiRequest::ListImages {
                plant_id: self.config.plant_id,
            }),
        ]
    }

    // Applied whenever it arrives: with overlapping loads the last reply to
    // resolve wins.
    fn gallery_loaded(&mut self, result: Result<ImageList, ClientError>) -> Vec<Effect> {
        match result {
            Ok(list) => {
                let cards: Vec<Card> = list
                    .images
                    .iter()
                    .map(|image| Card::from_image(image, self.image_url(&image.filename)))
                    .collect();
                let effect = if cards.is_empty() {
                    Effect::RenderEmpty(EMPTY_GALLERY)
                } else {
                    Effect::RenderGallery(cards.clone())
                };
                self.phase = GalleryPhase::Loaded { cards };
                vec![effect]
            }
            // Phase and rendered view stay as they were.
            Err(e) => vec![
                Effect::LogError(format!("gallery load failed: {e}")),
                Effect::Alert(LOAD_FAILED.to_string()),
            ],
        }
    }

    fn submit_upload(
        &mut self,
        plant_id: PlantId,
        file: Option<UploadFile>,
        notes: Option<String>,
    ) -> Vec<Effect> {
        match file {
            None => vec![Effect::Alert(NO_FILE_SELECTED.to_string())],
            Some(file) => vec![Effect::Request(ApiRequest::Upload {
                plant_id,
                file,
                notes,
            })],
        }
    }

    fn upload_finished(&mut self, result: Result<UploadReceipt, ClientError>) -> Vec<Effect> {
        match result {
            Ok(_) => {
                let mut effects = vec![
                    Effect::Alert(UPLOAD_SUCCEEDED.to_string()),
                    Effect::ResetUploadForm,
                ];
                effects.extend(self.load_gallery());
                effects
            }
            Err(e) => vec![
                Effect::LogError(format!("upload failed: {e}")),
                Effect::Alert(format!("Upload failed: {}", e.user_message(UPLOAD_FAILED))),
            ],
        }
    }

    fn show_image(&mut self, image_id: ImageId, filename: String) -> Vec<Effect> {
        let image_url = self.image_url(&filename);
        self.selection = Selection::Selected(SelectedImage { image_id, filename });
        self.analysis = None;
        vec![Effect::ClearAnalysis, Effect::OpenModal { image_url }]
    }

    fn analyze_selected(&mut self) -> Vec<Effect> {
        match self.selection.image_id() {
            None => Vec::new(),
            Some(image_id) => vec![Effect::Request(ApiRequest::Analyze {
                image_id: image_id.clone(),
            })],
        }
    }

    fn analysis_loaded(&mut self, result: Result<AnalysisResponse, ClientError>) -> Vec<Effect> {
        match result {
            Ok(AnalysisResponse {
                analysis: Some(analysis),
            }) => {
                let view = AnalysisView::from(&analysis);
                self.analysis = Some(view.clone());
                vec![Effect::RenderAnalysis(view)]
            }
            Ok(AnalysisResponse { analysis: None }) => Vec::new(),
            Err(e) => vec![
                Effect::LogError(format!("analysis failed: {e}")),
                Effect::Alert(ANALYSIS_FAILED.to_string()),
            ],
        }
    }

    fn share_selected(&mut self) -> Vec<Effect> {
        match self.selection.image_id() {
            None => Vec::new(),
            Some(image_id) => vec![Effect::Request(ApiRequest::Share {
                image_id: image_id.clone(),
                platform: self.config.share_platform,
            })],
        }
    }

    fn share_finished(&mut self, result: Result<ShareReceipt, ClientError>) -> Vec<Effect> {
        match result {
            Ok(_) => vec![Effect::Alert(SHARE_SUCCEEDED.to_string())],
            Err(e) => vec![
                Effect::LogError(format!("share failed: {e}")),
                Effect::Alert(format!("Sharing failed: {}", e.user_message(SHARE_FAILED))),
            ],
        }
    }
}

fn timelapse_finished(result: Result<TimelapseReceipt, ClientError>) -> Vec<Effect> {
    match result {
        Ok(receipt) => {
            let location = receipt
                .url
                .or(receipt.timelapse_id)
                .unwrap_or_else(|| "ready".to_string());
            vec![Effect::Alert(format!("Timelapse created: {location}"))]
        }
        Err(e) => vec![
            Effect::LogError(format!("timelapse failed: {e}")),
            Effect::Alert(format!("Timelapse failed: {}", e.user_message(TIMELAPSE_FAILED))),
        ],
    }
}
