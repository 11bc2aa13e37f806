//! Gallery controller state.

use crate::gallery::model::{Analysis, Image, ImageId};

/// Placeholder for a missing health or growth stage.
pub const NEEDS_REVIEW: &str = "Needs review";
/// Placeholder for missing notes.
pub const NO_NOTES: &str = "No additional analysis available.";
/// Shown instead of cards when the plant has no images.
pub const EMPTY_GALLERY: &str = "No images registered yet.";

/// One rendered gallery card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub image_id: ImageId,
    pub filename: String,
    pub image_url: String,
    pub caption: String,
}

impl Card {
    pub fn from_image(image: &Image, image_url: String) -> Self {
        Self {
            image_id: image.id.clone(),
            filename: image.filename.clone(),
            image_url,
            caption: image.uploaded_at.clone().unwrap_or_default(),
        }
    }
}

/// Gallery phase: `Idle → Loading → Loaded`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryPhase {
    #[default]
    Idle,
    Loading,
    Loaded { cards: Vec<Card> },
}

/// The image opened in the detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub image_id: ImageId,
    pub filename: String,
}

/// Selection: `NoSelection → Selected`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(SelectedImage),
}

impl Selection {
    pub fn image_id(&self) -> Option<&ImageId> {
        match self {
            Selection::NoSelection => None,
            Selection::Selected(image) => Some(&image.image_id),
        }
    }
}

/// Analysis as displayed, placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisView {
    pub health: String,
    pub growth_stage: String,
    pub notes: String,
}

impl From<&Analysis> for AnalysisView {
    fn from(analysis: &Analysis) -> Self {
        Self {
            health: non_empty(analysis.health_text()).unwrap_or_else(|| NEEDS_REVIEW.to_string()),
            growth_stage: non_empty(analysis.growth_stage.clone())
                .unwrap_or_else(|| NEEDS_REVIEW.to_string()),
            notes: non_empty(analysis.notes.clone()).unwrap_or_else(|| NO_NOTES.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
