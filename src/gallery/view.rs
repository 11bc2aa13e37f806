use crate::gallery::event::Effect;

/// Where rendering effects end up.
pub trait GalleryView {
    fn apply(&mut self, effect: &Effect);
}

/// Keeps every effect it is given. Used by tests.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub effects: Vec<Effect>,
}

impl RecordingView {
    pub fn alerts(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Alert(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl GalleryView for RecordingView {
    fn apply(&mut self, effect: &Effect) {
        self.effects.push(effect.clone());
    }
}

/// Prints the gallery to stdout.
#[derive(Debug, Default)]
pub struct TerminalView;

impl GalleryView for TerminalView {
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::RenderSpinner => println!("Loading..."),
            Effect::RenderGallery(cards) => {
                for card in cards {
                    println!("{:<38} {:<32} {}", card.image_id.as_str(), card.filename, card.caption);
                }
            }
            Effect::RenderEmpty(message) => println!("{message}"),
            Effect::OpenModal { image_url } => println!("Image: {image_url}"),
            Effect::ClearAnalysis | Effect::ResetUploadForm => {}
            Effect::RenderAnalysis(view) => {
                println!("Health:       {}", view.health);
                println!("Growth stage: {}", view.growth_stage);
                println!("Notes:        {}", view.notes);
            }
            Effect::Alert(message) => println!("{message}"),
            Effect::LogError(message) => tracing::error!("{message}"),
            Effect::Request(_) => {}
        }
    }
}
