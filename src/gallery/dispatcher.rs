//! Runs the controller's effects.
//!
//! ```text
//! Event → GalleryController::handle → [Effect]
//!            ▲                          │
//!            │      Request(..)         ├── GalleryApi ──► *Finished/*Loaded event
//!            └──────────────────────────┘
//!                   everything else ──────► GalleryView
//! ```

use std::collections::VecDeque;

use crate::gallery::api::GalleryApi;
use crate::gallery::controller::GalleryController;
use crate::gallery::event::{ApiRequest, Effect, Event};
use crate::gallery::view::GalleryView;

/// Drives a [`GalleryController`] against a real API and view.
pub struct Dispatcher<A, V> {
    controller: GalleryController,
    api: A,
    view: V,
}

impl<A: GalleryApi, V: GalleryView> Dispatcher<A, V> {
    pub fn new(controller: GalleryController, api: A, view: V) -> Self {
        Self {
            controller,
            api,
            view,
        }
    }

    pub fn controller(&self) -> &GalleryController {
        &self.controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Feed one event and run everything it sets off, to completion.
    ///
    /// Requests are awaited one at a time, so completions are applied in the
    /// order their requests were issued.
    pub async fn dispatch(&mut self, event: Event) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in self.controller.handle(event) {
                match effect {
                    Effect::Request(request) => {
                        tracing::debug!(request = request.name(), "gallery request");
                        pending.push_back(self.execute(request).await);
                    }
                    other => self.view.apply(&other),
                }
            }
        }
    }

    async fn execute(&self, request: ApiRequest) -> Event {
        match request {
            ApiRequest::ListImages { plant_id } => {
                Event::GalleryLoaded(self.api.list_images(plant_id).await)
            }
            ApiRequest::Upload {
                plant_id,
                file,
                notes,
            } => Event::UploadFinished(self.api.upload(plant_id, file, notes).await),
            ApiRequest::Analyze { image_id } => {
                Event::AnalysisLoaded(self.api.analyze(&image_id).await)
            }
            ApiRequest::Share { image_id, platform } => {
                Event::ShareFinished(self.api.share(&image_id, platform).await)
            }
            ApiRequest::CreateTimelapse { plant_id, window } => {
                Event::TimelapseFinished(self.api.create_timelapse(plant_id, window).await)
            }
        }
    }
}
