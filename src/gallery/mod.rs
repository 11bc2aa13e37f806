//! Gallery client.
//!
//! The page logic of the tracker as an explicit state machine:
//!
//! ```text
//! gallery:    Idle → Loading → Loaded(cards)      (Refresh re-enters Loading)
//! selection:  NoSelection → Selected(image)       (replaced on every click)
//! ```
//!
//! [`GalleryController`] is pure; [`Dispatcher`] performs its effects
//! through a [`GalleryApi`] and a [`GalleryView`].

pub mod api;
pub mod controller;
pub mod dispatcher;
pub mod event;
pub mod model;
pub mod state;
pub mod view;

pub use api::{ClientError, GalleryApi, HttpGalleryApi};
pub use controller::{GalleryConfig, GalleryController};
pub use dispatcher::Dispatcher;
pub use event::{ApiRequest, Effect, Event};
pub use model::{ImageId, PlantId, TimelapseWindow, UploadFile};
pub use state::{AnalysisView, Card, GalleryPhase, Selection};
pub use view::{GalleryView, RecordingView, TerminalView};
