mod observer;
mod state;
pub mod time_format;
mod tracker;
mod view;

pub use observer::{NoOpObserver, TrackingObserver};
pub use state::{next_state, TrackerEvent, TrackerModel, TrackerState, TrackerStatus, Transition};
pub use tracker::{UploadProgressTracker, MIN_POLL_INTERVAL};
pub use view::{derive_view, FileRow, OcrProgressView, OverallProgressView, ProgressView};
