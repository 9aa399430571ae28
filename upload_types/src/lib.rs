mod batch_progress;
mod file_id;
mod file_progress;
mod snapshot;
pub mod timestamp;
mod upload;

pub use batch_progress::{batch_progress_percentage, estimate_completion_time, MIN_ELAPSED_FOR_ESTIMATE};
pub use file_id::{FileId, FolderId};
pub use file_progress::{FileProgress, ProcessingStatus};
pub use snapshot::ProgressSnapshot;
pub use upload::UploadedFile;
