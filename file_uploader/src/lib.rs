pub use display::render_status;
pub use error::{Result, UploaderError};
pub use session::UploadSession;
pub use submitter::{UploadListener, UploadSubmitter};

mod display;
mod error;
pub mod logging;
mod session;
mod submitter;
