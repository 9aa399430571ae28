use thiserror::Error;
use upload_client::UploadClientError;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum UploaderError {
    #[error(transparent)]
    Client(#[from] UploadClientError),

    /// A previous upload from the same submitter has not finished yet.
    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UploaderError>;

impl PartialEq for UploaderError {
    fn eq(&self, other: &UploaderError) -> bool {
        match (self, other) {
            (UploaderError::Client(a), UploaderError::Client(b)) => a == b,
            (e1, e2) => std::mem::discriminant(e1) == std::mem::discriminant(e2),
        }
    }
}
