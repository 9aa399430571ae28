use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum UploadClientError {
    /// The upload request failed outright or returned a non-success status.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// The progress endpoint returned a non-success status.
    #[error("Failed to fetch file progress: {status} {status_text} - {body}")]
    ProgressQueryFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Configuration Error: {0}")]
    ConfigurationError(String),

    #[error("Invalid Response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Parse Error: {0}")]
    ParseError(#[from] url::ParseError),

    #[error("ReqwestMiddleware Error: {0}")]
    ReqwestMiddlewareError(#[from] reqwest_middleware::Error),

    #[error("Reqwest Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Other Internal Error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, UploadClientError>;

impl UploadClientError {
    pub(crate) fn progress_query_failed(status: reqwest::StatusCode, body: String) -> Self {
        UploadClientError::ProgressQueryFailed {
            status: status.as_u16(),
            status_text: status_text(status),
            body,
        }
    }
}

/// Reason phrase for a status code, e.g. "Internal Server Error".
pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_owned()
}

impl PartialEq for UploadClientError {
    fn eq(&self, other: &UploadClientError) -> bool {
        match (self, other) {
            (UploadClientError::UploadFailed(a), UploadClientError::UploadFailed(b)) => a == b,
            (
                UploadClientError::ProgressQueryFailed {
                    status: s1,
                    status_text: t1,
                    body: b1,
                },
                UploadClientError::ProgressQueryFailed {
                    status: s2,
                    status_text: t2,
                    body: b2,
                },
            ) => s1 == s2 && t1 == t2 && b1 == b2,
            (e1, e2) => std::mem::discriminant(e1) == std::mem::discriminant(e2),
        }
    }
}
