use std::path::Path;

use async_trait::async_trait;
use upload_types::{FileId, FolderId, ProgressSnapshot, UploadedFile};

use crate::error::Result;

/// One file selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePayload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Reads the whole file; the payload is named after the path's final component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, data })
    }
}

/// A client that can submit files for server-side processing.
#[async_trait]
pub trait FileUploadClient: Send + Sync {
    /// Uploads all files in a single request. The result lists one record per file,
    /// in the order the server assigned them. All-or-nothing: any failure is an
    /// `UploadFailed` error.
    async fn upload_files(&self, files: Vec<FilePayload>, folder_id: Option<FolderId>) -> Result<Vec<UploadedFile>>;
}

/// A client that can report processing progress for uploaded files.
#[async_trait]
pub trait ProgressClient: Send + Sync {
    /// Fetches the current progress for exactly these ids.
    async fn query_progress(&self, file_ids: &[FileId]) -> Result<ProgressSnapshot>;
}

/// A client that can do both.
pub trait UploadClient: FileUploadClient + ProgressClient {}

impl<T: FileUploadClient + ProgressClient> UploadClient for T {}
