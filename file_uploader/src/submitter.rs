use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use error_printer::ErrorPrinter;
use tokio::sync::Mutex;
use tracing::{debug, info};
use upload_client::{FilePayload, FileUploadClient};
use upload_types::{FolderId, UploadedFile};

use crate::error::{Result, UploaderError};

/// Notified after every successful upload, e.g. to start tracking the new files.
#[async_trait]
pub trait UploadListener: Send + Sync {
    async fn on_uploaded(&self, files: &[UploadedFile]);
}

/// Submits file selections, one upload at a time.
///
/// There is no retry: a failed upload is reported once and the submitter is
/// immediately ready for another attempt.
pub struct UploadSubmitter {
    client: Arc<dyn FileUploadClient>,
    uploading: AtomicBool,
    last_error: Mutex<Option<String>>,
    listeners: Vec<Arc<dyn UploadListener>>,
}

/// Clears the in-flight flag however the upload ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl UploadSubmitter {
    pub fn new(client: Arc<dyn FileUploadClient>) -> Self {
        Self {
            client,
            uploading: AtomicBool::new(false),
            last_error: Mutex::new(None),
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Arc<dyn UploadListener>) {
        self.listeners.push(listener);
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Message of the most recent failed upload, cleared by the next successful one.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    /// Uploads `files` in a single request and returns the server's records in
    /// server order.
    ///
    /// An empty selection does nothing and returns no records.
    pub async fn submit(&self, files: Vec<FilePayload>, folder_id: Option<FolderId>) -> Result<Vec<UploadedFile>> {
        if files.is_empty() {
            debug!("Empty file selection; nothing to upload");
            return Ok(Vec::new());
        }

        if self
            .uploading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(UploaderError::UploadInProgress);
        }
        let _in_flight = InFlight(&self.uploading);

        info!("Uploading {} files", files.len());

        let result = self.client.upload_files(files, folder_id).await.warn_error("File upload failed");
        let uploaded = match result {
            Ok(uploaded) => uploaded,
            Err(e) => {
                *self.last_error.lock().await = Some(e.to_string());
                return Err(e.into());
            },
        };
        *self.last_error.lock().await = None;

        debug!("Upload assigned ids {:?}", uploaded.iter().map(|f| f.id).collect::<Vec<_>>());

        for listener in &self.listeners {
            listener.on_uploaded(&uploaded).await;
        }

        Ok(uploaded)
    }
}
