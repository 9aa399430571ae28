use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use progress_tracking::{NoOpObserver, TrackerStatus, TrackingObserver, UploadProgressTracker};
use tracing::info;
use upload_client::{FilePayload, FileUploadClient, ProgressClient, UploadClient};
use upload_config::UploaderConfig;
use upload_types::{FolderId, UploadedFile};

use crate::display::render_status;
use crate::error::Result;
use crate::submitter::{UploadListener, UploadSubmitter};

/// Tracks the files of each successful upload, replacing any earlier session.
#[async_trait]
impl UploadListener for UploadProgressTracker {
    async fn on_uploaded(&self, files: &[UploadedFile]) {
        self.start_tracking(files.iter().map(|f| f.id)).await;
    }
}

/// An uploader wired to a progress tracker: the tracker is registered as an
/// [`UploadListener`], so every successful upload starts tracking the files it created.
pub struct UploadSession {
    submitter: UploadSubmitter,
    tracker: Arc<UploadProgressTracker>,

    /// The batch being tracked; dropped once every file in it is ready.
    pending: Vec<UploadedFile>,
}

impl UploadSession {
    pub fn new<C: UploadClient + 'static>(client: Arc<C>, config: &UploaderConfig) -> Self {
        Self::with_observer(client, config, NoOpObserver::new())
    }

    pub fn with_observer<C: UploadClient + 'static>(
        client: Arc<C>,
        config: &UploaderConfig,
        observer: Arc<dyn TrackingObserver>,
    ) -> Self {
        let upload_client: Arc<dyn FileUploadClient> = client.clone();
        let progress_client: Arc<dyn ProgressClient> = client;
        let tracker =
            Arc::new(UploadProgressTracker::from_config(progress_client, &config.tracking).with_observer(observer));

        let mut submitter = UploadSubmitter::new(upload_client);
        submitter.add_listener(tracker.clone());

        Self {
            submitter,
            tracker,
            pending: Vec::new(),
        }
    }

    pub fn tracker(&self) -> &Arc<UploadProgressTracker> {
        &self.tracker
    }

    pub fn submitter(&self) -> &UploadSubmitter {
        &self.submitter
    }

    pub fn submitter_mut(&mut self) -> &mut UploadSubmitter {
        &mut self.submitter
    }

    pub fn pending(&self) -> &[UploadedFile] {
        &self.pending
    }

    /// Uploads `files`; the submitter's listeners start tracking them. An empty
    /// selection changes nothing.
    pub async fn upload(&mut self, files: Vec<FilePayload>, folder_id: Option<FolderId>) -> Result<Vec<UploadedFile>> {
        let uploaded = self.submitter.submit(files, folder_id).await?;
        if !uploaded.is_empty() {
            self.pending = uploaded.clone();
        }
        Ok(uploaded)
    }

    /// Starts a new tracking session for the pending batch, e.g. after a failed query.
    /// Returns false if there is nothing pending or the batch is already being tracked.
    pub async fn resume_tracking(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.tracker.start_tracking(self.pending.iter().map(|f| f.id)).await
    }

    /// Waits for the current tracking session to end.
    pub async fn wait(&mut self) -> TrackerStatus {
        let status = self.tracker.wait().await;
        if status.is_complete() && !self.pending.is_empty() {
            info!("Upload of {} files is ready", self.pending.len());
            self.pending.clear();
        }
        status
    }

    pub async fn status(&self) -> TrackerStatus {
        self.tracker.status().await
    }

    /// The user-facing text: an upload error if the last upload failed, otherwise
    /// the tracking status.
    pub async fn render(&self, now: DateTime<Utc>) -> String {
        if let Some(error) = self.submitter.last_error().await {
            return error;
        }
        render_status(&self.status().await, now)
    }

    pub async fn stop(&self) {
        self.tracker.stop_tracking().await;
    }
}
