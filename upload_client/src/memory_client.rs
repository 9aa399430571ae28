use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::Mutex;
use tracing::debug;
use upload_types::{
    batch_progress_percentage, estimate_completion_time, FileId, FileProgress, FolderId, ProcessingStatus,
    ProgressSnapshot, UploadedFile,
};

use crate::error::{Result, UploadClientError};
use crate::interface::{FilePayload, FileUploadClient, ProgressClient};

const FIRST_FILE_ID: i64 = 1;

/// An in-process stand-in for the file service.
///
/// Every progress query advances each queried file by one batch. PDF files can be
/// made to go through a page-by-page OCR phase first, one page per query.
#[derive(Debug)]
pub struct MemoryClient {
    state: Mutex<MemoryState>,
    batches_per_file: u64,
    ocr: Option<OcrSimulation>,
}

#[derive(Debug, Clone, Copy)]
struct OcrSimulation {
    total_pages: u32,
    avg_page_time: f64,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    files: IndexMap<FileId, SimulatedFile>,
    failing_queries: usize,
    fail_uploads: bool,
    upload_count: usize,
    query_count: usize,
}

#[derive(Debug)]
struct SimulatedFile {
    progress: FileProgress,
    ocr_remaining: bool,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new(4)
    }
}

impl MemoryClient {
    /// Files become fully indexed after `batches_per_file` queries.
    pub fn new(batches_per_file: u64) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: FIRST_FILE_ID,
                ..Default::default()
            }),
            batches_per_file,
            ocr: None,
        }
    }

    /// PDF uploads first go through `total_pages` queries of OCR.
    pub fn with_ocr(mut self, total_pages: u32, avg_page_time: f64) -> Self {
        self.ocr = Some(OcrSimulation {
            total_pages,
            avg_page_time,
        });
        self
    }

    /// The next `n` progress queries fail with a 500.
    pub async fn fail_next_queries(&self, n: usize) {
        self.state.lock().await.failing_queries = n;
    }

    pub async fn set_fail_uploads(&self, fail: bool) {
        self.state.lock().await.fail_uploads = fail;
    }

    pub async fn upload_count(&self) -> usize {
        self.state.lock().await.upload_count
    }

    pub async fn query_count(&self) -> usize {
        self.state.lock().await.query_count
    }

    fn advance(&self, file: &mut SimulatedFile) {
        let now = Utc::now();
        let progress = &mut file.progress;
        if progress.is_done() {
            return;
        }
        progress.time_started.get_or_insert(now);
        progress.status = ProcessingStatus::InProgress;

        if file.ocr_remaining {
            if let Some(ocr) = self.ocr {
                let page = progress.ocr_current_page.map_or(1, |p| p + 1).min(ocr.total_pages);
                progress.is_ocr_processing = true;
                progress.ocr_current_page = Some(page);
                progress.ocr_total_pages = Some(ocr.total_pages);
                progress.ocr_avg_page_time = Some(ocr.avg_page_time);
                if page >= ocr.total_pages {
                    file.ocr_remaining = false;
                }
                return;
            }
        }
        progress.is_ocr_processing = false;

        let total = self.batches_per_file;
        let completed = progress.completed_batches.map_or(1, |c| c + 1).min(total);
        progress.completed_batches = Some(completed);
        progress.total_batches = Some(total);

        if completed >= total {
            progress.indexed = true;
            progress.status = ProcessingStatus::Success;
            progress.progress_percentage = 100.;
            progress.estimated_completion_time = None;
        } else {
            progress.progress_percentage = batch_progress_percentage(Some(completed), Some(total)) as f64;
            progress.estimated_completion_time = progress
                .time_started
                .and_then(|started| estimate_completion_time(started, Some(completed), Some(total), now));
        }
    }
}

fn is_pdf(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
}

#[async_trait]
impl FileUploadClient for MemoryClient {
    async fn upload_files(&self, files: Vec<FilePayload>, folder_id: Option<FolderId>) -> Result<Vec<UploadedFile>> {
        let mut state = self.state.lock().await;
        state.upload_count += 1;
        if state.fail_uploads {
            return Err(UploadClientError::UploadFailed("Internal Server Error".to_owned()));
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for file in files {
            let id = FileId(state.next_id);
            state.next_id += 1;

            let ocr_remaining = self.ocr.is_some() && is_pdf(&file.file_name);
            state.files.insert(
                id,
                SimulatedFile {
                    progress: FileProgress::pending(Some(file.file_name.clone())),
                    ocr_remaining,
                },
            );
            uploaded.push(UploadedFile {
                id,
                name: Some(file.file_name),
                folder_id,
            });
        }
        Ok(uploaded)
    }
}

#[async_trait]
impl ProgressClient for MemoryClient {
    async fn query_progress(&self, file_ids: &[FileId]) -> Result<ProgressSnapshot> {
        let mut state = self.state.lock().await;
        state.query_count += 1;
        if state.failing_queries > 0 {
            state.failing_queries -= 1;
            return Err(UploadClientError::ProgressQueryFailed {
                status: 500,
                status_text: "Internal Server Error".to_owned(),
                body: "simulated failure".to_owned(),
            });
        }

        let mut snapshot = ProgressSnapshot::new();
        for id in file_ids {
            // Unknown ids are simply absent from the response.
            let Some(file) = state.files.get_mut(id) else {
                debug!("MemoryClient: no file with id {id}");
                continue;
            };
            self.advance(file);
            snapshot.insert(*id, file.progress.clone());
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> FilePayload {
        FilePayload::new(name, b"contents".to_vec())
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let client = MemoryClient::default();
        let first = client.upload_files(vec![payload("a.txt"), payload("b.txt")], None).await.unwrap();
        let second = client.upload_files(vec![payload("c.txt")], Some(FolderId(9))).await.unwrap();

        let ids: Vec<_> = first.iter().chain(second.iter()).map(|f| f.id).collect();
        assert_eq!(ids, vec![FileId(1), FileId(2), FileId(3)]);
        assert_eq!(second[0].folder_id, Some(FolderId(9)));
        assert_eq!(client.upload_count().await, 2);
    }

    #[tokio::test]
    async fn test_progress_advances_until_indexed() {
        let client = MemoryClient::new(2);
        let ids: Vec<_> = client
            .upload_files(vec![payload("a.txt")], None)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();

        let snapshot = client.query_progress(&ids).await.unwrap();
        let progress = snapshot.get(&ids[0]).unwrap();
        assert_eq!(progress.progress_percentage, 50.);
        assert!(!snapshot.is_complete());

        let snapshot = client.query_progress(&ids).await.unwrap();
        assert!(snapshot.is_complete());
        assert_eq!(snapshot.get(&ids[0]).unwrap().file_name.as_deref(), Some("a.txt"));
    }

    #[tokio::test]
    async fn test_ocr_phase_for_pdfs() {
        let client = MemoryClient::new(1).with_ocr(2, 10.);
        let uploaded = client.upload_files(vec![payload("scan.PDF"), payload("notes.txt")], None).await.unwrap();
        let ids: Vec<_> = uploaded.iter().map(|f| f.id).collect();

        let snapshot = client.query_progress(&ids).await.unwrap();
        let (ocr_id, ocr) = snapshot.first_ocr().unwrap();
        assert_eq!(ocr_id, ids[0]);
        assert_eq!(ocr.ocr_current_page, Some(1));
        assert_eq!(ocr.ocr_total_pages, Some(2));
        assert!(snapshot.get(&ids[1]).unwrap().is_done());

        let snapshot = client.query_progress(&ids).await.unwrap();
        assert_eq!(snapshot.first_ocr().unwrap().1.ocr_current_page, Some(2));

        let snapshot = client.query_progress(&ids).await.unwrap();
        assert!(snapshot.first_ocr().is_none());
        assert!(snapshot.is_complete());
    }

    #[tokio::test]
    async fn test_simulated_failures() {
        let client = MemoryClient::default();
        client.fail_next_queries(1).await;
        let err = client.query_progress(&[FileId(1)]).await.unwrap_err();
        assert!(matches!(err, UploadClientError::ProgressQueryFailed { status: 500, .. }));

        // Unknown ids produce an empty response once failures are exhausted.
        let snapshot = client.query_progress(&[FileId(1)]).await.unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(client.query_count().await, 2);

        client.set_fail_uploads(true).await;
        assert!(client.upload_files(vec![payload("a.txt")], None).await.is_err());
    }
}
