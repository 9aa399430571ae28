use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indexing status as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    NotStarted,
    InProgress,
    Success,
    Canceled,
    Failed,
    CompletedWithErrors,
    #[serde(other)]
    Unknown,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Canceled => "CANCELED",
            Self::Failed => "FAILED",
            Self::CompletedWithErrors => "COMPLETED_WITH_ERRORS",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Processing state of a single uploaded file.
///
/// `indexed`, `status`, `progress_percentage` and `is_ocr_processing` must be
/// present in every response; everything else is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProgress {
    /// True once the file is fully processed.
    pub indexed: bool,

    pub status: ProcessingStatus,

    /// 0 to 100.
    pub progress_percentage: f64,

    #[serde(default, with = "crate::timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub time_started: Option<DateTime<Utc>>,

    #[serde(default, with = "crate::timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_batches: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_batches: Option<u64>,

    pub is_ocr_processing: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_current_page: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_total_pages: Option<u32>,

    /// Seconds per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_avg_page_time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl FileProgress {
    /// A file in its initial state, before the server reports anything.
    pub fn pending(file_name: Option<String>) -> Self {
        Self {
            indexed: false,
            status: ProcessingStatus::NotStarted,
            progress_percentage: 0.,
            time_started: None,
            estimated_completion_time: None,
            completed_batches: None,
            total_batches: None,
            is_ocr_processing: false,
            ocr_current_page: None,
            ocr_total_pages: None,
            ocr_avg_page_time: None,
            file_name,
        }
    }

    /// The per-file completion predicate: indexed, or terminal success.
    pub fn is_done(&self) -> bool {
        self.indexed || self.status == ProcessingStatus::Success
    }
}
