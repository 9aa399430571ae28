use chrono::{DateTime, Utc};
use upload_types::{FileId, FileProgress, ProgressSnapshot};

use crate::time_format::{format_distance, minutes_label, seconds_to_minutes_ceil};

/// What the presentation layer should show for a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressView {
    /// A file is in its OCR phase; it is the sole indicator.
    Ocr(OcrProgressView),
    /// Mean progress across all files.
    Overall(OverallProgressView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcrProgressView {
    pub file_id: FileId,
    pub file_name: Option<String>,

    /// Raw page counters as reported; `None` when the server omitted them.
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,

    /// Percentage of pages processed, with missing counters treated as 1.
    pub page_progress: u32,

    pub remaining_seconds: Option<f64>,
    pub minutes_remaining: Option<u64>,
}

impl OcrProgressView {
    fn from_progress(file_id: FileId, progress: &FileProgress) -> Self {
        let current = nonzero_or_one(progress.ocr_current_page);
        let total = nonzero_or_one(progress.ocr_total_pages);
        let page_progress = (current as f64 / total as f64 * 100.).round() as u32;

        let remaining_seconds = match (progress.ocr_current_page, progress.ocr_total_pages, progress.ocr_avg_page_time) {
            (Some(current), Some(total), Some(avg)) if current > 0 && total > 0 && avg > 0. => {
                Some(total.saturating_sub(current) as f64 * avg)
            },
            _ => None,
        };

        Self {
            file_id,
            file_name: progress.file_name.clone(),
            current_page: progress.ocr_current_page,
            total_pages: progress.ocr_total_pages,
            page_progress,
            remaining_seconds,
            minutes_remaining: remaining_seconds.map(seconds_to_minutes_ceil),
        }
    }

    /// "Page 3/10", with "?" for unreported counters.
    pub fn page_label(&self) -> String {
        let show = |n: Option<u32>| n.map_or_else(|| "?".to_owned(), |n| n.to_string());
        format!("Page {}/{}", show(self.current_page), show(self.total_pages))
    }

    /// e.g. "2 minutes"; `None` when no estimate can be made.
    pub fn remaining_label(&self) -> Option<String> {
        self.minutes_remaining.map(minutes_label)
    }
}

fn nonzero_or_one(value: Option<u32>) -> u32 {
    value.filter(|&v| v > 0).unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileRow {
    pub file_id: FileId,
    pub file_name: Option<String>,
    pub percentage: f64,
}

impl FileRow {
    pub fn display_name(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| format!("File {}", self.file_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverallProgressView {
    pub percentage: f64,
    pub rows: Vec<FileRow>,

    /// Server-reported completion time of the first file in response order.
    pub estimated_completion: Option<DateTime<Utc>>,
}

impl OverallProgressView {
    pub fn rounded_percentage(&self) -> u32 {
        self.percentage.round().max(0.) as u32
    }

    pub fn estimated_completion_label(&self, now: DateTime<Utc>) -> Option<String> {
        self.estimated_completion.map(|target| format_distance(target, now))
    }
}

/// Projects a snapshot onto the view shown to the user.
///
/// The first OCR file in response order wins over the overall view, so repeated
/// identical snapshots always select the same file.
pub fn derive_view(snapshot: &ProgressSnapshot) -> ProgressView {
    if let Some((file_id, progress)) = snapshot.first_ocr() {
        return ProgressView::Ocr(OcrProgressView::from_progress(file_id, progress));
    }

    let rows = snapshot
        .iter()
        .map(|(file_id, progress)| FileRow {
            file_id,
            file_name: progress.file_name.clone(),
            percentage: progress.progress_percentage,
        })
        .collect();

    ProgressView::Overall(OverallProgressView {
        percentage: snapshot.average_percentage(),
        rows,
        estimated_completion: snapshot.first().and_then(|(_, p)| p.estimated_completion_time),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn ocr(current: Option<u32>, total: Option<u32>, avg: Option<f64>) -> FileProgress {
        FileProgress {
            is_ocr_processing: true,
            ocr_current_page: current,
            ocr_total_pages: total,
            ocr_avg_page_time: avg,
            ..FileProgress::pending(Some("scan.pdf".to_owned()))
        }
    }

    fn plain(pct: f64) -> FileProgress {
        FileProgress {
            progress_percentage: pct,
            ..FileProgress::pending(None)
        }
    }

    #[test]
    fn test_ocr_page_progress_and_estimate() {
        let snapshot: ProgressSnapshot = [(FileId(201), ocr(Some(3), Some(10), Some(12.)))].into_iter().collect();

        let ProgressView::Ocr(view) = derive_view(&snapshot) else {
            panic!("expected the OCR view");
        };
        assert_eq!(view.file_id, FileId(201));
        assert_eq!(view.page_progress, 30);
        assert_eq!(view.remaining_seconds, Some(84.));
        assert_eq!(view.remaining_label().as_deref(), Some("2 minutes"));
        assert_eq!(view.page_label(), "Page 3/10");
    }

    #[test]
    fn test_ocr_missing_counters() {
        let snapshot: ProgressSnapshot = [(FileId(1), ocr(None, None, Some(5.)))].into_iter().collect();

        let ProgressView::Ocr(view) = derive_view(&snapshot) else {
            panic!("expected the OCR view");
        };
        assert_eq!(view.page_progress, 100);
        assert_eq!(view.current_page, None);
        assert_eq!(view.remaining_label(), None);
        assert_eq!(view.page_label(), "Page ?/?");
    }

    #[test]
    fn test_ocr_last_page_shows_zero_minutes() {
        let snapshot: ProgressSnapshot = [(FileId(1), ocr(Some(10), Some(10), Some(12.)))].into_iter().collect();

        let ProgressView::Ocr(view) = derive_view(&snapshot) else {
            panic!("expected the OCR view");
        };
        assert_eq!(view.remaining_label().as_deref(), Some("0 minutes"));
    }

    #[test]
    fn test_ocr_selection_is_deterministic() {
        let snapshot: ProgressSnapshot = [
            (FileId(7), plain(10.)),
            (FileId(9), ocr(Some(1), Some(4), None)),
            (FileId(3), ocr(Some(2), Some(4), None)),
        ]
        .into_iter()
        .collect();

        for _ in 0..5 {
            match derive_view(&snapshot.clone()) {
                ProgressView::Ocr(view) => assert_eq!(view.file_id, FileId(9)),
                other => panic!("unexpected view {other:?}"),
            }
        }
    }

    #[test]
    fn test_overall_average_and_rows() {
        let snapshot: ProgressSnapshot = [(FileId(101), plain(40.)), (FileId(102), plain(60.))].into_iter().collect();

        let ProgressView::Overall(view) = derive_view(&snapshot) else {
            panic!("expected the overall view");
        };
        assert_eq!(view.rounded_percentage(), 50);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].display_name(), "File 101");
        assert_eq!(view.estimated_completion_label(now()), None);
    }

    #[test]
    fn test_overall_estimate_uses_first_entry() {
        let mut first = plain(20.);
        first.estimated_completion_time = Some(now() + Duration::minutes(5));
        let mut second = plain(80.);
        second.estimated_completion_time = Some(now() + Duration::hours(3));
        let snapshot: ProgressSnapshot = [(FileId(1), first), (FileId(2), second)].into_iter().collect();

        let ProgressView::Overall(view) = derive_view(&snapshot) else {
            panic!("expected the overall view");
        };
        assert_eq!(view.estimated_completion_label(now()).as_deref(), Some("in 5 minutes"));
    }

    #[test]
    fn test_no_estimate_without_server_completion_time() {
        let mut first = plain(50.);
        first.time_started = Some(now() - Duration::seconds(100));
        first.completed_batches = Some(5);
        first.total_batches = Some(10);
        let snapshot: ProgressSnapshot = [(FileId(1), first)].into_iter().collect();

        let ProgressView::Overall(view) = derive_view(&snapshot) else {
            panic!("expected the overall view");
        };
        assert_eq!(view.estimated_completion, None);
        assert_eq!(view.estimated_completion_label(now()), None);
    }

    #[test]
    fn test_empty_snapshot_is_zero_percent() {
        let ProgressView::Overall(view) = derive_view(&ProgressSnapshot::new()) else {
            panic!("expected the overall view");
        };
        assert_eq!(view.percentage, 0.);
        assert!(view.rows.is_empty());
    }
}
