use std::fmt::Write;

use chrono::{DateTime, Utc};
use progress_tracking::{derive_view, OcrProgressView, OverallProgressView, ProgressView, TrackerStatus};

/// Renders the tracker status as the text shown to the user.
pub fn render_status(status: &TrackerStatus, now: DateTime<Utc>) -> String {
    if let Some(error) = &status.error {
        return format!("Error tracking progress: {error}");
    }

    if !status.is_polling() && status.is_complete() {
        return "Files ready for chat!".to_owned();
    }

    if !status.is_polling() && status.snapshot.is_empty() {
        return "No progress data available.".to_owned();
    }

    match derive_view(&status.snapshot) {
        ProgressView::Ocr(view) => render_ocr(&view),
        ProgressView::Overall(view) => render_overall(&view, now),
    }
}

fn render_ocr(view: &OcrProgressView) -> String {
    let mut out = format!("OCR Processing PDF: {}%\n{}", view.page_progress, view.page_label());
    if let Some(name) = &view.file_name {
        let _ = write!(out, " - {name}");
    }
    if let Some(remaining) = view.remaining_label() {
        let _ = write!(out, "\n~{remaining} remaining");
    }
    out
}

fn render_overall(view: &OverallProgressView, now: DateTime<Utc>) -> String {
    let mut out = format!("Processing files: {}%", view.rounded_percentage());
    for row in &view.rows {
        let _ = write!(out, "\n  {}: {}% complete", row.display_name(), row.percentage);
    }
    if let Some(label) = view.estimated_completion_label(now) {
        let _ = write!(out, "\nEstimated completion: {label}");
    }
    out
}
