use chrono::{DateTime, TimeDelta, Utc};

/// Below this many elapsed seconds a rate-based estimate is too noisy to report.
pub const MIN_ELAPSED_FOR_ESTIMATE: i64 = 5;

/// Percentage complete for batch-oriented processing.
///
/// Unknown totals count as 0%. A job with zero batches is trivially done. Otherwise
/// the value is capped at 99 so that only the `indexed` flag reports completion.
pub fn batch_progress_percentage(completed_batches: Option<u64>, total_batches: Option<u64>) -> u8 {
    let Some(total) = total_batches else {
        return 0;
    };
    if total == 0 {
        return 100;
    }
    let completed = completed_batches.unwrap_or(0);
    (completed.saturating_mul(100) / total).min(99) as u8
}

/// Linear extrapolation of the completion time from the batch rate so far.
pub fn estimate_completion_time(
    time_started: DateTime<Utc>,
    completed_batches: Option<u64>,
    total_batches: Option<u64>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let total = total_batches?;
    let completed = completed_batches.filter(|&c| c > 0)?;

    let elapsed = now - time_started;
    if elapsed < TimeDelta::seconds(MIN_ELAPSED_FOR_ESTIMATE) {
        return None;
    }

    let batches_per_second = completed as f64 / (elapsed.num_milliseconds() as f64 / 1000.);
    if batches_per_second <= 0. {
        return None;
    }

    let remaining_batches = total.saturating_sub(completed) as f64;
    let seconds_remaining = remaining_batches / batches_per_second;
    let remaining = TimeDelta::try_milliseconds((seconds_remaining * 1000.).round() as i64)?;
    now.checked_add_signed(remaining)
}
