use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{FileId, FileProgress};

/// The most recently fetched mapping of file id to processing status.
///
/// Iteration order is the order in which the server listed the files, which
/// makes "first" well defined for the aggregated views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressSnapshot(IndexMap<FileId, FileProgress>);

impl ProgressSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FileId, progress: FileProgress) -> Option<FileProgress> {
        self.0.insert(id, progress)
    }

    pub fn get(&self, id: &FileId) -> Option<&FileProgress> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = FileId> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &FileProgress)> {
        self.0.iter().map(|(id, p)| (*id, p))
    }

    pub fn first(&self) -> Option<(FileId, &FileProgress)> {
        self.0.first().map(|(id, p)| (*id, p))
    }

    /// The first file, in response order, that is in its OCR phase.
    pub fn first_ocr(&self) -> Option<(FileId, &FileProgress)> {
        self.iter().find(|(_, p)| p.is_ocr_processing)
    }

    /// True when there is data and every file satisfies the completion predicate.
    /// An empty snapshot means "no data", never "complete".
    pub fn is_complete(&self) -> bool {
        !self.is_empty() && self.0.values().all(FileProgress::is_done)
    }

    /// Mean of `progress_percentage`; 0 for an empty snapshot.
    pub fn average_percentage(&self) -> f64 {
        let sum: f64 = self.0.values().map(|p| p.progress_percentage).sum();
        sum / self.len().max(1) as f64
    }
}

impl FromIterator<(FileId, FileProgress)> for ProgressSnapshot {
    fn from_iter<T: IntoIterator<Item = (FileId, FileProgress)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ProgressSnapshot {
    type Item = (FileId, FileProgress);
    type IntoIter = indexmap::map::IntoIter<FileId, FileProgress>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProcessingStatus;

    fn progress(indexed: bool, pct: f64) -> FileProgress {
        FileProgress {
            indexed,
            progress_percentage: pct,
            ..FileProgress::pending(None)
        }
    }

    #[test]
    fn test_response_order_is_preserved() {
        let json = r#"{
            "30": {"indexed": false, "status": "IN_PROGRESS", "progress_percentage": 1, "is_ocr_processing": true},
            "10": {"indexed": false, "status": "IN_PROGRESS", "progress_percentage": 2, "is_ocr_processing": true},
            "20": {"indexed": false, "status": "IN_PROGRESS", "progress_percentage": 3, "is_ocr_processing": false}
        }"#;
        let snapshot: ProgressSnapshot = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = snapshot.ids().collect();
        assert_eq!(ids, vec![FileId(30), FileId(10), FileId(20)]);
        assert_eq!(snapshot.first_ocr().map(|(id, _)| id), Some(FileId(30)));
    }

    #[test]
    fn test_empty_snapshot_is_never_complete() {
        let snapshot = ProgressSnapshot::new();
        assert!(!snapshot.is_complete());
        assert_eq!(snapshot.average_percentage(), 0.);
    }

    #[test]
    fn test_completion() {
        let mut snapshot: ProgressSnapshot = [(FileId(1), progress(true, 100.)), (FileId(2), progress(false, 60.))]
            .into_iter()
            .collect();
        assert!(!snapshot.is_complete());

        let mut done = progress(false, 100.);
        done.status = ProcessingStatus::Success;
        snapshot.insert(FileId(2), done);
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_average() {
        let snapshot: ProgressSnapshot = [(FileId(101), progress(false, 40.)), (FileId(102), progress(false, 60.))]
            .into_iter()
            .collect();
        assert_eq!(snapshot.average_percentage(), 50.);
    }
}
