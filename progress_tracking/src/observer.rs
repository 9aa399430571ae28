use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use upload_types::ProgressSnapshot;

use crate::TrackerStatus;

/// Receives tracker updates as they are applied. Calls for one session arrive in order
/// and never overlap.
#[async_trait]
pub trait TrackingObserver: Debug + Send + Sync {
    /// Called after every applied query result, successful or not.
    async fn on_snapshot(&self, _status: &TrackerStatus) {}

    /// Called exactly once when a session reaches `Complete`.
    async fn on_complete(&self, _snapshot: &ProgressSnapshot) {}

    /// Called when a query failure ends the session.
    async fn on_failure(&self, _message: &str) {}
}

#[derive(Debug, Default)]
pub struct NoOpObserver;

impl NoOpObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }
}

#[async_trait]
impl TrackingObserver for NoOpObserver {}
