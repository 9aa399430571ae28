use std::sync::Arc;
use std::time::Duration;

use error_printer::ErrorPrinter;
use itertools::Itertools;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use upload_client::ProgressClient;
use upload_config::groups::tracking::ConfigValueGroup as TrackingConfig;
use upload_types::FileId;

use crate::observer::{NoOpObserver, TrackingObserver};
use crate::state::{TrackerEvent, TrackerModel, TrackerState, TrackerStatus};
use crate::view::{derive_view, ProgressView};

/// Keeps a periodically refreshed progress snapshot for a set of uploaded files.
///
/// Each call to [`start_tracking`](Self::start_tracking) with a new id set starts a
/// polling session on a background task: one query right away, then one per
/// `poll_interval`, until every file is done, a query fails, or the session is stopped.
/// Queries within a session are strictly sequential. Results are applied under the
/// model lock and only if the session is still current, so a replaced session can
/// never write into its successor's snapshot.
///
/// All operations take `&self`, so the tracker can be shared behind an `Arc`.
/// Must be used within a tokio runtime. Dropping the tracker cancels its session.
pub struct UploadProgressTracker {
    client: Arc<dyn ProgressClient>,
    poll_interval: Duration,
    model: Arc<Mutex<TrackerModel>>,
    observer: Arc<dyn TrackingObserver>,
    // Locked before `model` whenever both are held.
    session: Mutex<Option<PollingSession>>,
}

/// Shortest accepted polling period; shorter ones, including zero, are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct PollingSession {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl UploadProgressTracker {
    pub fn new(client: Arc<dyn ProgressClient>, poll_interval: Duration) -> Self {
        if poll_interval < MIN_POLL_INTERVAL {
            warn!("Poll interval {poll_interval:?} is below the minimum; using {MIN_POLL_INTERVAL:?}");
        }
        Self {
            client,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            model: Arc::new(Mutex::new(TrackerModel::new())),
            observer: NoOpObserver::new(),
            session: Mutex::new(None),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn from_config(client: Arc<dyn ProgressClient>, config: &TrackingConfig) -> Self {
        Self::new(client, config.poll_interval)
    }

    pub fn with_observer(mut self, observer: Arc<dyn TrackingObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Begins tracking `ids`, replacing any current session.
    ///
    /// Duplicate ids are dropped, keeping first occurrences. An empty set stops a polling
    /// session and is otherwise ignored. Re-supplying the ids of a session that is still
    /// polling, or has completed, changes nothing.
    ///
    /// Returns true if a new polling session was started.
    pub async fn start_tracking(&self, ids: impl IntoIterator<Item = FileId>) -> bool {
        let ids: Vec<FileId> = ids.into_iter().unique().collect();
        let mut session = self.session.lock().await;

        {
            let model = self.model.lock().await;
            let status = model.status();
            if !ids.is_empty()
                && status.file_ids == ids
                && matches!(status.state, TrackerState::Polling | TrackerState::Complete)
            {
                debug!("Already tracking {} files; ignoring restart", ids.len());
                return false;
            }
        }

        cancel_session(session.take());

        let mut model = self.model.lock().await;
        let transition = model.apply(TrackerEvent::Started(ids.clone()));
        if ids.is_empty() {
            if transition.is_change() {
                info!("Tracking stopped: no files to track");
            }
            return false;
        }
        let generation = model.generation();
        drop(model);

        info!("Tracking progress of {} files", ids.len());

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_polling(
            self.client.clone(),
            self.model.clone(),
            self.observer.clone(),
            ids,
            generation,
            self.poll_interval,
            cancel.clone(),
        ));
        *session = Some(PollingSession {
            cancel,
            handle: Some(handle),
        });
        true
    }

    /// Cancels polling. A polling tracker goes back to `Idle`; `Complete` and `Failed`
    /// are kept. Safe to call any number of times.
    pub async fn stop_tracking(&self) {
        let mut session = self.session.lock().await;
        cancel_session(session.take());
        let transition = self.model.lock().await.apply(TrackerEvent::Stopped);
        if transition.is_change() {
            info!("Tracking stopped");
        }
    }

    pub async fn status(&self) -> TrackerStatus {
        self.model.lock().await.status().clone()
    }

    pub async fn view(&self) -> ProgressView {
        derive_view(&self.model.lock().await.status().snapshot)
    }

    /// Waits until the current session ends by completion, failure, or cancellation.
    /// Returns immediately if no session is running.
    pub async fn wait(&self) -> TrackerStatus {
        let handle = self.session.lock().await.as_mut().and_then(|s| s.handle.take());
        if let Some(handle) = handle {
            let _ = handle.await.warn_error("Progress polling task ended abnormally");
        }
        self.status().await
    }
}

impl Drop for UploadProgressTracker {
    fn drop(&mut self) {
        cancel_session(self.session.get_mut().take());
    }
}

fn cancel_session(session: Option<PollingSession>) {
    if let Some(session) = session {
        session.cancel.cancel();
    }
}

async fn run_polling(
    client: Arc<dyn ProgressClient>,
    model: Arc<Mutex<TrackerModel>>,
    observer: Arc<dyn TrackingObserver>,
    ids: Vec<FileId>,
    generation: u64,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    // The first tick completes immediately.
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {},
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = client.query_progress(&ids) => result,
        };

        let event = match result {
            Ok(snapshot) => {
                debug!("Progress query returned {} of {} files", snapshot.len(), ids.len());
                TrackerEvent::QuerySucceeded(snapshot)
            },
            Err(e) => TrackerEvent::QueryFailed(e.to_string()),
        };

        let (transition, status) = {
            let mut model = model.lock().await;
            if cancel.is_cancelled() {
                break;
            }
            let Some(transition) = model.apply_for_session(generation, event) else {
                break;
            };
            (transition, model.status().clone())
        };

        observer.on_snapshot(&status).await;

        if transition.completed() {
            info!("All {} tracked files are ready", status.snapshot.len());
            observer.on_complete(&status.snapshot).await;
        } else if transition.failed() {
            let message = status.error.as_deref().unwrap_or_default();
            warn!("Progress tracking failed: {message}");
            observer.on_failure(message).await;
        }

        if status.state != TrackerState::Polling {
            break;
        }
    }

    debug!("Polling session {generation} finished");
}
