use upload_types::{FileId, ProgressSnapshot};

/// Lifecycle of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// Nothing tracked.
    #[default]
    Idle,
    /// Waiting for every tracked file to finish.
    Polling,
    /// Every file in the latest snapshot satisfied the completion predicate.
    Complete,
    /// A progress query failed; the last snapshot is frozen.
    Failed,
}

#[derive(Debug, Clone)]
pub enum TrackerEvent {
    Started(Vec<FileId>),
    QuerySucceeded(ProgressSnapshot),
    QueryFailed(String),
    Stopped,
}

/// The state transition function.
///
/// Query results only move a `Polling` tracker; in any other state they are stale and
/// ignored. Starting with no ids tears down a polling session and is otherwise a no-op.
pub fn next_state(current: TrackerState, event: &TrackerEvent) -> TrackerState {
    use TrackerState::*;

    match (current, event) {
        (Polling, TrackerEvent::Started(ids)) if ids.is_empty() => Idle,
        (_, TrackerEvent::Started(ids)) if ids.is_empty() => current,
        (_, TrackerEvent::Started(_)) => Polling,
        (Polling, TrackerEvent::QuerySucceeded(snapshot)) if snapshot.is_complete() => Complete,
        (Polling, TrackerEvent::QueryFailed(_)) => Failed,
        (Polling, TrackerEvent::Stopped) => Idle,
        (state, _) => state,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: TrackerState,
    pub to: TrackerState,
}

impl Transition {
    /// The session just reached `Complete`. Happens at most once per session.
    pub fn completed(&self) -> bool {
        self.from == TrackerState::Polling && self.to == TrackerState::Complete
    }

    pub fn failed(&self) -> bool {
        self.from == TrackerState::Polling && self.to == TrackerState::Failed
    }

    /// The polling loop must not issue another query.
    pub fn stops_polling(&self) -> bool {
        self.from == TrackerState::Polling && self.to != TrackerState::Polling
    }

    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

/// What consumers see: the state plus the data backing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerStatus {
    pub state: TrackerState,

    /// Ids of the current (or last) session, de-duplicated, in request order.
    pub file_ids: Vec<FileId>,

    /// The whole most recent successful response.
    pub snapshot: ProgressSnapshot,

    /// Message of the query failure that ended the session, if any.
    pub error: Option<String>,
}

impl TrackerStatus {
    pub fn is_polling(&self) -> bool {
        self.state == TrackerState::Polling
    }

    pub fn is_complete(&self) -> bool {
        self.state == TrackerState::Complete
    }

    pub fn is_failed(&self) -> bool {
        self.state == TrackerState::Failed
    }
}

/// Owned tracker state, updated only through [`TrackerModel::apply`].
///
/// Each session gets a new generation number so that results from a session that has
/// since been replaced or stopped can be told apart and dropped.
#[derive(Debug, Default)]
pub struct TrackerModel {
    status: TrackerStatus,
    generation: u64,
}

impl TrackerModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &TrackerStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn apply(&mut self, event: TrackerEvent) -> Transition {
        let from = self.status.state;
        let to = next_state(from, &event);

        match event {
            TrackerEvent::Started(ids) => {
                if !ids.is_empty() {
                    self.generation += 1;
                    self.status.file_ids = ids;
                    self.status.snapshot = ProgressSnapshot::new();
                    self.status.error = None;
                } else if from == TrackerState::Polling {
                    self.generation += 1;
                    self.status.file_ids.clear();
                }
            },
            TrackerEvent::QuerySucceeded(snapshot) => {
                if from == TrackerState::Polling {
                    // Replaced wholesale; entries missing from the response are dropped.
                    self.status.snapshot = snapshot;
                }
            },
            TrackerEvent::QueryFailed(message) => {
                if from == TrackerState::Polling {
                    self.status.error = Some(message);
                }
            },
            TrackerEvent::Stopped => {
                self.generation += 1;
            },
        }

        self.status.state = to;
        Transition { from, to }
    }

    /// Applies a query result only if it belongs to the current session.
    pub fn apply_for_session(&mut self, generation: u64, event: TrackerEvent) -> Option<Transition> {
        if generation != self.generation {
            return None;
        }
        Some(self.apply(event))
    }
}
