use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        })
    }
}

/// idle → pending → success | failure, then pending again on the next submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Failure(String),
}

/// Lifecycle of one kind of write. Only one submission of a kind may be
/// pending at a time.
#[derive(Debug)]
pub struct MutationTracker {
    kind: MutationKind,
    status: Mutex<MutationStatus>,
}

impl MutationTracker {
    pub fn new(kind: MutationKind) -> Self {
        Self {
            kind,
            status: Mutex::new(MutationStatus::Idle),
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn status(&self) -> MutationStatus {
        self.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        *self.lock() == MutationStatus::Pending
    }

    /// `None` while another submission of this kind is still pending.
    pub fn begin(&self) -> Option<PendingMutation<'_>> {
        let mut status = self.lock();
        if *status == MutationStatus::Pending {
            debug!(kind = %self.kind, "rejecting submit while pending");
            return None;
        }
        *status = MutationStatus::Pending;
        Some(PendingMutation {
            tracker: self,
            settled: false,
        })
    }

    fn settle(&self, outcome: MutationStatus) {
        debug!(kind = %self.kind, ?outcome, "mutation settled");
        *self.lock() = outcome;
    }

    fn lock(&self) -> MutexGuard<'_, MutationStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held for the duration of one write. Dropping it unsettled records a failure.
#[must_use = "a pending mutation must be settled"]
pub struct PendingMutation<'a> {
    tracker: &'a MutationTracker,
    settled: bool,
}

impl PendingMutation<'_> {
    pub fn succeed(mut self) {
        self.settled = true;
        self.tracker.settle(MutationStatus::Success);
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.settled = true;
        self.tracker.settle(MutationStatus::Failure(message.into()));
    }
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.tracker
                .settle(MutationStatus::Failure("request was abandoned".into()));
        }
    }
}
