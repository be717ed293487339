//! Attendance session: reconciliation engine for one roster screen.
//!
//! The session owns the roster rows, the record cache and the operation
//! guard. Every status transition goes through [`AttendanceSession::check_in`],
//! [`AttendanceSession::check_out`] or [`AttendanceSession::expand`]; nothing
//! else writes a row's status.

use super::clock::Clock;
use super::guard::OperationGuard;
use super::record_store::RecordStore;
use super::recovery::{classify, unconfirmed_conflict};
use super::roster::{RosterBuilder, RosterSettings};
use super::scope::RosterScope;
use crate::api::{ApiError, AttendanceApi, ConflictCode};
use crate::errors::AttendanceError;
use crate::models::{
    AttendanceRecord, CheckInStatus, OperationKind, Operator, Timestamp, UserId, VolunteerEntry,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Successful end of a check-in/check-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted the operation.
    Completed(CheckInStatus),
    /// The backend already had an open session; local state now mirrors it.
    Synchronized { started_at: Option<Timestamp> },
    /// The submission failed but the backend record showed the state had
    /// already changed; local state adopted it.
    Healed(CheckInStatus),
}

impl Outcome {
    pub fn status(&self) -> CheckInStatus {
        match self {
            Outcome::Completed(s) | Outcome::Healed(s) => *s,
            Outcome::Synchronized { .. } => CheckInStatus::CheckedIn,
        }
    }

    pub fn notice(&self) -> &'static str {
        match self {
            Outcome::Completed(CheckInStatus::CheckedIn) => "Checked in.",
            Outcome::Completed(CheckInStatus::NotCheckedIn) => "Checked out.",
            Outcome::Synchronized { .. } => {
                "State synchronized: the volunteer was already checked in and can now check out."
            }
            Outcome::Healed(_) => "State synchronized with the attendance service.",
        }
    }
}

/// Result of the on-demand resync done when a roster row is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResyncOutcome {
    /// A record was already cached this session; nothing fetched.
    Cached,
    /// Displayed status matched the backend.
    InSync,
    /// Displayed status was wrong and has been corrected.
    Corrected {
        from: CheckInStatus,
        to: CheckInStatus,
    },
    /// An operation is in flight for the user; resync skipped.
    Deferred,
    /// The backend could not be read; displayed status kept.
    Unavailable,
}

type OperationResult = Result<Outcome, AttendanceError>;

struct SessionInner {
    api: Arc<dyn AttendanceApi>,
    clock: Arc<dyn Clock>,
    operator: Operator,
    settings: RosterSettings,
    records: RecordStore,
    guard: OperationGuard<OperationResult>,
    roster: Mutex<Vec<VolunteerEntry>>,
}

/// One screen session. Clones share the same state.
#[derive(Clone)]
pub struct AttendanceSession {
    inner: Arc<SessionInner>,
}

impl AttendanceSession {
    pub fn new(
        api: Arc<dyn AttendanceApi>,
        clock: Arc<dyn Clock>,
        operator: Operator,
        settings: RosterSettings,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                clock,
                operator,
                settings,
                records: RecordStore::new(),
                guard: OperationGuard::new(),
                roster: Mutex::new(Vec::new()),
            }),
        }
    }

    // ------------------------------------------------
    // Roster
    // ------------------------------------------------

    /// Build the roster for `candidates` and replace the current one.
    pub async fn load_roster(&self, candidates: &[UserId]) -> usize {
        let built = RosterBuilder::new(self.inner.api.as_ref(), self.inner.settings)
            .build(candidates)
            .await;
        let count = built.len();
        *self.inner.roster.lock() = built;
        count
    }

    /// List users, keep those inside `scope`, then build the roster.
    pub async fn load_scoped_roster(&self, scope: RosterScope) -> Result<usize, ApiError> {
        let users = self.inner.api.list_users().await?;
        let candidates = scope.select(&users);
        Ok(self.load_roster(&candidates).await)
    }

    pub fn roster(&self) -> Vec<VolunteerEntry> {
        self.inner.roster.lock().clone()
    }

    pub fn entry(&self, user_id: UserId) -> Option<VolunteerEntry> {
        self.inner
            .roster
            .lock()
            .iter()
            .find(|e| e.user_id() == user_id)
            .cloned()
    }

    pub fn now(&self) -> Timestamp {
        self.inner.clock.now()
    }

    // ------------------------------------------------
    // Guarded operations
    // ------------------------------------------------

    pub async fn check_in(&self, user_id: UserId) -> OperationResult {
        self.perform(user_id, OperationKind::CheckIn).await
    }

    pub async fn check_out(&self, user_id: UserId) -> OperationResult {
        self.perform(user_id, OperationKind::CheckOut).await
    }

    /// Await the outcome of an operation already in flight for `user_id`.
    pub async fn join_pending(&self, user_id: UserId, kind: OperationKind) -> Option<OperationResult> {
        self.inner.guard.join(user_id, kind).await
    }

    pub fn is_busy(&self, user_id: UserId) -> bool {
        self.inner.guard.is_locked(user_id)
    }

    /// Number of users with an operation in flight and number of pending entries.
    pub fn in_flight(&self) -> (usize, usize) {
        (
            self.inner.guard.locked_count(),
            self.inner.guard.pending_count(),
        )
    }

    async fn perform(&self, user_id: UserId, kind: OperationKind) -> OperationResult {
        let inner = Arc::clone(&self.inner);
        let outcome = self
            .inner
            .guard
            .perform(user_id, kind, move || inner.run(user_id, kind))
            .await
            .unwrap_or_else(|busy| {
                Err(AttendanceError::OperationInProgress {
                    user_id: busy.user_id,
                    kind: busy.kind,
                })
            });

        match &outcome {
            Ok(done) => info!(user_id, %kind, ?done, "attendance operation finished"),
            Err(e) if e.is_silent() => debug!(user_id, %kind, error = %e, "operation absorbed"),
            Err(e) => warn!(user_id, %kind, error = %e, "attendance operation failed"),
        }
        outcome
    }

    // ------------------------------------------------
    // On-demand resync
    // ------------------------------------------------

    /// Compare a row against the backend the first time it is expanded this session.
    pub async fn expand(&self, user_id: UserId) -> Result<ResyncOutcome, AttendanceError> {
        let displayed = self
            .entry(user_id)
            .ok_or(AttendanceError::UnknownVolunteer(user_id))?
            .status();

        if self.inner.records.contains(user_id) {
            debug!(user_id, "record cached, expand resync skipped");
            return Ok(ResyncOutcome::Cached);
        }
        if self.is_busy(user_id) {
            debug!(user_id, "operation in flight, expand resync deferred");
            return Ok(ResyncOutcome::Deferred);
        }

        let record = match self
            .inner
            .records
            .last_record(self.inner.api.as_ref(), user_id)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                warn!(user_id, error = %e, "expand resync fetch failed, keeping displayed state");
                return Ok(ResyncOutcome::Unavailable);
            }
        };

        let backend = AttendanceRecord::status_of(record.as_ref());
        if backend == displayed {
            return Ok(ResyncOutcome::InSync);
        }
        // An operation may have started while the fetch was suspended.
        if self.is_busy(user_id) {
            return Ok(ResyncOutcome::Deferred);
        }

        warn!(user_id, %displayed, %backend, "displayed status disagrees with backend, correcting");
        self.inner.adopt(user_id, record.as_ref());
        Ok(ResyncOutcome::Corrected {
            from: displayed,
            to: backend,
        })
    }

    /// Drop every roster row, cached record, lock and pending entry.
    pub fn teardown(&self) {
        self.inner.roster.lock().clear();
        self.inner.records.clear();
        self.inner.guard.clear();
        debug!("attendance session torn down");
    }

    pub fn cached_record(&self, user_id: UserId) -> Option<Option<AttendanceRecord>> {
        self.inner.records.cached(user_id)
    }
}

impl SessionInner {
    async fn run(self: Arc<Self>, user_id: UserId, kind: OperationKind) -> OperationResult {
        let current = self
            .status_of(user_id)
            .ok_or(AttendanceError::UnknownVolunteer(user_id))?;
        if current != kind.required_status() {
            return Err(AttendanceError::InvalidStateTransition {
                user_id,
                kind,
                status: current,
            });
        }

        let submitted = match kind {
            OperationKind::CheckIn => self.api.submit_check_in(user_id, &self.operator).await,
            OperationKind::CheckOut => self.api.submit_check_out(user_id, &self.operator).await,
        };

        match submitted {
            Ok(()) => {
                let now = self.clock.now();
                self.update(user_id, |e| match kind {
                    OperationKind::CheckIn => e.apply_check_in(now),
                    OperationKind::CheckOut => e.apply_check_out(now),
                });
                self.records.invalidate(user_id);
                Ok(Outcome::Completed(kind.resulting_status()))
            }
            Err(err)
                if kind == OperationKind::CheckIn
                    && err.conflict() == Some(ConflictCode::OpenSessionExists) =>
            {
                self.recover_open_session(user_id, err).await
            }
            Err(err) => self.recover_failure(user_id, kind, err).await,
        }
    }

    /// Check-in refused because an open session exists: confirm and adopt it.
    async fn recover_open_session(&self, user_id: UserId, err: ApiError) -> OperationResult {
        warn!(user_id, error = %err, "open session conflict, re-reading backend record");

        match self.records.refresh(self.api.as_ref(), user_id).await {
            Ok(Some(record)) if record.is_open() => {
                self.adopt(user_id, Some(&record));
                info!(user_id, started_at = ?record.start_time, "local state synchronized to open session");
                Ok(Outcome::Synchronized {
                    started_at: record.start_time,
                })
            }
            Ok(_) => Err(unconfirmed_conflict(&err)),
            Err(fetch_err) => {
                warn!(user_id, error = %fetch_err, "conflict re-fetch failed");
                Err(unconfirmed_conflict(&err))
            }
        }
    }

    /// Any other failure: adopt the backend record if it shows the state
    /// already moved, otherwise classify the error.
    async fn recover_failure(
        &self,
        user_id: UserId,
        kind: OperationKind,
        err: ApiError,
    ) -> OperationResult {
        let assumed = kind.required_status();
        match self.records.refresh(self.api.as_ref(), user_id).await {
            Ok(record) => {
                let backend = AttendanceRecord::status_of(record.as_ref());
                if backend != assumed {
                    warn!(user_id, %kind, error = %err, %backend, "submission failed but backend moved on, adopting");
                    self.adopt(user_id, record.as_ref());
                    return Ok(Outcome::Healed(backend));
                }
            }
            Err(fetch_err) => {
                warn!(user_id, error = %fetch_err, "recovery re-fetch failed");
            }
        }
        Err(classify(&err))
    }

    fn status_of(&self, user_id: UserId) -> Option<CheckInStatus> {
        self.roster
            .lock()
            .iter()
            .find(|e| e.user_id() == user_id)
            .map(VolunteerEntry::status)
    }

    fn update(&self, user_id: UserId, f: impl FnOnce(&mut VolunteerEntry)) {
        if let Some(entry) = self
            .roster
            .lock()
            .iter_mut()
            .find(|e| e.user_id() == user_id)
        {
            f(entry);
        }
    }

    fn adopt(&self, user_id: UserId, record: Option<&AttendanceRecord>) {
        self.update(user_id, |e| {
            e.adopt_record(record);
        });
    }
}
