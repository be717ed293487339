#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use vattend::api::{ApiError, ApiResult, AttendanceApi, ConflictCode};
use vattend::core::{AttendanceSession, Clock, ManualClock, RosterSettings};
use vattend::models::{
    AttendanceRecord, Operator, Profile, RoleAssignment, UserId, UserSummary,
};

pub fn vat() -> Command {
    cargo_bin_cmd!("vattend")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_vattend.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a DB and register one eligible volunteer (id 1, dept 10).
pub fn init_db_with_volunteer(db_path: &str) {
    vat()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    vat()
        .args([
            "--db",
            db_path,
            "user",
            "add",
            "1",
            "--name",
            "alice",
            "--legal-name",
            "Alice Doe",
            "--dept",
            "10",
            "--role",
            "staff",
        ])
        .assert()
        .success();
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(at(9, 0)))
}

pub fn operator() -> Operator {
    Operator::new(900, "desk")
}

/// Session over `api` with no pause between roster waves.
pub fn session(api: &Arc<FakeApi>, clock: &Arc<ManualClock>) -> AttendanceSession {
    AttendanceSession::new(
        api.clone(),
        clock.clone(),
        operator(),
        RosterSettings::new(3, Duration::ZERO),
    )
}

// ------------------------------------------------
// In-memory attendance backend
// ------------------------------------------------

#[derive(Default)]
struct FakeState {
    users: HashMap<UserId, (Profile, RoleAssignment)>,
    order: Vec<UserId>,
    records: HashMap<UserId, Vec<AttendanceRecord>>,
    next_id: i64,
    submit_error: Option<ApiError>,
    apply_before_error: bool,
    panic_on_submit: bool,
    last_record_error: Option<ApiError>,
    failing_profiles: HashSet<UserId>,
    failing_roles: HashSet<UserId>,
    failing_last_record: HashSet<UserId>,
    recent: Option<ApiResult<Vec<AttendanceRecord>>>,
    hours: HashMap<UserId, i64>,
    misrouted: HashMap<UserId, UserId>,
}

/// Backend double with call counters, an optional submit gate and
/// injectable failures. Submissions follow the same open-session rules
/// as the SQLite authority.
pub struct FakeApi {
    clock: Arc<ManualClock>,
    state: Mutex<FakeState>,
    gate: Option<Arc<Semaphore>>,
    latency: Duration,
    submits: AtomicUsize,
    submits_started: AtomicUsize,
    last_record_fetches: AtomicUsize,
    profile_fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    profile_starts: Mutex<Vec<(UserId, Instant)>>,
}

impl FakeApi {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            state: Mutex::new(FakeState {
                next_id: 1,
                ..FakeState::default()
            }),
            gate: None,
            latency: Duration::ZERO,
            submits: AtomicUsize::new(0),
            submits_started: AtomicUsize::new(0),
            last_record_fetches: AtomicUsize::new(0),
            profile_fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            profile_starts: Mutex::new(Vec::new()),
        }
    }

    /// Submissions wait for a permit on the returned semaphore.
    pub fn gated(clock: Arc<ManualClock>) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut api = Self::new(clock);
        api.gate = Some(gate.clone());
        (api, gate)
    }

    /// Every per-user lookup takes `latency` of (tokio) time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn add_user(&self, id: UserId, dept: Option<i64>, admin: bool, roles: &[&str]) {
        let profile = Profile {
            user_id: id,
            user_name: format!("user{}", id),
            legal_name: Some(format!("Volunteer {}", id)),
            nick_name: None,
            dept_id: dept,
        };
        let assignment = RoleAssignment::new(admin, roles.iter().map(|r| r.to_string()).collect());
        let mut state = self.state.lock();
        if state.users.insert(id, (profile, assignment)).is_none() {
            state.order.push(id);
        }
    }

    pub fn add_volunteer(&self, id: UserId) {
        self.add_user(id, Some(10), false, &["staff"]);
    }

    /// Open a session directly in the backend, bypassing the engine.
    pub fn open_session(&self, id: UserId, start: NaiveDateTime) {
        let mut state = self.state.lock();
        let rid = state.next_id;
        state.next_id += 1;
        state
            .records
            .entry(id)
            .or_default()
            .push(AttendanceRecord::new(rid, id, Some(start), None));
    }

    pub fn close_session(&self, id: UserId, end: NaiveDateTime) {
        let mut state = self.state.lock();
        if let Some(last) = state.records.get_mut(&id).and_then(|r| r.last_mut()) {
            last.end_time = Some(end);
        }
    }

    pub fn backend_record(&self, id: UserId) -> Option<AttendanceRecord> {
        self.state.lock().records.get(&id).and_then(|r| r.last().cloned())
    }

    pub fn fail_submits(&self, err: Option<ApiError>) {
        let mut state = self.state.lock();
        state.submit_error = err;
        state.apply_before_error = false;
    }

    /// The backend applies the change, then the response is lost.
    pub fn apply_then_fail(&self, err: ApiError) {
        let mut state = self.state.lock();
        state.submit_error = Some(err);
        state.apply_before_error = true;
    }

    pub fn panic_on_submit(&self, on: bool) {
        self.state.lock().panic_on_submit = on;
    }

    pub fn fail_last_record_reads(&self, err: Option<ApiError>) {
        self.state.lock().last_record_error = err;
    }

    pub fn fail_profile(&self, id: UserId) {
        self.state.lock().failing_profiles.insert(id);
    }

    pub fn fail_roles(&self, id: UserId) {
        self.state.lock().failing_roles.insert(id);
    }

    pub fn fail_last_record(&self, id: UserId) {
        self.state.lock().failing_last_record.insert(id);
    }

    /// Last-record lookups for `from` answer with `to`'s record.
    pub fn misroute_last_record(&self, from: UserId, to: UserId) {
        self.state.lock().misrouted.insert(from, to);
    }

    pub fn set_recent(&self, recent: ApiResult<Vec<AttendanceRecord>>) {
        self.state.lock().recent = Some(recent);
    }

    pub fn set_hours(&self, id: UserId, minutes: i64) {
        self.state.lock().hours.insert(id, minutes);
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn submits_started(&self) -> usize {
        self.submits_started.load(Ordering::SeqCst)
    }

    pub fn last_record_fetches(&self) -> usize {
        self.last_record_fetches.load(Ordering::SeqCst)
    }

    pub fn profile_fetches(&self) -> usize {
        self.profile_fetches.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn profile_starts(&self) -> Vec<(UserId, Instant)> {
        self.profile_starts.lock().clone()
    }

    /// Wait until `n` submissions have reached the backend.
    pub async fn wait_for_submits(&self, n: usize) {
        while self.submits_started() < n {
            tokio::task::yield_now().await;
        }
    }

    async fn lookup_delay(&self) {
        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn submit(&self, id: UserId, check_in: bool) -> ApiResult<()> {
        self.submits_started.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| ApiError::Network("gate closed".into()))?;
            permit.forget();
        }
        self.submits.fetch_add(1, Ordering::SeqCst);

        let now = self.clock.now();
        let mut state = self.state.lock();
        if state.panic_on_submit {
            drop(state);
            panic!("backend exploded");
        }
        if let Some(err) = state.submit_error.clone()
            && !state.apply_before_error
        {
            return Err(err);
        }
        if !state.users.contains_key(&id) {
            return Err(ApiError::NotFound(id));
        }

        let open = state
            .records
            .get(&id)
            .and_then(|r| r.last())
            .is_some_and(AttendanceRecord::is_open);
        let applied = if check_in {
            if open {
                Err(ApiError::rejected(
                    409,
                    Some(ConflictCode::OpenSessionExists),
                    "open session exists",
                ))
            } else {
                let rid = state.next_id;
                state.next_id += 1;
                state
                    .records
                    .entry(id)
                    .or_default()
                    .push(AttendanceRecord::new(rid, id, Some(now), None));
                Ok(())
            }
        } else if let Some(last) = state.records.get_mut(&id).and_then(|r| r.last_mut())
            && last.is_open()
        {
            last.end_time = Some(now);
            Ok(())
        } else {
            Err(ApiError::rejected(
                409,
                Some(ConflictCode::NoOpenSession),
                "no open session",
            ))
        };

        match state.submit_error.clone() {
            Some(err) => Err(err),
            None => applied,
        }
    }
}

#[async_trait]
impl AttendanceApi for FakeApi {
    async fn fetch_last_record(&self, user_id: UserId) -> ApiResult<Option<AttendanceRecord>> {
        self.last_record_fetches.fetch_add(1, Ordering::SeqCst);
        self.lookup_delay().await;
        let state = self.state.lock();
        if let Some(err) = &state.last_record_error {
            return Err(err.clone());
        }
        if state.failing_last_record.contains(&user_id) {
            return Err(ApiError::Timeout);
        }
        let owner = state.misrouted.get(&user_id).copied().unwrap_or(user_id);
        Ok(state.records.get(&owner).and_then(|r| r.last().cloned()))
    }

    async fn submit_check_in(&self, user_id: UserId, _operator: &Operator) -> ApiResult<()> {
        self.submit(user_id, true).await
    }

    async fn submit_check_out(&self, user_id: UserId, _operator: &Operator) -> ApiResult<()> {
        self.submit(user_id, false).await
    }

    async fn fetch_profile(&self, user_id: UserId) -> ApiResult<Profile> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        self.profile_starts.lock().push((user_id, Instant::now()));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        self.lookup_delay().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let state = self.state.lock();
        if state.failing_profiles.contains(&user_id) {
            return Err(ApiError::Network("profile service down".into()));
        }
        state
            .users
            .get(&user_id)
            .map(|(p, _)| p.clone())
            .ok_or(ApiError::NotFound(user_id))
    }

    async fn fetch_role_assignment(&self, user_id: UserId) -> ApiResult<RoleAssignment> {
        let state = self.state.lock();
        if state.failing_roles.contains(&user_id) {
            return Err(ApiError::Timeout);
        }
        state
            .users
            .get(&user_id)
            .map(|(_, r)| r.clone())
            .ok_or(ApiError::NotFound(user_id))
    }

    async fn list_users(&self) -> ApiResult<Vec<UserSummary>> {
        let state = self.state.lock();
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(|(p, _)| UserSummary {
                user_id: p.user_id,
                user_name: p.user_name.clone(),
                dept_id: p.dept_id,
            })
            .collect())
    }

    async fn fetch_recent_records(&self) -> ApiResult<Vec<AttendanceRecord>> {
        self.state.lock().recent.clone().unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_hours_summary(&self) -> ApiResult<HashMap<UserId, i64>> {
        Ok(self.state.lock().hours.clone())
    }
}
