//! Batch roster builder.
//!
//! Candidates are resolved in fixed-size waves: inside a wave every user's
//! profile, role assignment and last record are fetched concurrently, and a
//! short pause separates consecutive waves to bound backend load. Failures
//! are isolated per user.

use crate::api::{ApiError, AttendanceApi};
use crate::models::{AttendanceRecord, UserId, VolunteerEntry};
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

impl RosterSettings {
    pub fn new(batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }
}

pub struct RosterBuilder<'a> {
    api: &'a dyn AttendanceApi,
    settings: RosterSettings,
}

/// Data fetched once per build and shared by every wave.
#[derive(Default)]
struct Prefetched {
    fallback_records: HashMap<UserId, AttendanceRecord>,
    hours: HashMap<UserId, i64>,
}

impl<'a> RosterBuilder<'a> {
    pub fn new(api: &'a dyn AttendanceApi, settings: RosterSettings) -> Self {
        Self { api, settings }
    }

    /// Resolve `candidates` into eligible roster rows, in candidate order.
    pub async fn build(&self, candidates: &[UserId]) -> Vec<VolunteerEntry> {
        let prefetched = self.prefetch().await;
        let batch_size = self.settings.batch_size.max(1);
        let mut roster = Vec::with_capacity(candidates.len());

        for (wave, batch) in candidates.chunks(batch_size).enumerate() {
            if wave > 0 && !self.settings.batch_delay.is_zero() {
                tokio::time::sleep(self.settings.batch_delay).await;
            }
            debug!(wave, size = batch.len(), "resolving roster wave");

            let resolved = join_all(batch.iter().map(|&id| self.resolve(id, &prefetched))).await;
            roster.extend(resolved.into_iter().flatten());
        }

        info!(
            candidates = candidates.len(),
            eligible = roster.len(),
            "roster built"
        );
        roster
    }

    async fn prefetch(&self) -> Prefetched {
        let (records, hours) = tokio::join!(
            self.api.fetch_recent_records(),
            self.api.fetch_hours_summary()
        );

        let mut fallback_records: HashMap<UserId, AttendanceRecord> = HashMap::new();
        match records {
            Ok(rows) => {
                for rec in rows {
                    match fallback_records.get(&rec.user_id) {
                        Some(existing) if !rec.is_newer_than(existing) => {}
                        _ => {
                            fallback_records.insert(rec.user_id, rec);
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "recent records unavailable, no fallback for this build"),
        }

        let hours = hours.unwrap_or_else(|e| {
            warn!(error = %e, "hours summary unavailable, totals default to zero");
            HashMap::new()
        });

        Prefetched {
            fallback_records,
            hours,
        }
    }

    async fn resolve(&self, user_id: UserId, prefetched: &Prefetched) -> Option<VolunteerEntry> {
        let (profile, roles, record) = tokio::join!(
            self.api.fetch_profile(user_id),
            self.api.fetch_role_assignment(user_id),
            self.api.fetch_last_record(user_id)
        );

        let profile = match profile {
            Ok(p) => p,
            Err(e) => {
                warn!(user_id, error = %e, "profile fetch failed, user dropped from roster");
                return None;
            }
        };

        let role = match roles.map(|r| r.eligible_role()) {
            Ok(Some(role)) => role,
            Ok(None) => {
                debug!(user_id, "no eligible role, user excluded");
                return None;
            }
            Err(e) => {
                warn!(user_id, error = %e, "role lookup failed, user dropped from roster");
                return None;
            }
        };

        let fallback = prefetched.fallback_records.get(&user_id);
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log_record_fallback(user_id, &e, fallback.is_some());
                fallback.cloned()
            }
        };
        // A listing row from another user never describes this one.
        let record = record.filter(|r| r.user_id == user_id);

        let total = prefetched.hours.get(&user_id).copied().unwrap_or(0);
        Some(VolunteerEntry::from_record(
            user_id,
            profile.display_name(),
            role,
            total,
            record.as_ref(),
        ))
    }
}

fn log_record_fallback(user_id: UserId, err: &ApiError, has_fallback: bool) {
    if has_fallback {
        warn!(user_id, error = %err, "last record fetch failed, using listed record");
    } else {
        warn!(user_id, error = %err, "last record fetch failed, treating as not checked in");
    }
}
