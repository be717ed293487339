use crate::api::{ApiResult, AttendanceApi};
use crate::models::{AttendanceRecord, UserId};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Per-user cache of the last authoritative record, filled lazily.
///
/// A cached `None` is a real entry: the backend answered that the user has
/// no record yet. Concurrent lookups for an uncached user may both fetch;
/// fetches are idempotent reads and the later answer simply wins.
#[derive(Debug, Default)]
pub struct RecordStore {
    cache: Mutex<HashMap<UserId, Option<AttendanceRecord>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached record, or fetch it once and remember the answer.
    pub async fn last_record(
        &self,
        api: &dyn AttendanceApi,
        user_id: UserId,
    ) -> ApiResult<Option<AttendanceRecord>> {
        if let Some(hit) = self.cached(user_id) {
            debug!(user_id, "record cache hit");
            return Ok(hit);
        }
        self.refresh(api, user_id).await
    }

    /// Always read fresh truth from the backend and replace the cache entry.
    pub async fn refresh(
        &self,
        api: &dyn AttendanceApi,
        user_id: UserId,
    ) -> ApiResult<Option<AttendanceRecord>> {
        let record = api.fetch_last_record(user_id).await?.filter(|r| {
            if r.user_id != user_id {
                warn!(user_id, record_user = r.user_id, "backend returned another user's record, ignored");
            }
            r.user_id == user_id
        });
        self.cache.lock().insert(user_id, record.clone());
        Ok(record)
    }

    pub fn cached(&self, user_id: UserId) -> Option<Option<AttendanceRecord>> {
        self.cache.lock().get(&user_id).cloned()
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.cache.lock().contains_key(&user_id)
    }

    /// Drop the entry so the next lookup re-reads the backend.
    pub fn invalidate(&self, user_id: UserId) {
        if self.cache.lock().remove(&user_id).is_some() {
            debug!(user_id, "record cache invalidated");
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}
