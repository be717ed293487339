//! Per-user operation guard.
//!
//! At most one check-in or check-out runs per user at any instant. A second
//! request for a busy user, of either kind, is refused without running its
//! action. The in-flight future is kept under its `"{kind}-{user}"` key so
//! other callers can await the same outcome through [`OperationGuard::join`].

use crate::models::{OperationKind, UserId};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

/// Refusal returned when the user already has an operation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InProgress {
    pub user_id: UserId,
    pub kind: OperationKind,
}

struct GuardState<T> {
    // user → ticket of the operation holding the lock
    locked: HashMap<UserId, u64>,
    pending: HashMap<String, (u64, Shared<BoxFuture<'static, T>>)>,
    next_ticket: u64,
}

pub struct OperationGuard<T: Clone> {
    state: Mutex<GuardState<T>>,
}

impl<T> Default for OperationGuard<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the lock and the pending entry however the operation ends,
/// including a panic inside the action or the caller dropping the future.
struct Release<'a, T: Clone> {
    guard: &'a OperationGuard<T>,
    user_id: UserId,
    key: String,
    ticket: u64,
}

impl<T: Clone> Drop for Release<'_, T> {
    fn drop(&mut self) {
        let mut state = self.guard.state.lock();
        // A teardown may have cleared the maps and a newer operation may own them now.
        if state.pending.get(&self.key).is_some_and(|(t, _)| *t == self.ticket) {
            state.pending.remove(&self.key);
        }
        if state.locked.get(&self.user_id) == Some(&self.ticket) {
            state.locked.remove(&self.user_id);
        }
    }
}

impl<T> OperationGuard<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GuardState {
                locked: HashMap::new(),
                pending: HashMap::new(),
                next_ticket: 0,
            }),
        }
    }

    /// Run `action` exclusively for `user_id`, or refuse if the user is busy.
    pub async fn perform<F, Fut>(
        &self,
        user_id: UserId,
        kind: OperationKind,
        action: F,
    ) -> Result<T, InProgress>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let key = kind.key(user_id);
        let ticket = {
            let mut state = self.state.lock();
            if state.locked.contains_key(&user_id) || state.pending.contains_key(&key) {
                debug!(user_id, %kind, "operation refused: user busy");
                return Err(InProgress { user_id, kind });
            }
            state.next_ticket += 1;
            let ticket = state.next_ticket;
            state.locked.insert(user_id, ticket);
            ticket
        };
        let _release = Release {
            guard: self,
            user_id,
            key: key.clone(),
            ticket,
        };

        let shared = action().boxed().shared();
        self.state
            .lock()
            .pending
            .insert(key, (ticket, shared.clone()));
        Ok(shared.await)
    }

    /// Await the outcome of an in-flight operation, if there is one.
    pub async fn join(&self, user_id: UserId, kind: OperationKind) -> Option<T> {
        let pending = self
            .state
            .lock()
            .pending
            .get(&kind.key(user_id))
            .map(|(_, fut)| fut.clone());
        match pending {
            Some(fut) => Some(fut.await),
            None => None,
        }
    }

    pub fn is_locked(&self, user_id: UserId) -> bool {
        self.state.lock().locked.contains_key(&user_id)
    }

    pub fn has_pending(&self, user_id: UserId, kind: OperationKind) -> bool {
        self.state.lock().pending.contains_key(&kind.key(user_id))
    }

    pub fn locked_count(&self) -> usize {
        self.state.lock().locked.len()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Forget every lock and pending entry (screen teardown).
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.locked.clear();
        state.pending.clear();
    }
}
