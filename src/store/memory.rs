//! Lock-guarded in-memory user map.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::types::User;
use crate::metrics;

/// Process-wide user store.
///
/// Every operation holds the same exclusive lock for its whole duration, so
/// operations are linearizable and `get_all` never sees a half-applied
/// write. Reads take the lock too; there is no reader/writer split.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Mutex<HashMap<String, User>>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the record at `user.id`.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn put(&self, user: User) -> User {
        let _timer = metrics::timer_store_operation();
        let mut users = self.users.lock().await;

        let replaced = users.insert(user.id.clone(), user.clone()).is_some();
        metrics::set_users_stored(users.len());
        debug!(replaced, "stored user");

        user
    }

    /// Snapshot of every record, in no particular order.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<User> {
        let _timer = metrics::timer_store_operation();
        let users = self.users.lock().await;

        users.values().cloned().collect()
    }

    /// Look up a single record.
    #[instrument(skip(self))]
    pub async fn get_one(&self, id: &str) -> Option<User> {
        let _timer = metrics::timer_store_operation();
        let users = self.users.lock().await;

        users.get(id).cloned()
    }

    /// Overwrite the record at `id` only if one already exists.
    ///
    /// The existence check and the write happen under one lock acquisition.
    /// The stored record always carries `id`, whatever the payload said.
    /// Returns `None` without writing anything when `id` is unknown.
    #[instrument(skip(self, user))]
    pub async fn replace(&self, id: &str, mut user: User) -> Option<User> {
        let _timer = metrics::timer_store_operation();
        let mut users = self.users.lock().await;

        let slot = users.get_mut(id)?;
        user.id = id.to_string();
        *slot = user.clone();
        debug!("replaced user");

        Some(user)
    }

    /// Remove the record at `id`. Returns whether it was present.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> bool {
        let _timer = metrics::timer_store_operation();
        let mut users = self.users.lock().await;

        let found = users.remove(id).is_some();
        if found {
            metrics::set_users_stored(users.len());
            debug!("deleted user");
        }

        found
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}
