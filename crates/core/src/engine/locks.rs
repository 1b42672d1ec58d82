use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::types::DbId;

/// Per-(asset, UTC day) async locks serialising read-merge-replace cycles.
///
/// Entries nobody holds or waits on are pruned on every acquisition.
#[derive(Default)]
pub struct DayLocks {
    locks: Mutex<HashMap<(DbId, NaiveDate), Arc<AsyncMutex<()>>>>,
}

impl DayLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, asset_id: DbId, day: NaiveDate) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry((asset_id, day)).or_default())
        };
        lock.lock_owned().await
    }

    /// Acquire several keys in a fixed order so overlapping batches cannot
    /// deadlock.
    pub async fn acquire_all(
        &self,
        keys: impl IntoIterator<Item = (DbId, NaiveDate)>,
    ) -> Vec<OwnedMutexGuard<()>> {
        let mut keys: Vec<_> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for (asset_id, day) in keys {
            guards.push(self.acquire(asset_id, day).await);
        }
        guards
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
