use crate::domain::account::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-account mutual exclusion for read-modify-write of balances.
///
/// Locks are always taken in ascending id order, so two movements touching
/// the same pair of accounts cannot deadlock.
#[derive(Default, Clone)]
pub struct AccountLocks {
    table: Arc<Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>>,
}

/// Held locks; dropping it releases every account.
pub struct LockSet {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, ids: &[AccountId]) -> LockSet {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            ids.iter()
                .map(|id| Arc::clone(table.entry(*id).or_default()))
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }
        LockSet { _guards: guards }
    }
}
