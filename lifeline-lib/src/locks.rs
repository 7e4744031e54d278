//! Per-entity serialization of read-modify-write sequences.
//!
//! Approval transitions and campaign contributions load a record, change it
//! and write it back. Holding the entity's lock across that sequence
//! prevents lost updates between concurrent callers touching the same
//! record, while different records proceed in parallel.

use crate::EntityId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of async locks keyed by entity id.
#[derive(Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<EntityId, Arc<AsyncMutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    ///
    /// Dropping the guard (including by cancelling the waiting future)
    /// releases the entity.
    pub async fn lock(&self, id: EntityId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Drop entries nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of entities with a live lock entry.
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
