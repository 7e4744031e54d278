//! In-memory repository.
//!
//! Records are kept in insertion order, which makes `find_all` (and every
//! search built on it) deterministic for a fixed snapshot.
//!
//! # Thread Safety
//!
//! Uses a `RwLock`. Lock poisoning is reported as a storage error rather
//! than a panic.

use super::{Entity, Repository};
use crate::{LifelineError, Result};
use async_trait::async_trait;
use std::sync::RwLock;

/// Helper function to handle lock poisoning gracefully.
fn lock_error(kind: &str, context: &str) -> LifelineError {
    LifelineError::Storage(format!(
        "{} repository: lock poisoned during {}",
        kind, context
    ))
}

/// In-process repository for tests, demos and embedding hosts that keep
/// their own durable copy.
pub struct MemoryRepository<T: Entity> {
    records: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a repository pre-populated with `records`.
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|_| lock_error(T::KIND, "find_by_id"))?;
        Ok(records.iter().find(|r| r.id() == *id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|_| lock_error(T::KIND, "find_all"))?;
        Ok(records.clone())
    }

    async fn create(&self, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|_| lock_error(T::KIND, "create"))?;
        if records.iter().any(|r| r.id() == entity.id()) {
            return Err(LifelineError::Storage(format!(
                "{} {} already exists",
                T::KIND,
                entity.id()
            )));
        }
        records.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|_| lock_error(T::KIND, "update"))?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or_else(|| LifelineError::not_found(T::KIND, entity.id()))?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: &T::Id) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| lock_error(T::KIND, "delete"))?;
        let index = records
            .iter()
            .position(|r| r.id() == *id)
            .ok_or_else(|| LifelineError::not_found(T::KIND, id))?;
        records.remove(index);
        Ok(())
    }
}
