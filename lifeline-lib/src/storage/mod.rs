//! Persistence collaborator interface.
//!
//! The core treats a [`Repository`] as the synchronous source of truth: it
//! never caches, never retries and propagates every failure unchanged.
//! Two implementations ship with the crate:
//!
//! - [`MemoryRepository`]: insertion-ordered, in-process
//! - [`JsonFileRepository`]: one pretty-printed JSON document per entity kind
//!
//! Host applications backed by a real database implement [`Repository`]
//! themselves.

mod file;
mod memory;

pub use file::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::model::Account;
use crate::{AccountId, LifelineError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// A persisted record.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Identifier type.
    type Id: Copy
        + Eq
        + Hash
        + Ord
        + fmt::Display
        + fmt::Debug
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + 'static;

    /// Human-readable kind, used in errors and logs.
    const KIND: &'static str;

    /// The record's identifier.
    fn id(&self) -> Self::Id;

    /// Owning account, if the record has one.
    fn owner(&self) -> Option<AccountId>;
}

/// CRUD operations per entity type.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Look up a record, `None` if absent.
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>>;

    /// All records, in a stable order for a fixed snapshot.
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Insert a new record. Fails if the id is already present.
    async fn create(&self, entity: T) -> Result<T>;

    /// Replace an existing record. Fails with `NotFound` if absent.
    async fn update(&self, entity: T) -> Result<T>;

    /// Remove a record. Fails with `NotFound` if absent.
    async fn delete(&self, id: &T::Id) -> Result<()>;

    /// Records owned by `owner`.
    async fn find_by_owner(&self, owner: &AccountId) -> Result<Vec<T>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|entity| entity.owner().as_ref() == Some(owner))
            .collect())
    }

    /// Look up a record, failing with `NotFound` if absent.
    async fn get(&self, id: &T::Id) -> Result<T> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| LifelineError::not_found(T::KIND, id))
    }
}

/// Account lookups beyond plain CRUD.
///
/// Provided for every `Repository<Account>`.
#[async_trait]
pub trait AccountRepository: Repository<Account> {
    /// Find an account by handle, ignoring ASCII case.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Account>> {
        let handle = handle.trim();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .find(|account| account.handle.eq_ignore_ascii_case(handle)))
    }
}

impl<R: Repository<Account> + ?Sized> AccountRepository for R {}
