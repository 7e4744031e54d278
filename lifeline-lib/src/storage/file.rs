//! File-based repository (one JSON document per entity kind).
//!
//! Each write rewrites the whole document through a temporary file and a
//! rename, so a crash never leaves a half-written document behind. Writes
//! within one process are serialized; there is no cross-process locking.
//! File I/O goes through `tokio::fs`, and every call reads the whole
//! document, so this suits low-volume hosts and tests.
//!
//! # Examples
//!
//! ```no_run
//! use lifeline_lib::model::{Hospital, HospitalDraft};
//! use lifeline_lib::storage::{JsonFileRepository, Repository};
//!
//! # async fn example() -> lifeline_lib::Result<()> {
//! let hospitals = JsonFileRepository::<Hospital>::new("./data");
//! hospitals
//!     .create(Hospital::new(HospitalDraft {
//!         name: "City General".into(),
//!         address: "12 MG Road, Pune".into(),
//!         contact: "020-555-0100".into(),
//!         capabilities: "kidney, liver".into(),
//!     })?)
//!     .await?;
//! println!("{} hospitals", hospitals.find_all().await?.len());
//! # Ok(())
//! # }
//! ```

use super::{Entity, Repository};
use crate::{LifelineError, Result};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// JSON-file repository for a single entity kind.
pub struct JsonFileRepository<T: Entity> {
    storage_dir: PathBuf,
    write_lock: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> JsonFileRepository<T> {
    /// Create a repository rooted at `storage_dir`. The directory is created
    /// on first write.
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    /// Path of the backing document.
    pub fn data_path(&self) -> PathBuf {
        let file = format!("{}s.json", T::KIND.replace(' ', "_"));
        self.storage_dir.join(file)
    }

    async fn load(&self) -> Result<Vec<T>> {
        let json = match tokio::fs::read_to_string(self.data_path()).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LifelineError::storage(e)),
        };
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        tokio::fs::create_dir_all(&self.storage_dir)
            .await
            .map_err(LifelineError::storage)?;
        let path = self.data_path();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&tmp, json).await.map_err(LifelineError::storage)?;
        tokio::fs::rename(&tmp, &path).await.map_err(LifelineError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for JsonFileRepository<T> {
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == *id))
    }

    async fn find_all(&self) -> Result<Vec<T>> {
        self.load().await
    }

    async fn create(&self, entity: T) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        if records.iter().any(|r| r.id() == entity.id()) {
            return Err(LifelineError::Storage(format!(
                "{} {} already exists",
                T::KIND,
                entity.id()
            )));
        }
        records.push(entity.clone());
        self.save(&records).await?;
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or_else(|| LifelineError::not_found(T::KIND, entity.id()))?;
        *slot = entity.clone();
        self.save(&records).await?;
        Ok(entity)
    }

    async fn delete(&self, id: &T::Id) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| r.id() != *id);
        if records.len() == before {
            return Err(LifelineError::not_found(T::KIND, id));
        }
        self.save(&records).await
    }
}
