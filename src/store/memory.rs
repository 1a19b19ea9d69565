//! In-process directory store. Ids are assigned from a counter and never reused.

use super::DirectoryStore;
use crate::error::AppError;
use crate::model::{Directory, DirectoryPatch, NewDirectory};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, Directory>,
    last_id: i64,
}

#[derive(Default)]
pub struct MemoryDirectoryStore {
    inner: RwLock<Inner>,
}

impl MemoryDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    async fn create(&self, new: NewDirectory) -> Result<Directory, AppError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let row = Directory {
            id: inner.last_id,
            name: new.name,
            emails: new.emails,
        };
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Option<Directory>, AppError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.rows.len() as i64)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Directory>, AppError> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);
        let inner = self.inner.read().await;
        Ok(inner.rows.values().skip(offset).take(limit).cloned().collect())
    }

    async fn update(&self, id: i64, patch: DirectoryPatch) -> Result<Option<Directory>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.get_mut(&id).map(|row| {
            patch.apply(row);
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
