//! List, create, read, patch and delete directories.

use crate::error::AppError;
use crate::model::{Directory, DirectoryPatch, NewDirectory};
use crate::pagination::PageParams;
use crate::response::ListResponse;
use crate::store::DirectoryStore;
use serde_json::Value;
use std::sync::Arc;

/// Collection path, used as the base of pagination links.
pub const DIRECTORIES_PATH: &str = "/directories/";

#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn DirectoryStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        DirectoryService { store }
    }

    pub fn store(&self) -> &Arc<dyn DirectoryStore> {
        &self.store
    }

    /// One page of directories in id order, with total count and neighbour links.
    pub async fn list(&self, params: PageParams) -> Result<ListResponse<Directory>, AppError> {
        let count = self.store.count().await?;
        let results = self.store.list(params.start(), params.page_size).await?;
        Ok(ListResponse::new(results, count, &params, DIRECTORIES_PATH))
    }

    pub async fn create(&self, body: Value) -> Result<Directory, AppError> {
        let new = NewDirectory::from_body(body)?;
        let row = self.store.create(new).await?;
        tracing::info!(id = row.id, "directory created");
        Ok(row)
    }

    pub async fn get(&self, id: i64) -> Result<Directory, AppError> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }

    /// Validates the whole body before writing. An unknown id is reported as
    /// not found even when the body is unreadable or invalid.
    pub async fn patch(&self, id: i64, body: Result<Value, AppError>) -> Result<Directory, AppError> {
        let patch = match body.and_then(DirectoryPatch::from_body) {
            Ok(patch) => patch,
            Err(e) => {
                self.get(id).await?;
                return Err(e);
            }
        };
        let row = self.store.update(id, patch).await?.ok_or_else(|| not_found(id))?;
        tracing::info!(id, "directory updated");
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(id, "directory deleted");
        Ok(())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("directory {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDirectoryStore;
    use serde_json::json;

    fn service() -> DirectoryService {
        DirectoryService::new(Arc::new(MemoryDirectoryStore::new()))
    }

    #[tokio::test]
    async fn patch_unknown_id_with_bad_body_is_not_found() {
        let svc = service();
        let err = svc.patch(9, Ok(json!("not an object"))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_patch_leaves_row_unchanged() {
        let svc = service();
        let created = svc.create(json!({"name": "Eng", "emails": ["a@x.com"]})).await.unwrap();
        let err = svc
            .patch(created.id, Ok(json!({"name": "Renamed", "emails": ["b@x.com", 1]})))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(svc.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn patch_unknown_id_with_unreadable_body_is_not_found() {
        let svc = service();
        let err = svc
            .patch(3, Err(AppError::BadRequest("expected JSON".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn patch_known_id_with_unreadable_body_keeps_body_error() {
        let svc = service();
        let created = svc.create(json!({"name": "Eng", "emails": []})).await.unwrap();
        let err = svc
            .patch(created.id, Err(AppError::BadRequest("expected JSON".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn list_reports_window_links() {
        let svc = service();
        for i in 0..5 {
            svc.create(json!({"name": format!("d{}", i), "emails": []})).await.unwrap();
        }
        let page = svc.list(PageParams::new(2, 2).unwrap()).await.unwrap();
        assert_eq!(page.count, 5);
        assert_eq!(page.results.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(page.next.as_deref(), Some("/directories/?page=3&page_size=2"));
        assert_eq!(page.previous.as_deref(), Some("/directories/?page=1&page_size=2"));
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let svc = service();
        let created = svc.create(json!({"name": "Ops", "emails": []})).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(matches!(svc.delete(created.id).await, Err(AppError::NotFound(_))));
    }
}
