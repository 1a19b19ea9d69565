//! Storage collaborator for directories: trait plus PostgreSQL and in-memory backends.

mod memory;
mod postgres;

pub use memory::MemoryDirectoryStore;
pub use postgres::{ensure_database_exists, PgDirectoryStore, DEFAULT_TABLE};

use crate::error::AppError;
use crate::model::{Directory, DirectoryPatch, NewDirectory};
use async_trait::async_trait;

/// Row-level persistence for directories.
///
/// `update` and `delete` must check existence and write in one atomic step so a
/// concurrent delete cannot slip between them.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn create(&self, new: NewDirectory) -> Result<Directory, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Directory>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Rows ordered by id ascending, skipping `offset` and returning at most `limit`.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Directory>, AppError>;

    /// Returns the updated row, or `None` if no row has `id`.
    async fn update(&self, id: i64, patch: DirectoryPatch) -> Result<Option<Directory>, AppError>;

    /// Returns `false` if no row has `id`.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
