//! Directory service: paginated CRUD REST API for named email directories.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{ServerConfig, StoreBackend};
pub use error::{AppError, ConfigError};
pub use model::{Directory, DirectoryPatch, NewDirectory};
pub use pagination::PageParams;
pub use response::ListResponse;
pub use routes::{app, common_routes, directory_routes};
pub use service::DirectoryService;
pub use state::AppState;
pub use store::{ensure_database_exists, DirectoryStore, MemoryDirectoryStore, PgDirectoryStore};
