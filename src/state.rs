//! Shared application state for all routes. The store handle is built once at startup.

use crate::service::DirectoryService;
use crate::store::DirectoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub directories: DirectoryService,
}

impl AppState {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        AppState {
            directories: DirectoryService::new(store),
        }
    }
}
