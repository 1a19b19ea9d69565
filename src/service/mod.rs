//! DirectoryService: the directory resource contract over a storage handle.

mod directory;
pub use directory::{DirectoryService, DIRECTORIES_PATH};
