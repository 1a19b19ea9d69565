//! HTTP handlers for directory CRUD and service status.

pub mod directory;
pub mod status;
