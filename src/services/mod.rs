//! Service layer for business logic.
//!
//! Separates business logic from UI handlers for better testability and maintainability.

pub mod directory_watch_service;
pub mod navigation_service;
pub mod thumbnail_service;

pub use directory_watch_service::{
    DirectoryChange, DirectoryDebouncer, DirectoryWatchService, PreviewUpdate, preview_update,
};
pub use navigation_service::NavigationService;
pub use thumbnail_service::ThumbnailService;
