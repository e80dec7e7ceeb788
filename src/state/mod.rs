//! State management for the image browser.

use crate::config::{IMAGE_CACHE_CAPACITY, THUMBNAIL_CACHE_CAPACITY};
use crate::image_cache::ImageCache;
use crate::services::{DirectoryDebouncer, NavigationService, ThumbnailService};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub mod directory_tree;
pub mod navigation;
pub mod viewport;

pub use directory_tree::DirectoryTree;
pub use navigation::{DirectoryListing, NavigationState};
pub use viewport::Viewport;

/// Application-wide state container. Cloning shares the same state, and it
/// can be moved to worker threads.
#[derive(Clone)]
pub struct AppState {
    pub navigation: Arc<Mutex<NavigationState>>,
    pub directory_tree: Arc<Mutex<DirectoryTree>>,
    pub viewport: Arc<Mutex<Viewport>>,
    /// Path of the image currently on screen.
    pub displayed_image: Arc<Mutex<Option<PathBuf>>>,
    /// LRU cache for decoded full-size images.
    pub image_cache: Arc<Mutex<ImageCache>>,
    /// LRU cache for decoded thumbnails.
    pub thumbnail_cache: Arc<Mutex<ImageCache>>,
    /// Thumbnail batch counter; bumping it invalidates in-flight thumbnails.
    pub thumbnail_generation: Arc<std::sync::atomic::AtomicU64>,
    /// Watcher of the directory on screen; replacing it stops the old watch.
    pub directory_watcher: Arc<Mutex<Option<DirectoryDebouncer>>>,
}

impl AppState {
    pub fn new(tree_root: PathBuf) -> Self {
        Self {
            navigation: Arc::new(Mutex::new(NavigationState::new())),
            directory_tree: Arc::new(Mutex::new(DirectoryTree::new(tree_root))),
            viewport: Arc::new(Mutex::new(Viewport::new())),
            displayed_image: Arc::new(Mutex::new(None)),
            image_cache: Arc::new(Mutex::new(ImageCache::new(IMAGE_CACHE_CAPACITY))),
            thumbnail_cache: Arc::new(Mutex::new(ImageCache::new(THUMBNAIL_CACHE_CAPACITY))),
            thumbnail_generation: Arc::new(std::sync::atomic::AtomicU64::new(0)),
            directory_watcher: Arc::new(Mutex::new(None)),
        }
    }

    pub fn navigation_service(&self) -> NavigationService {
        NavigationService::new(self.navigation.clone())
    }

    pub fn thumbnail_service(&self) -> ThumbnailService {
        ThumbnailService::new(
            self.thumbnail_cache.clone(),
            self.thumbnail_generation.clone(),
        )
    }
}
