//! Image cache for fast navigation.
//!
//! Caches decoded RGBA8 image data using an LRU policy. One instance holds
//! full-size images for the preview, another holds thumbnails.

use crate::image_loader::DecodedImage;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// LRU cache for storing decoded images.
pub struct ImageCache {
    cache: LruCache<PathBuf, DecodedImage>,
}

impl ImageCache {
    /// Creates a new image cache with the specified capacity (at least one entry).
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Retrieves an image from the cache if it exists.
    pub fn get(&mut self, path: &Path) -> Option<DecodedImage> {
        let result = self.cache.get(path).cloned();
        if result.is_some() {
            log::debug!("Cache HIT: {}", path.display());
        } else {
            log::debug!("Cache MISS: {}", path.display());
        }
        result
    }

    /// Stores an image in the cache.
    pub fn put(&mut self, path: PathBuf, image: DecodedImage) {
        log::debug!(
            "Cache PUT: {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        self.cache.put(path, image);
    }

    /// Checks if an image is in the cache without touching its LRU position.
    pub fn contains(&self, path: &Path) -> bool {
        self.cache.contains(path)
    }

    pub fn remove(&mut self, path: &Path) {
        if self.cache.pop(path).is_some() {
            log::debug!("Cache EVICT: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(vec![0; (width * height * 4) as usize], width, height)
    }

    #[test]
    fn test_put_and_get() {
        let mut cache = ImageCache::new(2);
        cache.put(PathBuf::from("a.png"), image(2, 1));

        let hit = cache.get(Path::new("a.png")).unwrap();
        assert_eq!((hit.width, hit.height), (2, 1));
        assert!(cache.get(Path::new("b.png")).is_none());
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let mut cache = ImageCache::new(2);
        cache.put(PathBuf::from("a.png"), image(1, 1));
        cache.put(PathBuf::from("b.png"), image(1, 1));
        cache.get(Path::new("a.png"));
        cache.put(PathBuf::from("c.png"), image(1, 1));

        assert!(cache.contains(Path::new("a.png")));
        assert!(!cache.contains(Path::new("b.png")));
        assert!(cache.contains(Path::new("c.png")));
    }

    #[test]
    fn test_zero_capacity_still_holds_one_entry() {
        let mut cache = ImageCache::new(0);
        cache.put(PathBuf::from("a.png"), image(1, 1));
        assert!(cache.contains(Path::new("a.png")));

        cache.remove(Path::new("a.png"));
        assert!(!cache.contains(Path::new("a.png")));
    }
}
