//! Service for generating the thumbnail strip.
//!
//! Each directory load starts a new batch. Thumbnails are decoded on the
//! rayon pool and handed back together with their batch number, so results
//! belonging to a directory the user already left can be dropped.

use crate::config::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
use crate::file_utils::PathExt;
use crate::image_cache::ImageCache;
use crate::image_loader::{self, DecodedImage};
use crate::state::viewport::Size;
use log::warn;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct ThumbnailService {
    cache: Arc<Mutex<ImageCache>>,
    generation: Arc<AtomicU64>,
}

impl ThumbnailService {
    pub fn new(cache: Arc<Mutex<ImageCache>>, generation: Arc<AtomicU64>) -> Self {
        Self { cache, generation }
    }

    /// Starts a new batch, invalidating every earlier one.
    pub fn begin_batch(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, batch: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == batch
    }

    /// Forgets cached thumbnails of files that changed on disk.
    pub fn invalidate(&self, paths: &[PathBuf]) {
        if let Ok(mut cache) = self.cache.lock() {
            for path in paths {
                cache.remove(path);
            }
        }
    }

    /// Decodes thumbnails for `paths` in the background.
    ///
    /// `on_ready(batch, index, thumbnail)` runs on a worker thread once per
    /// path, in no particular order. Unreadable files yield `None`. Work stops
    /// early once the batch is superseded.
    pub fn generate<F>(&self, batch: u64, paths: Vec<PathBuf>, on_ready: F)
    where
        F: Fn(u64, usize, Option<DecodedImage>) + Send + Sync + 'static,
    {
        let service = self.clone();
        rayon::spawn(move || {
            paths.par_iter().enumerate().for_each(|(index, path)| {
                if !service.is_current(batch) {
                    return;
                }
                let thumbnail = service.thumbnail_for(path);
                on_ready(batch, index, thumbnail);
            });
        });
    }

    fn thumbnail_for(&self, path: &Path) -> Option<DecodedImage> {
        if let Some(cached) = self.cache.lock().ok().and_then(|mut c| c.get(path)) {
            return Some(cached);
        }

        let bounds = Size::new(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT);
        match image_loader::load_thumbnail_blocking(path, bounds) {
            Ok(thumbnail) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(path.to_path_buf(), thumbnail.clone());
                }
                Some(thumbnail)
            }
            Err(e) => {
                warn!("Thumbnail failed for {}: {}", path.format_for_log(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn service() -> ThumbnailService {
        ThumbnailService::new(
            Arc::new(Mutex::new(ImageCache::new(16))),
            Arc::new(AtomicU64::new(0)),
        )
    }

    #[test]
    fn test_batches_supersede_each_other() {
        let service = service();
        let first = service.begin_batch();
        assert!(service.is_current(first));

        let second = service.begin_batch();
        assert!(!service.is_current(first));
        assert!(service.is_current(second));
    }

    #[test]
    fn test_generate_reports_every_path() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        RgbImage::from_pixel(250, 50, Rgb([0, 0, 255]))
            .save(&good)
            .unwrap();
        let broken = dir.path().join("broken.gif");
        std::fs::write(&broken, b"garbage").unwrap();

        let service = service();
        let batch = service.begin_batch();
        let (tx, rx) = mpsc::channel();
        service.generate(batch, vec![good.clone(), broken], move |b, index, thumb| {
            tx.send((b, index, thumb.map(|t| t.size()))).unwrap();
        });

        let mut results: Vec<_> = (0..2)
            .map(|_| rx.recv_timeout(Duration::from_secs(10)).unwrap())
            .collect();
        results.sort_by_key(|(_, index, _)| *index);

        assert_eq!(
            results,
            vec![(batch, 0, Some(Size::new(125, 25))), (batch, 1, None)]
        );
        assert!(service.cache.lock().unwrap().contains(&good));
    }

    #[test]
    fn test_superseded_batch_produces_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        RgbImage::new(4, 4).save(&path).unwrap();

        let service = service();
        let stale = service.begin_batch();
        service.begin_batch();
        let (tx, rx) = mpsc::channel();
        service.generate(stale, vec![path], move |_, index, _| {
            tx.send(index).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }

    #[test]
    fn test_invalidate_drops_cached_thumbnail() {
        let service = service();
        let path = PathBuf::from("x.png");
        service
            .cache
            .lock()
            .unwrap()
            .put(path.clone(), DecodedImage::new(vec![0; 4], 1, 1));

        service.invalidate(std::slice::from_ref(&path));

        assert!(!service.cache.lock().unwrap().contains(&path));
    }
}
