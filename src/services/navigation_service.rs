//! Service for handling image navigation operations.
//!
//! Wraps the shared `NavigationState` so UI handlers, the directory watcher
//! and worker threads all go through the same locking and error mapping.

use crate::error::{AppError, Result};
use crate::state::{DirectoryListing, NavigationState};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Result type for navigation operations.
pub type NavigationResult = Result<PathBuf>;

/// Service for managing image navigation.
#[derive(Clone)]
pub struct NavigationService {
    navigation: Arc<Mutex<NavigationState>>,
}

impl NavigationService {
    /// Creates a new navigation service.
    pub fn new(navigation: Arc<Mutex<NavigationState>>) -> Self {
        Self { navigation }
    }

    fn lock(&self) -> Result<MutexGuard<'_, NavigationState>> {
        self.navigation.lock().map_err(|_| AppError::StateLock)
    }

    /// Lists `dir` and makes its first image current.
    pub fn open_directory(&self, dir: &Path) -> Result<DirectoryListing> {
        self.lock()?.load_directory(dir)
    }

    /// Navigates to the next image (wrapping) and returns its path.
    pub fn next(&self) -> NavigationResult {
        self.lock()?.next_image().ok_or(AppError::NoImage)
    }

    /// Navigates to the previous image (wrapping) and returns its path.
    pub fn previous(&self) -> NavigationResult {
        self.lock()?.prev_image().ok_or(AppError::NoImage)
    }

    pub fn select_index(&self, index: usize) -> NavigationResult {
        self.lock()?.select_index(index).ok_or(AppError::NoImage)
    }

    pub fn select_path(&self, path: &Path) -> NavigationResult {
        self.lock()?.select_path(path).ok_or(AppError::NoImage)
    }

    pub fn current_path(&self) -> Result<Option<PathBuf>> {
        Ok(self.lock()?.current_path())
    }

    /// Next and previous images around the current one, for preloading.
    pub fn neighbours(&self) -> Result<(Option<PathBuf>, Option<PathBuf>)> {
        let nav_state = self.lock()?;
        Ok((nav_state.peek_next_image(), nav_state.peek_prev_image()))
    }

    /// Rescans the current directory; `None` when nothing changed.
    pub fn rescan_directory(&self) -> Result<Option<DirectoryListing>> {
        self.lock()?.rescan_directory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service_with(names: &[&str]) -> (TempDir, NavigationService) {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let service = NavigationService::new(Arc::new(Mutex::new(NavigationState::new())));
        (dir, service)
    }

    #[test]
    fn test_open_and_navigate() {
        let (dir, service) = service_with(&["a.png", "b.png"]);

        let listing = service.open_directory(dir.path()).unwrap();
        assert_eq!(listing.current, Some(dir.path().join("a.png")));

        assert_eq!(service.next().unwrap(), dir.path().join("b.png"));
        assert_eq!(service.next().unwrap(), dir.path().join("a.png"));
        assert_eq!(service.previous().unwrap(), dir.path().join("b.png"));
        assert_eq!(
            service.current_path().unwrap(),
            Some(dir.path().join("b.png"))
        );
        assert_eq!(
            service.neighbours().unwrap(),
            (
                Some(dir.path().join("a.png")),
                Some(dir.path().join("a.png"))
            )
        );
    }

    #[test]
    fn test_empty_directory_reports_no_image() {
        let (dir, service) = service_with(&["notes.txt"]);
        service.open_directory(dir.path()).unwrap();

        assert!(matches!(service.next(), Err(AppError::NoImage)));
        assert!(matches!(service.select_index(0), Err(AppError::NoImage)));
        assert_eq!(service.current_path().unwrap(), None);
        assert_eq!(service.neighbours().unwrap(), (None, None));
    }

    #[test]
    fn test_select_path() {
        let (dir, service) = service_with(&["a.png", "b.png"]);
        service.open_directory(dir.path()).unwrap();

        let b = dir.path().join("b.png");
        assert_eq!(service.select_path(&b).unwrap(), b);
        assert_eq!(service.next().unwrap(), dir.path().join("a.png"));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let (dir, service) = service_with(&[]);
        assert!(matches!(
            service.open_directory(&dir.path().join("nope")),
            Err(AppError::DirectoryScan(_))
        ));
    }
}
