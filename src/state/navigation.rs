//! Navigation state for managing image file lists and current position.

use crate::error::{AppError, Result};
use crate::file_utils::{self, PathExt};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Direction for navigation through images.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

/// Snapshot of a directory's image list handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
    pub current: Option<PathBuf>,
}

impl DirectoryListing {
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.files.iter().position(|p| p == current)
    }
}

/// Manages the current directory, list of image files, and current file path.
#[derive(Default)]
pub struct NavigationState {
    current_directory: Option<PathBuf>,
    image_files: Vec<PathBuf>,
    current_file_path: Option<PathBuf>,
}

impl NavigationState {
    /// Creates a new empty navigation state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one step away from the current file, wrapping at both ends.
    ///
    /// A current file missing from the list behaves as if it sat just
    /// before the first entry (next) or just after the last (previous).
    fn step_index(&self, direction: Direction) -> Option<usize> {
        let len = self.image_files.len();
        if len == 0 {
            return None;
        }

        let current_index = self
            .current_file_path
            .as_ref()
            .and_then(|path| self.find_file_index(path));

        let index = match (direction, current_index) {
            (Direction::Next, Some(i)) => (i + 1) % len,
            (Direction::Next, None) => 0,
            (Direction::Previous, Some(i)) => (i + len - 1) % len,
            (Direction::Previous, None) => len - 1,
        };
        Some(index)
    }

    /// Navigates to an image in the specified direction.
    fn navigate_to(&mut self, direction: Direction) -> Option<PathBuf> {
        let Some(index) = self.step_index(direction) else {
            warn!("No images available for navigation");
            return None;
        };

        let path = self.image_files[index].clone();
        self.current_file_path = Some(path.clone());
        Some(path)
    }

    /// Moves to the next image, wrapping to the first after the last.
    pub fn next_image(&mut self) -> Option<PathBuf> {
        self.navigate_to(Direction::Next)
    }

    /// Moves to the previous image, wrapping to the last before the first.
    pub fn prev_image(&mut self) -> Option<PathBuf> {
        self.navigate_to(Direction::Previous)
    }

    /// Returns the path to the next image without changing the current file path.
    pub fn peek_next_image(&self) -> Option<PathBuf> {
        self.step_index(Direction::Next)
            .map(|i| self.image_files[i].clone())
    }

    /// Returns the path to the previous image without changing the current file path.
    pub fn peek_prev_image(&self) -> Option<PathBuf> {
        self.step_index(Direction::Previous)
            .map(|i| self.image_files[i].clone())
    }

    /// Makes `dir` the current directory and selects its first image.
    pub fn load_directory(&mut self, dir: &Path) -> Result<DirectoryListing> {
        let start = std::time::Instant::now();
        debug!("Loading directory {}", dir.format_for_log());

        // An unreadable directory still becomes current, with an empty list.
        self.current_directory = Some(dir.to_path_buf());
        self.image_files.clear();
        self.current_file_path = None;

        let files = file_utils::scan_directory(dir)?;
        self.current_file_path = files.first().cloned();
        self.image_files = files;

        debug!(
            "Loaded {} images from {} in {:?}",
            self.image_files.len(),
            dir.format_for_log(),
            start.elapsed()
        );
        Ok(self.listing(dir.to_path_buf()))
    }

    /// Rescans the current directory.
    ///
    /// Returns `None` when the image list did not change. The current file is
    /// kept when it still exists, otherwise the first image becomes current.
    pub fn rescan_directory(&mut self) -> Result<Option<DirectoryListing>> {
        let dir = self
            .current_directory
            .clone()
            .ok_or_else(|| AppError::DirectoryScan("No directory selected".to_string()))?;

        let files = file_utils::scan_directory(&dir)?;
        if files == self.image_files {
            return Ok(None);
        }

        let keep_current = self
            .current_file_path
            .as_ref()
            .is_some_and(|current| files.contains(current));
        if !keep_current {
            self.current_file_path = files.first().cloned();
        }
        self.image_files = files;

        Ok(Some(self.listing(dir)))
    }

    /// Listing of the current directory, if one is loaded.
    pub fn current_listing(&self) -> Option<DirectoryListing> {
        let directory = self.current_directory.clone()?;
        Some(self.listing(directory))
    }

    fn listing(&self, directory: PathBuf) -> DirectoryListing {
        DirectoryListing {
            directory,
            files: self.image_files.clone(),
            current: self.current_file_path.clone(),
        }
    }

    /// Selects the image at `index` in the filtered list.
    pub fn select_index(&mut self, index: usize) -> Option<PathBuf> {
        let path = self.image_files.get(index)?.clone();
        self.current_file_path = Some(path.clone());
        Some(path)
    }

    /// Selects `path` if it belongs to the current list.
    pub fn select_path(&mut self, path: &Path) -> Option<PathBuf> {
        let index = self.find_file_index(path)?;
        self.select_index(index)
    }

    fn find_file_index(&self, file_path: &Path) -> Option<usize> {
        self.image_files.iter().position(|p| p == file_path)
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_file_path.clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.find_file_index(self.current_file_path.as_deref()?)
    }

}
