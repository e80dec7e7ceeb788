//! Service for keeping the file list in sync with the disk.
//!
//! Watches the current directory and, when image files appear, disappear or
//! change, rescans it and hands the result to the UI thread.

use crate::config::{WATCH_DEBOUNCE_TIMEOUT, WATCH_POLL_INTERVAL};
use crate::error::{AppError, Result};
use crate::file_utils::{self, PathExt};
use crate::services::NavigationService;
use crate::state::DirectoryListing;
use log::{debug, warn};
use notify::{PollWatcher, RecursiveMode};
use notify_debouncer_mini::{
    Config, DebounceEventResult, DebouncedEvent, Debouncer, new_debouncer_opt,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Debounced watcher handle; dropping it stops watching.
pub type DirectoryDebouncer = Debouncer<PollWatcher>;

/// What changed in the watched directory.
#[derive(Debug)]
pub struct DirectoryChange {
    /// Image files that were created, modified or removed.
    pub changed: Vec<PathBuf>,
    /// New listing, or `None` if the set of images stayed the same.
    pub listing: Option<DirectoryListing>,
}

/// What the preview does after a directory change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewUpdate {
    /// Show, or reload, this image.
    Show(PathBuf),
    /// No image is left to show.
    Blank,
    /// The image on screen is still current and unchanged.
    Keep,
}

/// Decides how the preview reacts to `changed` files, given the current
/// file after the rescan and the file on screen.
pub fn preview_update(
    current: Option<&Path>,
    displayed: Option<&Path>,
    changed: &[PathBuf],
) -> PreviewUpdate {
    let current_changed = current.is_some_and(|current| changed.iter().any(|p| p == current));
    if current == displayed && !current_changed {
        return PreviewUpdate::Keep;
    }
    match current {
        Some(path) => PreviewUpdate::Show(path.to_path_buf()),
        None => PreviewUpdate::Blank,
    }
}

/// Service for managing directory watches.
pub struct DirectoryWatchService {
    navigation_service: NavigationService,
}

/// Keeps only events about supported image files.
fn image_paths(events: Vec<DebouncedEvent>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = events
        .into_iter()
        .map(|event| event.path)
        .filter(|path| file_utils::is_supported_image(path) && !file_utils::is_hidden(path))
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Handles debounced file system events.
fn handle_debounced_events<F>(
    events: Vec<DebouncedEvent>,
    navigation_service: &NavigationService,
    on_change: &Arc<F>,
) where
    F: Fn(DirectoryChange) + Send + Sync + 'static,
{
    let changed = image_paths(events);
    if changed.is_empty() {
        return;
    }

    debug!("Debounced file system events: {} images", changed.len());
    for path in &changed {
        debug!("  - {}", path.format_for_log());
    }

    let listing = match navigation_service.rescan_directory() {
        Ok(listing) => listing,
        Err(e) => {
            warn!("Failed to rescan directory: {}", e);
            return;
        }
    };

    let on_change = on_change.clone();
    let _ = slint::invoke_from_event_loop(move || {
        on_change(DirectoryChange { changed, listing });
    });
}

impl DirectoryWatchService {
    pub fn new(navigation_service: NavigationService) -> Self {
        Self { navigation_service }
    }

    /// Starts watching `directory` (non-recursive).
    ///
    /// Polls every couple of seconds and debounces bursts of events; the
    /// returned handle must be kept alive for as long as the watch should run.
    pub fn start_watching<F>(&self, directory: &Path, on_change: F) -> Result<DirectoryDebouncer>
    where
        F: Fn(DirectoryChange) + Send + Sync + 'static,
    {
        // The poll watcher reports a missing path only through its event handler.
        if !directory.is_dir() {
            return Err(AppError::Watch(format!(
                "{} is not a directory",
                directory.format_for_log()
            )));
        }

        let navigation_service = self.navigation_service.clone();
        let on_change = Arc::new(on_change);

        let notify_config = notify::Config::default().with_poll_interval(WATCH_POLL_INTERVAL);
        let debouncer_config = Config::default()
            .with_timeout(WATCH_DEBOUNCE_TIMEOUT)
            .with_notify_config(notify_config);

        let mut debouncer = new_debouncer_opt::<_, PollWatcher>(
            debouncer_config,
            move |res: DebounceEventResult| match res {
                Ok(events) => handle_debounced_events(events, &navigation_service, &on_change),
                Err(error) => warn!("File watcher error: {}", error),
            },
        )
        .map_err(|e| AppError::Watch(format!("Failed to create debouncer: {}", e)))?;

        debouncer
            .watcher()
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| {
                AppError::Watch(format!(
                    "Failed to watch {}: {}",
                    directory.format_for_log(),
                    e
                ))
            })?;

        debug!("Watching {}", directory.format_for_log());
        Ok(debouncer)
    }
}
