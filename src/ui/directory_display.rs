//! Directory loading: file list, first image, thumbnail strip and watcher.

use crate::file_utils::PathExt;
use crate::image_loader;
use crate::services::{DirectoryChange, DirectoryWatchService, PreviewUpdate, preview_update};
use crate::state::{AppState, DirectoryListing};
use crate::ui::image_display::{clear_display, show_image};
use crate::ui::{
    clear_error, reset_thumbnails, set_directory_info, set_directory_rows, set_error_with_prefix,
    set_thumbnail,
};
use log::{info, warn};
use slint::ComponentHandle;
use std::path::{Path, PathBuf};

/// Re-renders the directory tree from state.
pub fn refresh_directory_tree(ui: &crate::AppWindow, state: &AppState) {
    if let Ok(tree) = state.directory_tree.lock() {
        set_directory_rows(ui, &tree);
    }
}

/// Loads `dir` into the file list and thumbnail strip.
///
/// Shows `select` if given and present, otherwise the first image; with no
/// images the preview is blanked and the tool buttons are disabled.
pub fn open_directory(
    ui: &crate::AppWindow,
    state: &AppState,
    dir: &Path,
    select: Option<&Path>,
) {
    clear_error(ui);
    let nav_service = state.navigation_service();
    let mut listing = match nav_service.open_directory(dir) {
        Ok(listing) => listing,
        Err(e) => {
            set_error_with_prefix(ui, "Failed to open directory", e.to_string());
            DirectoryListing {
                directory: dir.to_path_buf(),
                files: Vec::new(),
                current: None,
            }
        }
    };

    if let Some(path) = select {
        match nav_service.select_path(path) {
            Ok(path) => listing.current = Some(path),
            Err(e) => warn!("Cannot select {}: {}", path.format_for_log(), e),
        }
    }

    info!(
        "Opened {} ({} images)",
        dir.format_for_log(),
        listing.files.len()
    );

    if let Ok(mut viewport) = state.viewport.lock() {
        viewport.fit_to_area();
    }
    show_listing(ui, state, &listing);
    regenerate_thumbnails(ui, state, &listing);
    watch_directory(ui, state, dir);
}

fn show_listing(ui: &crate::AppWindow, state: &AppState, listing: &DirectoryListing) {
    set_directory_info(
        ui,
        &listing.directory,
        &listing.files,
        listing.current_index(),
    );
    match &listing.current {
        Some(path) => show_image(ui, state, path.clone(), "Failed to load image"),
        None => clear_display(ui, state),
    }
}

/// Drops the current thumbnails and starts generating the new set.
fn regenerate_thumbnails(ui: &crate::AppWindow, state: &AppState, listing: &DirectoryListing) {
    let service = state.thumbnail_service();
    let batch = service.begin_batch();
    reset_thumbnails(ui, &listing.files, listing.current_index());

    let ui_handle = ui.as_weak();
    let check = service.clone();
    service.generate(batch, listing.files.clone(), move |batch, index, thumbnail| {
        let ui_handle = ui_handle.clone();
        let check = check.clone();
        let _ = slint::invoke_from_event_loop(move || {
            if !check.is_current(batch) {
                return;
            }
            if let (Some(ui), Some(thumbnail)) = (ui_handle.upgrade(), thumbnail) {
                set_thumbnail(&ui, index, image_loader::create_slint_image(&thumbnail));
            }
        });
    });
}

fn watch_directory(ui: &crate::AppWindow, state: &AppState, dir: &Path) {
    // Stop the previous watch before starting a new one.
    if let Ok(mut watcher) = state.directory_watcher.lock() {
        *watcher = None;
    }

    let watch_service = DirectoryWatchService::new(state.navigation_service());
    let ui_handle = ui.as_weak();
    let watch_state = state.clone();
    let result = watch_service.start_watching(dir, move |change| {
        if let Some(ui) = ui_handle.upgrade() {
            apply_directory_change(&ui, &watch_state, change);
        }
    });

    match result {
        Ok(debouncer) => {
            if let Ok(mut watcher) = state.directory_watcher.lock() {
                *watcher = Some(debouncer);
            }
        }
        Err(e) => warn!("Directory changes will not be picked up: {}", e),
    }
}

/// Brings the UI in line with files that changed on disk.
fn apply_directory_change(ui: &crate::AppWindow, state: &AppState, change: DirectoryChange) {
    let DirectoryChange { changed, listing } = change;

    if let Ok(mut cache) = state.image_cache.lock() {
        for path in &changed {
            cache.remove(path);
        }
    }
    state.thumbnail_service().invalidate(&changed);

    let listing = match listing {
        Some(listing) => listing,
        None => {
            let Some(listing) = state
                .navigation
                .lock()
                .ok()
                .and_then(|nav_state| nav_state.current_listing())
            else {
                return;
            };
            listing
        }
    };

    set_directory_info(
        ui,
        &listing.directory,
        &listing.files,
        listing.current_index(),
    );
    regenerate_thumbnails(ui, state, &listing);

    let displayed: Option<PathBuf> = state
        .displayed_image
        .lock()
        .ok()
        .and_then(|displayed| displayed.clone());

    match preview_update(listing.current.as_deref(), displayed.as_deref(), &changed) {
        PreviewUpdate::Show(path) => show_image(ui, state, path, "Failed to reload image"),
        PreviewUpdate::Blank => clear_display(ui, state),
        PreviewUpdate::Keep => {}
    }
}
