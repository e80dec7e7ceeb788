//! Image loading and display logic.
//!
//! Uses `rayon::spawn` for CPU-intensive image decoding operations,
//! then `slint::invoke_from_event_loop` to update UI from the background thread.

use crate::file_utils::{self, PathExt};
use crate::image_loader::{self, DecodedImage};
use crate::state::AppState;
use crate::ui::{
    clear_error, clear_image, set_current_selection, set_error_with_prefix, set_geometry,
    set_image, set_window_title,
};
use log::debug;
use slint::ComponentHandle;
use std::path::{Path, PathBuf};

/// Pushes the current frame and fitted image size to the UI.
pub fn apply_geometry(ui: &crate::AppWindow, state: &AppState) {
    if let Ok(viewport) = state.viewport.lock() {
        set_geometry(ui, viewport.frame(), viewport.display_size());
    }
}

fn set_displayed(state: &AppState, path: Option<&Path>) {
    if let Ok(mut displayed) = state.displayed_image.lock() {
        *displayed = path.map(Path::to_path_buf);
    }
}

/// Updates the UI with successfully decoded image data.
fn display_decoded(ui: &crate::AppWindow, state: &AppState, path: &Path, image: &DecodedImage) {
    if let Ok(mut viewport) = state.viewport.lock() {
        viewport.set_image(Some(image.size()));
    }
    set_image(ui, image_loader::create_slint_image(image));
    apply_geometry(ui, state);
    clear_error(ui);
    set_displayed(state, Some(path));
}

/// Shows a blank picture, the way an unreadable file is rendered.
fn display_blank(ui: &crate::AppWindow, state: &AppState, path: Option<&Path>) {
    if let Ok(mut viewport) = state.viewport.lock() {
        viewport.set_image(None);
    }
    clear_image(ui);
    apply_geometry(ui, state);
    set_displayed(state, path);
}

/// Blanks the preview and restores the default window title.
pub fn clear_display(ui: &crate::AppWindow, state: &AppState) {
    display_blank(ui, state, None);
    set_window_title(ui, None);
}

fn is_current(state: &AppState, path: &Path) -> bool {
    state
        .navigation_service()
        .current_path()
        .ok()
        .flatten()
        .is_some_and(|current| current == path)
}

/// Shows the image at `path`, which must already be the navigation's current file.
///
/// This function:
/// 1. Updates the window title and selection highlights right away
/// 2. Displays from the cache on a hit
/// 3. Otherwise decodes on a rayon thread and returns to the UI thread
/// 4. Drops the result if the user moved on while it was decoding
pub fn show_image(ui: &crate::AppWindow, state: &AppState, path: PathBuf, error_prefix: &str) {
    let current_index = state
        .navigation
        .lock()
        .ok()
        .and_then(|nav_state| nav_state.current_index());
    set_window_title(ui, Some(&file_utils::display_name(&path)));
    set_current_selection(ui, current_index);

    let cached = state.image_cache.lock().ok().and_then(|mut c| c.get(&path));
    if let Some(image) = cached {
        display_decoded(ui, state, &path, &image);
        preload_adjacent_images(state);
        return;
    }

    let ui_handle = ui.as_weak();
    let state = state.clone();
    let error_prefix = error_prefix.to_string();
    rayon::spawn(move || {
        let result = image_loader::load_image_blocking(&path);
        if let Ok(image) = &result
            && let Ok(mut cache) = state.image_cache.lock()
        {
            cache.put(path.clone(), image.clone());
        }

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            if !is_current(&state, &path) {
                debug!("Discarding stale image {}", path.format_for_log());
                return;
            }
            match result {
                Ok(image) => {
                    display_decoded(&ui, &state, &path, &image);
                    preload_adjacent_images(&state);
                }
                Err(error) => {
                    display_blank(&ui, &state, Some(&path));
                    set_error_with_prefix(&ui, &error_prefix, error.to_string());
                }
            }
        });
    });
}

/// Preloads adjacent images (next and previous) in the background.
fn preload_adjacent_images(state: &AppState) {
    let Ok((next_path, prev_path)) = state.navigation_service().neighbours() else {
        return;
    };

    for path in [next_path, prev_path].into_iter().flatten() {
        let should_load = state
            .image_cache
            .lock()
            .map(|c| !c.contains(&path))
            .unwrap_or(false);
        if !should_load {
            continue;
        }

        let cache = state.image_cache.clone();
        rayon::spawn(move || {
            // Silently ignore errors during preload
            if let Ok(image) = image_loader::load_image_blocking(&path)
                && let Ok(mut cache) = cache.lock()
            {
                cache.put(path, image);
            }
        });
    }
}
