//! Event handlers for UI callbacks.
//!
//! Sets up all Logic callbacks (directory clicks, file and thumbnail clicks,
//! previous/next, zoom buttons, folder picker).

use crate::error::Result;
use crate::file_utils::PathExt;
use crate::services::NavigationService;
use crate::state::viewport::{Size, Viewport};
use crate::state::{AppState, DirectoryTree};
use crate::ui::directory_display::{open_directory, refresh_directory_tree};
use crate::ui::image_display::{apply_geometry, show_image};
use crate::ui::set_error_with_prefix;
use log::{debug, warn};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::fs;
use std::path::{Path, PathBuf};

fn area_size(width: i32, height: i32) -> Size {
    Size::new(
        u32::try_from(width).unwrap_or(0),
        u32::try_from(height).unwrap_or(0),
    )
}

/// Records the reported image area and resets the frame to fill it.
fn fit_frame_to_area(state: &AppState, width: i32, height: i32) {
    if let Ok(mut viewport) = state.viewport.lock() {
        viewport.set_area(area_size(width, height));
        viewport.fit_to_area();
    }
}

/// Moves the navigation with `step`, then shows the result fitted to the area.
fn navigate_and_show<F>(
    ui: &crate::AppWindow,
    state: &AppState,
    area: (i32, i32),
    error_prefix: &str,
    step: F,
) where
    F: FnOnce(&NavigationService) -> Result<PathBuf>,
{
    match step(&state.navigation_service()) {
        Ok(path) => {
            fit_frame_to_area(state, area.0, area.1);
            show_image(ui, state, path, error_prefix);
        }
        Err(e) => debug!("Navigation ignored: {}", e),
    }
}

/// Applies a frame change to the displayed image; no-op without an image.
fn change_frame<F>(ui: &crate::AppWindow, state: &AppState, change: F)
where
    F: FnOnce(&mut Viewport),
{
    {
        let Ok(mut viewport) = state.viewport.lock() else {
            return;
        };
        if viewport.image().is_none() {
            return;
        }
        change(&mut viewport);
    }
    apply_geometry(ui, state);
}

/// Shows `dir` in the tree (re-rooting it if needed) and loads it.
fn reveal_and_open(ui: &crate::AppWindow, state: &AppState, dir: &Path) {
    let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    if let Ok(mut tree) = state.directory_tree.lock() {
        if !dir.starts_with(tree.root()) {
            *tree = DirectoryTree::new(crate::startup::filesystem_root(&dir));
        }
        match tree.reveal(&dir) {
            Ok(Some(_)) => {}
            Ok(None) => debug!("{} is not shown in the tree", dir.format_for_log()),
            Err(e) => warn!("Failed to reveal directory in tree: {}", e),
        }
    }
    refresh_directory_tree(ui, state);
    open_directory(ui, state, &dir, None);
}

/// Sets up all UI event handlers for the application.
pub fn setup_handlers(ui: &crate::AppWindow, state: &AppState) {
    refresh_directory_tree(ui, state);
    let logic = ui.global::<crate::Logic>();

    logic.on_directory_clicked({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |index, width, height| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let selected = usize::try_from(index).ok().and_then(|index| {
                state
                    .directory_tree
                    .lock()
                    .ok()
                    .and_then(|mut tree| tree.select(index))
            });
            let Some(dir) = selected else {
                return;
            };

            if let Ok(mut viewport) = state.viewport.lock() {
                viewport.set_area(area_size(width, height));
            }
            refresh_directory_tree(&ui, &state);
            open_directory(&ui, &state, &dir, None);
        }
    });

    logic.on_directory_toggled({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |index| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let Ok(index) = usize::try_from(index) else {
                return;
            };
            let result = match state.directory_tree.lock() {
                Ok(mut tree) => tree.toggle(index),
                Err(_) => return,
            };
            if let Err(e) = result {
                set_error_with_prefix(&ui, "Failed to expand directory", e.to_string());
            }
            refresh_directory_tree(&ui, &state);
        }
    });

    logic.on_file_clicked({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |index, width, height| {
            let (Some(ui), Ok(index)) = (ui_handle.upgrade(), usize::try_from(index)) else {
                return;
            };
            navigate_and_show(&ui, &state, (width, height), "Failed to load image", |nav| {
                nav.select_index(index)
            });
        }
    });

    // Thumbnails are labels that report a click; they map 1:1 to the file list.
    logic.on_thumbnail_clicked({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |index, width, height| {
            let (Some(ui), Ok(index)) = (ui_handle.upgrade(), usize::try_from(index)) else {
                return;
            };
            navigate_and_show(&ui, &state, (width, height), "Failed to load image", |nav| {
                nav.select_index(index)
            });
        }
    });

    logic.on_next_image({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |width, height| {
            if let Some(ui) = ui_handle.upgrade() {
                navigate_and_show(
                    &ui,
                    &state,
                    (width, height),
                    "Failed to load next image",
                    NavigationService::next,
                );
            }
        }
    });

    logic.on_prev_image({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |width, height| {
            if let Some(ui) = ui_handle.upgrade() {
                navigate_and_show(
                    &ui,
                    &state,
                    (width, height),
                    "Failed to load previous image",
                    NavigationService::previous,
                );
            }
        }
    });

    // A frame that fills the image area keeps filling it as the window resizes.
    logic.on_area_resized({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |width, height| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let resized = state
                .viewport
                .lock()
                .map(|mut viewport| viewport.resize_area(area_size(width, height)))
                .unwrap_or(false);
            if resized {
                apply_geometry(&ui, &state);
            }
        }
    });

    logic.on_zoom_in({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                change_frame(&ui, &state, |viewport| {
                    viewport.zoom_in();
                });
            }
        }
    });

    logic.on_zoom_out({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                change_frame(&ui, &state, |viewport| {
                    viewport.zoom_out();
                });
            }
        }
    });

    logic.on_fit_to_window({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |width, height| {
            if let Some(ui) = ui_handle.upgrade() {
                change_frame(&ui, &state, |viewport| {
                    viewport.set_area(area_size(width, height));
                    viewport.fit_to_area();
                });
            }
        }
    });

    logic.on_actual_size({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                change_frame(&ui, &state, |viewport| {
                    viewport.actual_size();
                });
            }
        }
    });

    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    logic.on_open_folder({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move |width, height| {
            let ui_handle = ui_handle.clone();
            let state = state.clone();
            let _ = slint::spawn_local(async move {
                let Some(folder) = AsyncFileDialog::new().pick_folder().await else {
                    debug!("No folder selected");
                    return;
                };
                let Some(ui) = ui_handle.upgrade() else {
                    return;
                };

                if let Ok(mut viewport) = state.viewport.lock() {
                    viewport.set_area(area_size(width, height));
                }
                reveal_and_open(&ui, &state, folder.path());
            });
        }
    });
}
