//! Helper functions to set groups of ViewState properties at once.
//!
//! All of these touch Slint models and must run on the UI thread.

use crate::config::DEFAULT_WINDOW_TITLE;
use crate::file_utils;
use crate::state::DirectoryTree;
use crate::state::viewport::Size;
use log::error;
use slint::{ComponentHandle, Model, ModelRc, VecModel};
use std::path::PathBuf;

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn index_to_i32(index: Option<usize>) -> i32 {
    index
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(-1)
}

/// Replaces the directory tree rows.
pub fn set_directory_rows(ui: &crate::AppWindow, tree: &DirectoryTree) {
    let selected = tree.selected_index();
    let rows: Vec<crate::DirectoryRow> = tree
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| crate::DirectoryRow {
            name: node.name.as_str().into(),
            depth: i32::try_from(node.depth).unwrap_or(i32::MAX),
            expanded: node.expanded,
            has_children: node.has_children,
            selected: selected == Some(index),
        })
        .collect();
    ui.global::<crate::ViewState>()
        .set_directories(ModelRc::new(VecModel::from(rows)));
}

/// Replaces the file list and the directory caption.
///
/// Groups: current-directory, files, tools-enabled, current-index, total-index
pub fn set_directory_info(
    ui: &crate::AppWindow,
    directory: &std::path::Path,
    files: &[PathBuf],
    current: Option<usize>,
) {
    let view_state = ui.global::<crate::ViewState>();
    let rows: Vec<crate::FileRow> = files
        .iter()
        .enumerate()
        .map(|(index, path)| crate::FileRow {
            name: file_utils::display_name(path).into(),
            selected: current == Some(index),
        })
        .collect();

    view_state.set_current_directory(directory.display().to_string().into());
    view_state.set_files(ModelRc::new(VecModel::from(rows)));
    view_state.set_tools_enabled(!files.is_empty());
    set_navigation_info(ui, current, files.len());
}

/// Sets all navigation-related properties at once.
///
/// Groups: current-index, total-index
pub fn set_navigation_info(ui: &crate::AppWindow, current: Option<usize>, total: usize) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_current_index(index_to_i32(current));
    view_state.set_total_index(i32::try_from(total).unwrap_or(i32::MAX));
}

/// Moves the selection highlight in the file list and the thumbnail strip.
pub fn set_current_selection(ui: &crate::AppWindow, current: Option<usize>) {
    let view_state = ui.global::<crate::ViewState>();

    let files = view_state.get_files();
    for index in 0..files.row_count() {
        if let Some(mut row) = files.row_data(index) {
            let selected = current == Some(index);
            if row.selected != selected {
                row.selected = selected;
                files.set_row_data(index, row);
            }
        }
    }

    let thumbnails = view_state.get_thumbnails();
    for index in 0..thumbnails.row_count() {
        if let Some(mut item) = thumbnails.row_data(index) {
            let selected = current == Some(index);
            if item.selected != selected {
                item.selected = selected;
                thumbnails.set_row_data(index, item);
            }
        }
    }

    set_navigation_info(ui, current, files.row_count());
}

/// Sets the window title to the file name, or the default title.
pub fn set_window_title(ui: &crate::AppWindow, file_name: Option<&str>) {
    ui.global::<crate::ViewState>()
        .set_window_title(file_name.unwrap_or(DEFAULT_WINDOW_TITLE).into());
}

/// Sets all image geometry properties at once.
///
/// Groups: frame-width, frame-height, display-width, display-height
pub fn set_geometry(ui: &crate::AppWindow, frame: Size, display: Option<Size>) {
    let view_state = ui.global::<crate::ViewState>();
    let display = display.unwrap_or(Size::new(0, 0));
    view_state.set_frame_width(to_i32(frame.width));
    view_state.set_frame_height(to_i32(frame.height));
    view_state.set_display_width(to_i32(display.width));
    view_state.set_display_height(to_i32(display.height));
}

/// Shows `image` as the main picture.
pub fn set_image(ui: &crate::AppWindow, image: slint::Image) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_dynamic_image(image);
    view_state.set_image_loaded(true);
}

/// Blanks the main picture.
pub fn clear_image(ui: &crate::AppWindow) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_dynamic_image(slint::Image::default());
    view_state.set_image_loaded(false);
}

/// Replaces the thumbnail strip with one placeholder per file.
pub fn reset_thumbnails(ui: &crate::AppWindow, files: &[PathBuf], current: Option<usize>) {
    let items: Vec<crate::ThumbnailItem> = files
        .iter()
        .enumerate()
        .map(|(index, path)| crate::ThumbnailItem {
            thumbnail: slint::Image::default(),
            name: file_utils::display_name(path).into(),
            loaded: false,
            selected: current == Some(index),
        })
        .collect();
    ui.global::<crate::ViewState>()
        .set_thumbnails(ModelRc::new(VecModel::from(items)));
}

/// Fills in one thumbnail of the strip.
pub fn set_thumbnail(ui: &crate::AppWindow, index: usize, image: slint::Image) {
    let thumbnails = ui.global::<crate::ViewState>().get_thumbnails();
    if let Some(mut item) = thumbnails.row_data(index) {
        item.thumbnail = image;
        item.loaded = true;
        thumbnails.set_row_data(index, item);
    }
}

/// Sets an error message in the UI with a prefix.
///
/// Logs the error and updates the ViewState error-message property.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_error_message(error_message.into());
}

pub fn clear_error(ui: &crate::AppWindow) {
    ui.global::<crate::ViewState>().set_error_message("".into());
}
