//! Application configuration constants.

use std::time::Duration;

/// Supported image file extensions for scanning directories (matched case-insensitively).
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "gif"];

/// Window title shown while no image is displayed.
pub const DEFAULT_WINDOW_TITLE: &str = "Image Viewer";

/// Bounding box of a thumbnail in the strip.
pub const THUMBNAIL_WIDTH: u32 = 125;
pub const THUMBNAIL_HEIGHT: u32 = 115;

/// Bounds of the image frame while zooming.
pub const MAX_IMAGE_WIDTH: u32 = 3000;
pub const MAX_IMAGE_HEIGHT: u32 = 3000;
pub const MIN_IMAGE_WIDTH: u32 = 30;
pub const MIN_IMAGE_HEIGHT: u32 = 30;

/// Scale applied per zoom step.
pub const ZOOM_FACTOR: f64 = 1.15;

/// Image area size assumed until the UI reports its real size.
pub const DEFAULT_AREA_WIDTH: u32 = 800;
pub const DEFAULT_AREA_HEIGHT: u32 = 600;

pub const IMAGE_CACHE_CAPACITY: usize = 10;
pub const THUMBNAIL_CACHE_CAPACITY: usize = 256;

pub const WATCH_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const WATCH_DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(500);
