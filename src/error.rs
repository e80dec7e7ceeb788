//! Unified error types for the image browser.

use std::fmt;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error loading or decoding an image file
    ImageLoad(String),
    /// Error scanning a directory for images or subdirectories
    DirectoryScan(String),
    /// Error setting up the directory watcher
    Watch(String),
    /// A shared state mutex was poisoned by a panicking thread
    StateLock,
    /// Navigation requested while the directory has no images
    NoImage,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
            AppError::DirectoryScan(msg) => write!(f, "Directory scan error: {}", msg),
            AppError::Watch(msg) => write!(f, "Directory watch error: {}", msg),
            AppError::StateLock => write!(f, "Application state is unavailable"),
            AppError::NoImage => write!(f, "No image in the current directory"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::DirectoryScan(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
