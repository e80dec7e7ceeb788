//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: async work that must stay on the main thread (the folder dialog)
//! - `rayon::spawn`: CPU-heavy work (image and thumbnail decoding)
//! - `slint::invoke_from_event_loop`: hands rayon and watcher results back to the UI thread

pub mod directory_display;
pub mod handlers;
pub mod image_display;
mod state_helpers;

pub use handlers::setup_handlers;
pub use state_helpers::*;
