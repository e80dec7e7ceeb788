use crate::file_utils::{self, PathExt};
use crate::state::AppState;
use crate::state::viewport::Size;
use crate::ui::directory_display::{open_directory, refresh_directory_tree};
use log::{info, warn};
use slint::ComponentHandle;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory (and optionally file) shown when the window opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupTarget {
    pub directory: PathBuf,
    pub file: Option<PathBuf>,
}

/// Topmost ancestor of `path`, i.e. the file system root it lives under.
pub fn filesystem_root(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

fn first_path_argument<I>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .skip(1)
        .find(|arg| !arg.to_string_lossy().starts_with('-'))
        .map(PathBuf::from)
}

fn default_directory() -> PathBuf {
    std::env::current_dir()
        .map(|dir| filesystem_root(&dir))
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Works out what to open from a command-line path.
///
/// A directory opens itself, a supported image opens its directory with the
/// image selected, anything else falls back to the file system root.
pub fn resolve_startup_target(arg: Option<PathBuf>) -> StartupTarget {
    let fallback = || StartupTarget {
        directory: default_directory(),
        file: None,
    };

    let Some(arg) = arg else {
        return fallback();
    };
    let path = fs::canonicalize(&arg)
        .or_else(|_| std::path::absolute(&arg))
        .unwrap_or(arg);

    if path.is_dir() {
        return StartupTarget {
            directory: path,
            file: None,
        };
    }

    if path.is_file()
        && file_utils::is_supported_image(&path)
        && let Some(parent) = path.parent()
    {
        return StartupTarget {
            directory: parent.to_path_buf(),
            file: Some(path.clone()),
        };
    }

    warn!(
        "Ignoring startup argument {}: not a directory or supported image",
        path.format_for_log()
    );
    fallback()
}

pub fn startup_target_from_args() -> StartupTarget {
    resolve_startup_target(first_path_argument(std::env::args_os()))
}

/// Selects the startup directory in the tree and loads it.
pub fn configure_startup_opening(
    app: &crate::AppWindow,
    app_state: &AppState,
    target: &StartupTarget,
) {
    info!("Starting in {}", target.directory.format_for_log());

    if let Ok(mut tree) = app_state.directory_tree.lock() {
        match tree.reveal(&target.directory) {
            Ok(Some(_)) => {}
            Ok(None) => info!(
                "{} is not shown in the directory tree",
                target.directory.format_for_log()
            ),
            Err(e) => warn!("Failed to reveal startup directory: {}", e),
        }
    }
    refresh_directory_tree(app, app_state);

    // Open once the window is shown, so the image area has its real size.
    let ui_handle = app.as_weak();
    let state = app_state.clone();
    let target = target.clone();
    let _ = slint::invoke_from_event_loop(move || {
        let Some(ui) = ui_handle.upgrade() else {
            return;
        };
        if let Ok(mut viewport) = state.viewport.lock() {
            viewport.set_area(Size::new(
                u32::try_from(ui.get_image_area_width()).unwrap_or(0),
                u32::try_from(ui.get_image_area_height()).unwrap_or(0),
            ));
        }
        open_directory(&ui, &state, &target.directory, target.file.as_deref());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_first_path_argument_skips_flags() {
        assert_eq!(
            first_path_argument(args(&["viewer", "--verbose", "/pics"])),
            Some(PathBuf::from("/pics"))
        );
        assert_eq!(first_path_argument(args(&["viewer", "-x"])), None);
        assert_eq!(first_path_argument(args(&["viewer"])), None);
    }

    #[test]
    fn test_directory_argument() {
        let dir = TempDir::new().unwrap();
        let target = resolve_startup_target(Some(dir.path().to_path_buf()));
        assert_eq!(target.directory, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(target.file, None);
    }

    #[test]
    fn test_directory_argument_is_normalised() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();

        let target = resolve_startup_target(Some(dir.path().join("a/../b")));

        assert_eq!(
            target.directory,
            fs::canonicalize(dir.path().join("b")).unwrap()
        );
    }

    #[test]
    fn test_image_argument_selects_file() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("photo.jpg");
        fs::write(&image, b"").unwrap();

        let target = resolve_startup_target(Some(image.clone()));

        let image = fs::canonicalize(image).unwrap();
        assert_eq!(Some(target.directory.as_path()), image.parent());
        assert_eq!(target.file, Some(image));
    }

    #[test]
    fn test_other_arguments_fall_back_to_root() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, b"").unwrap();

        assert_eq!(resolve_startup_target(Some(text)).file, None);
        assert_eq!(
            resolve_startup_target(None).directory,
            filesystem_root(&std::env::current_dir().unwrap())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_filesystem_root() {
        assert_eq!(filesystem_root(Path::new("/usr/share")), PathBuf::from("/"));
        assert_eq!(filesystem_root(Path::new("/")), PathBuf::from("/"));
    }
}
