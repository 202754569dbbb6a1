//! Configuration constants and resource paths for the kiosk.

use std::env;
use std::ffi::CStr;
use std::path::{Path, PathBuf};

/// Human readable application name, used for `--version` and the window title
pub const APP_NAME: &str = "GTK Kiosk";

/// Program name reported to GLib, used as the window class and in messages
pub const PRGNAME: &str = "gtk-kiosk";

/// Process name shown by `ps` and `top` (kernel limit: 15 bytes)
pub const PROCESS_NAME: &CStr = c"gtk-kiosk";

/// Default window width outside of kiosk mode
pub const DEFAULT_WIDTH: i32 = 800;

/// Default window height outside of kiosk mode
pub const DEFAULT_HEIGHT: i32 = 480;

/// Environment variable overriding the resource root
pub const DATA_DIR_ENV: &str = "GTK_KIOSK_DATA_DIR";

/// Builder object id of the main window
pub const MAIN_WINDOW_ID: &str = "window";

/// Builder object id of the secondary dialog
pub const DIALOG_ID: &str = "my_dialog";

const LAYOUT_FILE: &str = "ui.ui";
const STYLESHEET_FILE: &str = "assets/style.css";
const FONTS_DIR: &str = "assets/fonts";

/// Resource files consumed by the UI, all relative to one data root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    root: PathBuf,
}

impl Resources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the data root for the running application.
    ///
    /// Resolution order: `GTK_KIOSK_DATA_DIR`, a `data` directory next to the
    /// executable, then the `data` directory of the source tree.
    pub fn locate() -> Self {
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return Self::new(dir);
        }

        let beside_exe = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("data")))
            .filter(|dir| dir.is_dir());

        match beside_exe {
            Some(dir) => Self::new(dir),
            None => Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// GtkBuilder layout file
    pub fn layout(&self) -> PathBuf {
        self.root.join(LAYOUT_FILE)
    }

    /// CSS stylesheet applied at display scope
    pub fn stylesheet(&self) -> PathBuf {
        self.root.join(STYLESHEET_FILE)
    }

    /// Directory of font files registered with fontconfig
    pub fn fonts_dir(&self) -> PathBuf {
        self.root.join(FONTS_DIR)
    }
}
