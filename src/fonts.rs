//! Application font registration through fontconfig.
//!
//! Fonts in the resource directory are added to the process-wide fontconfig
//! configuration so the stylesheet can refer to their families by name. This
//! must run before the toolkit creates its first font map.

use std::ffi::{c_char, c_int, c_void, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libloading::{Library, Symbol};
use thiserror::Error;

/// SONAME of the fontconfig runtime library
pub const FONTCONFIG_LIBRARY: &str = "libfontconfig.so.1";

#[derive(Error, Debug)]
pub enum FontError {
    #[error("fontconfig library error: {0}")]
    Library(#[from] libloading::Error),
    #[error("fontconfig has no current configuration")]
    NoConfig,
    #[error("Font directory path contains a NUL byte: {0}")]
    InvalidPath(String),
    #[error("fontconfig refused font directory {0}")]
    Rejected(String),
}

/// Something fonts can be registered with
pub trait FontRegistry {
    /// Add every font file in `dir` to the registry
    fn add_font_dir(&self, dir: &Path) -> Result<(), FontError>;
}

type FcConfigGetCurrent = unsafe extern "C" fn() -> *mut c_void;
type FcConfigReference = unsafe extern "C" fn(*mut c_void) -> *mut c_void;
type FcConfigAppFontAddDir = unsafe extern "C" fn(*mut c_void, *const c_char) -> c_int;

/// Handle on the system fontconfig library.
///
/// The library stays loaded for as long as this value lives. The config
/// reference taken on registration is never released since the fonts must
/// stay available for the rest of the process.
pub struct Fontconfig {
    lib: Library,
}

impl Fontconfig {
    pub fn open() -> Result<Self, FontError> {
        // SAFETY: loading fontconfig runs no initialisers with preconditions.
        let lib = unsafe { Library::new(FONTCONFIG_LIBRARY)? };
        Ok(Self { lib })
    }
}

impl FontRegistry for Fontconfig {
    fn add_font_dir(&self, dir: &Path) -> Result<(), FontError> {
        let path = CString::new(dir.as_os_str().as_bytes())
            .map_err(|_| FontError::InvalidPath(dir.display().to_string()))?;

        // SAFETY: signatures match fontconfig's public C API, and `path`
        // outlives the call.
        unsafe {
            let get_current: Symbol<FcConfigGetCurrent> = self.lib.get(b"FcConfigGetCurrent\0")?;
            let reference: Symbol<FcConfigReference> = self.lib.get(b"FcConfigReference\0")?;
            let add_dir: Symbol<FcConfigAppFontAddDir> =
                self.lib.get(b"FcConfigAppFontAddDir\0")?;

            let config = reference(get_current());
            if config.is_null() {
                return Err(FontError::NoConfig);
            }

            if add_dir(config, path.as_ptr()) == 0 {
                return Err(FontError::Rejected(dir.display().to_string()));
            }
        }

        Ok(())
    }
}

/// Register `dir` with the system fontconfig, best-effort.
///
/// Failures are logged and swallowed; the UI still starts with system fonts.
pub fn load_fonts(dir: &Path) {
    match Fontconfig::open() {
        Ok(fc) => register(&fc, dir),
        Err(e) => log::warn!("Application fonts unavailable: {}", e),
    }
}

/// Register `dir` with `registry`, logging instead of failing
pub fn register(registry: &impl FontRegistry, dir: &Path) {
    log::debug!("Registering font directory {}", dir.display());

    match registry.add_font_dir(dir) {
        Ok(()) => log::info!("Loaded application fonts from {}", dir.display()),
        Err(e) => log::warn!("Application fonts unavailable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingRegistry {
        dirs: RefCell<Vec<PathBuf>>,
        refuse: bool,
    }

    impl FontRegistry for RecordingRegistry {
        fn add_font_dir(&self, dir: &Path) -> Result<(), FontError> {
            self.dirs.borrow_mut().push(dir.to_path_buf());
            if self.refuse {
                Err(FontError::Rejected(dir.display().to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_register_adds_directory_once() {
        let registry = RecordingRegistry::default();
        register(&registry, Path::new("/data/assets/fonts"));
        assert_eq!(
            *registry.dirs.borrow(),
            vec![PathBuf::from("/data/assets/fonts")]
        );
    }

    #[test]
    fn test_register_failure_is_swallowed() {
        let registry = RecordingRegistry {
            refuse: true,
            ..Default::default()
        };
        register(&registry, Path::new("/missing"));
        assert_eq!(registry.dirs.borrow().len(), 1);
    }

    #[test]
    fn test_load_fonts_never_panics() {
        load_fonts(Path::new("/nonexistent/fonts"));
    }

    #[test]
    fn test_error_messages() {
        let err = FontError::Rejected("/x".into());
        assert_eq!(err.to_string(), "fontconfig refused font directory /x");
        assert_eq!(
            FontError::NoConfig.to_string(),
            "fontconfig has no current configuration"
        );
    }
}
