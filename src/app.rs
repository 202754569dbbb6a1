//! Application startup: process identity, logging of the environment and the
//! UI lifecycle.

use crate::args::Config;
use crate::config::{self, Resources};
use crate::state::StopReason;
use crate::ui::{AppUi, UiError};

/// Build the UI for `config` and run it until the loop stops
pub fn run(config: Config) -> Result<StopReason, UiError> {
    if let Err(e) = set_process_name() {
        log::warn!("Could not set process name: {}", e);
    }
    glib::set_prgname(Some(config::PRGNAME));
    glib::set_application_name(config::APP_NAME);

    log::info!("Starting {} {}", config::APP_NAME, env!("CARGO_PKG_VERSION"));
    log::info!(
        "Started by user UID {} using PID {}",
        nix::unistd::getuid(),
        std::process::id()
    );

    let resources = Resources::locate();
    log::debug!("Resources at {}", resources.root().display());

    log::info!("Creating UI ...");
    let ui = AppUi::new(config.kiosk, &resources)?;

    log::info!("Starting UI ...");
    ui.start()
}

/// Rename the process as seen by `ps`, replacing the executable name
#[cfg(target_os = "linux")]
fn set_process_name() -> nix::Result<()> {
    nix::sys::prctl::set_name(config::PROCESS_NAME)
}

#[cfg(not(target_os = "linux"))]
fn set_process_name() -> nix::Result<()> {
    Ok(())
}
