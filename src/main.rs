//! GTK Kiosk - minimal GTK4 kiosk application.
//!
//! Architecture:
//! - `args` module: command line parsing
//! - `state` module: GTK-free lifecycle state machine and window sizing (testable)
//! - `runner` module: GLib main loop driven by the lifecycle
//! - `fonts` module: fontconfig registration of bundled fonts
//! - `ui` module: layout loading, callbacks and the main window

use std::ffi::OsString;

use log::LevelFilter;

mod app;
mod args;
mod config;
mod fonts;
mod logging;
mod runner;
mod state;
mod ui;

use args::Invocation;

/// Exit status for invalid command line arguments
const EXIT_INVALID_ARGUMENT: i32 = -1;

/// Exit status when the UI cannot be built or run
const EXIT_FATAL: i32 = 1;

fn main() {
    std::process::exit(real_main(std::env::args_os()));
}

fn real_main<I, T>(argv: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let config = match args::parse_args(argv) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Exit(text)) => {
            println!("{}", text.trim_end());
            return 0;
        }
        Err(e) => {
            logging::init(LevelFilter::Error);
            log::error!("{}", e);
            return EXIT_INVALID_ARGUMENT;
        }
    };

    logging::init(config.log_level());
    log::debug!("Raw arguments: {:?}", config);

    match app::run(config) {
        Ok(_) => {
            log::info!("{} shutting down", config::APP_NAME);
            0
        }
        Err(e) => {
            log::error!("{}", e);
            EXIT_FATAL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // None of these reach `app::run`, so no display is needed.

    #[test]
    fn test_invalid_argument_exit_code() {
        assert_eq!(real_main(["gtk-kiosk", "--bogus"]), EXIT_INVALID_ARGUMENT);
        assert_eq!(real_main(["gtk-kiosk", "-k", "extra"]), EXIT_INVALID_ARGUMENT);
        assert_ne!(EXIT_INVALID_ARGUMENT, 0);
    }

    #[test]
    fn test_version_and_help_exit_zero() {
        assert_eq!(real_main(["gtk-kiosk", "--version"]), 0);
        assert_eq!(real_main(["gtk-kiosk", "--help"]), 0);
        assert_eq!(real_main(["gtk-kiosk", "-k", "--version"]), 0);
    }
}
