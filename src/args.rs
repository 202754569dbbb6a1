//! Command line argument parsing.

use std::ffi::OsString;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use thiserror::Error;

use crate::config;

/// Raised when a command line argument or combination of arguments is invalid
#[derive(Error, Debug)]
#[error("{0}")]
pub struct InvalidArgument(String);

#[derive(Parser, Debug)]
#[command(name = config::PRGNAME, about = config::APP_NAME)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Increase verbosity level
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,

    /// Print version information and exit
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Enable kiosk mode
    #[arg(short, long, overrides_with = "kiosk")]
    kiosk: bool,
}

/// Parsed application configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub verbosity: u8,
    pub kiosk: bool,
}

impl Config {
    /// Log threshold selected by the verbosity count
    pub fn log_level(&self) -> LevelFilter {
        level_for_verbosity(self.verbosity)
    }
}

/// Outcome of a successful parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Start the application
    Run(Config),
    /// Print the text (help or version) and exit successfully
    Exit(String),
}

/// Map a `-v` count to a log threshold: 0 errors only, 3 or more everything
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Version line printed by `--version`
pub fn version_string() -> String {
    format!("{} {}", config::APP_NAME, env!("CARGO_PKG_VERSION"))
}

/// Parse `argv` (program name first) into an invocation
pub fn parse_args<I, T>(argv: I) -> Result<Invocation, InvalidArgument>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(argv) {
        Ok(cli) => Ok(Invocation::Run(Config {
            verbosity: cli.verbosity,
            kiosk: cli.kiosk,
        })),
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayVersion => Ok(Invocation::Exit(version_string())),
            clap::error::ErrorKind::DisplayHelp => Ok(Invocation::Exit(e.render().to_string())),
            _ => Err(InvalidArgument(e.render().to_string().trim_end().to_string())),
        },
    }
}
