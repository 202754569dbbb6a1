//! Logger setup: verbosity threshold plus a colored single-line format.

use std::io::Write;

use env_logger::Env;
use log::LevelFilter;

/// Install the global logger.
///
/// `RUST_LOG` takes precedence over the verbosity threshold when set. Calling
/// this more than once keeps the first logger.
pub fn init(level: LevelFilter) {
    let mut builder = builder(level);
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

fn builder(level: LevelFilter) -> env_logger::Builder {
    let env = Env::default().default_filter_or(level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "  {} | {style}{:8}{style:#} | {}",
            buf.timestamp_millis(),
            record.level(),
            record.args()
        )
    });

    builder
}
