//! Logger setup for binaries.
//!
//! The library itself only uses the `log` macros; this installs a `fern` dispatcher that
//! writes `[HH:MM:SS.mmm LEVEL target] message` lines to stderr.

use log::LevelFilter;

fn dispatch(level: LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // GL loaders are chatty at trace level.
        .level_for("glow", LevelFilter::Warn)
}

/// Installs the global logger. Fails if a logger is already set.
pub fn setup_logger(level: LevelFilter) -> Result<(), fern::InitError> {
    dispatch(level).chain(std::io::stderr()).apply()?;
    Ok(())
}
