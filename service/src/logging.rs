use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::str::FromStr;

pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let level = log::LevelFilter::from_str(&config.level)
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d][%H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        // reqwest/hyper internals are noisy at debug
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(std::io::stdout());

    if let Some(ref path) = config.output {
        dispatch = dispatch.chain(
            fern::log_file(path).with_context(|| format!("Failed to open log file: {:?}", path))?,
        );
    }

    dispatch.apply()?;
    Ok(())
}
