//! File logging. The terminal belongs to the UI, so nothing goes to stdout.

use std::io;
use std::str::FromStr;

use log::{LevelFilter, SetLoggerError};
use log4rs::append::file::FileAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use thiserror::Error;

use super::settings::LogSettings;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unknown log level {0:?}")]
    Level(String),
    #[error("failed to open log file: {0}")]
    File(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigErrors),
    #[error(transparent)]
    Init(#[from] SetLoggerError),
}

pub fn build_config(settings: &LogSettings) -> Result<Config, LoggingError> {
    let level = LevelFilter::from_str(&settings.level)
        .map_err(|_| LoggingError::Level(settings.level.clone()))?;

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(&settings.file)?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))?;
    Ok(config)
}

/// Installs the global logger. Call once, before the terminal is taken over.
pub fn init_logging(settings: &LogSettings) -> Result<Handle, LoggingError> {
    let config = build_config(settings)?;
    Ok(log4rs::init_config(config)?)
}
