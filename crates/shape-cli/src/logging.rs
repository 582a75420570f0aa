//! Structured logging for the `shape` command
//!
//! Stdout carries command output (DDL, validation reports), so console logs
//! go to stderr. Formats:
//! - Pretty: human-readable, multi-line
//! - Json: one JSON object per event
//! - Compact: single-line (default)

use thiserror::Error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to create log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl LogFormat {
    /// Unrecognised names fall back to compact
    pub fn from_name(name: &str) -> Self {
        match name {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stderr,
    File,
    Both,
}

impl LogOutput {
    /// Unrecognised names fall back to stderr
    pub fn from_name(name: &str) -> Self {
        match name {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stderr,
        }
    }
}

fn console_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed(),
    }
}

fn file_layer<S>(directory: &str) -> Result<Box<dyn Layer<S> + Send + Sync>, LoggingError>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    std::fs::create_dir_all(directory)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, directory, "shape.log");
    Ok(fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .boxed())
}

/// Initialize the global subscriber from the logging section of the config.
///
/// `level` accepts anything `EnvFilter` does, e.g. `"debug"` or
/// `"shape_core=trace,warn"`.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let format = LogFormat::from_name(&config.format);
    let output = LogOutput::from_name(&config.output);
    let env_filter = EnvFilter::try_new(&config.level)?;

    let registry = tracing_subscriber::registry().with(env_filter);
    match output {
        LogOutput::Stderr => registry.with(console_layer(format)).try_init()?,
        LogOutput::File => registry.with(file_layer(&config.directory)?).try_init()?,
        LogOutput::Both => registry
            .with(console_layer(format))
            .with(file_layer(&config.directory)?)
            .try_init()?,
    }

    tracing::debug!(
        format = ?format,
        output = ?output,
        level = %config.level,
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_name() {
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::from_name("fancy"), LogFormat::Compact);
    }

    #[test]
    fn test_log_output_from_name() {
        assert_eq!(LogOutput::from_name("file"), LogOutput::File);
        assert_eq!(LogOutput::from_name("both"), LogOutput::Both);
        assert_eq!(LogOutput::from_name("stderr"), LogOutput::Stderr);
        assert_eq!(LogOutput::from_name(""), LogOutput::Stderr);
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let config = LoggingConfig {
            level: "shape_core=notalevel".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(init(&config), Err(LoggingError::Filter(_))));
    }
}
