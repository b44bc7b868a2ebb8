//! Structured logging for the regionseg CLI.
//!
//! Diagnostics go to `stderr` through a global `tracing` subscriber so the
//! segmentation report on `stdout` stays machine-readable. `RUST_LOG`
//! selects the level (default `info`) and `REGIONSEG_LOG_FORMAT` selects
//! human or JSON output. The `log` facade is bridged into `tracing`.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "REGIONSEG_LOG_FORMAT";
const DEFAULT_FILTER: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Output format of the diagnostic stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per event, including the active span list.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Errors raised while configuring structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `REGIONSEG_LOG_FORMAT` held invalid UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
    },
    /// `REGIONSEG_LOG_FORMAT` named an unknown format.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value supplied by the user.
        provided: String,
    },
}

/// Reads the requested log format from the environment.
///
/// # Errors
/// Returns [`LoggingError`] when the variable is not valid UTF-8 or names an
/// unknown format.
pub fn format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => raw.parse(),
        Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
        Err(env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
        }),
    }
}

/// Installs the global subscriber once; later calls are no-ops.
///
/// When another subscriber already owns the global slot it is kept and a
/// warning is sent through it.
///
/// # Errors
/// Returns [`LoggingError`] when the format environment variable is invalid.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let format = format_from_env()?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let layer = match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // The bridge is best-effort: an existing `log` logger stays in charge.
    if LogTracer::init().is_err() {
        tracing::debug!("log facade already bridged");
    }

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
    {
        tracing::warn!(error = %err, "structured logging already configured elsewhere");
    }
    INSTALLED.get_or_init(|| ());
    Ok(())
}
