//! Observability (logging)
//!
//! Structured logging for the generation pipeline. Pipeline stages log via
//! `tracing`; hosts call [`init`] once at startup to install a subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log format (`pretty`, `compact` or `json`)
pub const LOG_FORMAT_ENV: &str = "APIFORGE_LOG_FORMAT";

/// Output format of the log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human readable output
    #[default]
    Compact,
    /// Multi-line human readable output
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Read the format from [`LOG_FORMAT_ENV`], falling back to compact output
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Map a `-v` count to a default filter directive
#[must_use]
pub const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info,apiforge=info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize logging
///
/// `RUST_LOG` wins over the verbosity-derived default. Events go to stderr so
/// generated sources printed on stdout stay clean.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use apiforge::observability;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// observability::init(1)?;
/// tracing::info!("Generator started");
/// # Ok(())
/// # }
/// ```
pub fn init(verbosity: u8) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match LogFormat::from_env() {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
    }
}
