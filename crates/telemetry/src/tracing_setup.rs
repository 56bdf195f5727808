//! Tracing setup for structured logging.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// JSON lines with file/line fields, for log shippers.
    Json,
}

impl LogFormat {
    /// Parse a config value; anything other than `json` is text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Initialize tracing with an explicit filter and format.
///
/// `RUST_LOG` overrides `filter` when set. Fails if a global
/// subscriber is already installed, which callers in tests ignore.
pub fn try_init_tracing(filter: &str, format: LogFormat) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true))
            .try_init()?,
    }

    tracing::debug!(filter, "tracing initialized");
    Ok(())
}

/// Initialize tracing from `RUST_LOG` and `LOG_FORMAT`.
pub fn init_tracing_from_env() {
    let format = std::env::var("LOG_FORMAT")
        .map(|v| LogFormat::parse(&v))
        .unwrap_or_default();
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    if let Err(e) = try_init_tracing(&filter, format) {
        eprintln!("tracing already initialized: {e}");
    }
}
