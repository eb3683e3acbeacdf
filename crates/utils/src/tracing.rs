use textcache_core::TEXTCACHE_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use ::tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize a stderr tracing subscriber for hosts that do not install their own.
///
/// The filter comes from `TEXTCACHE_LOG`, then `RUST_LOG`, then defaults to `info`.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(TEXTCACHE_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Create a span covering one attribute operation
pub fn attribute_span(operation: &str, attribute: &str) -> Span {
    span!(Level::DEBUG, "text_attribute", operation = %operation, attribute = %attribute)
}
