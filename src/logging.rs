use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

use crate::errors::ServerError;

/// Map a config level string to a filter. Unknown values fall back to INFO.
pub fn level_from_str(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Install the global fmt subscriber. Call once per process.
pub fn init(level: &str) -> Result<(), ServerError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_from_str(level))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
