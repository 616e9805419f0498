//! Tracing setup.
//!
//! The engine logs through `tracing` macros and never installs a subscriber
//! itself. Applications call [`init_tracing`] once at startup with the
//! `[logging]` section of their [`PointsConfig`](crate::config::PointsConfig).
//!
//! # Example
//! ```no_run
//! use scan_points::{config::PointsConfig, telemetry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PointsConfig::load()?;
//! telemetry::init_tracing(&config.logging)?;
//! tracing::info!("scan engine ready");
//! # Ok(())
//! # }
//! ```

use crate::config::{LogFormat, LoggingSettings};
use scan_core::error::{ScanError, ScanResult};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install a global subscriber for the given settings.
///
/// `RUST_LOG` takes precedence over the configured level. If a subscriber
/// is already installed the call succeeds and leaves it in place.
pub fn init_tracing(settings: &LoggingSettings) -> ScanResult<()> {
    let level = parse_log_level(&settings.level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let layer = match settings.format {
        LogFormat::Pretty => fmt::layer().pretty().with_filter(filter).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_filter(filter).boxed(),
    };

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        tracing::debug!("Global subscriber already installed; keeping it");
    }
    Ok(())
}

fn parse_log_level(level: &str) -> ScanResult<Level> {
    Level::from_str(level).map_err(|_| {
        ScanError::Configuration(format!(
            "Invalid log level '{level}'. Must be one of: trace, debug, info, warn, error"
        ))
    })
}
