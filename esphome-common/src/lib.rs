//! ESPHome Prometheus Common Library
//!
//! This crate provides the types shared by the exporter and its collaborators:
//!
//! - [`entity`] - Entity data model (`Entity`, `EntityKind`, `EntityKey`, per-kind state)
//! - [`snapshot`] - JSON encoding of entity state snapshots
//! - [`config`] - Logging configuration
//! - [`error`] - Error types

pub mod config;
pub mod entity;
pub mod error;
pub mod snapshot;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig};
pub use entity::{
    BinarySensor, Climate, ClimateAction, ClimateFanMode, ClimateMode, ClimatePreset,
    ClimateSwingMode, ClimateTraits, Cover, CoverTraits, Entity, EntityInfo, EntityKey,
    EntityKind, Fan, FanTraits, Light, LightColorValues, Lock, LockState, Number, Sensor, Switch,
};
pub use error::{Error, Result};
pub use snapshot::load_snapshot;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
