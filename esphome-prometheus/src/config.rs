//! Configuration for the Prometheus exporter.

use std::collections::BTreeMap;
use std::path::Path;

use esphome_common::{EntityKey, LoggingConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exposition::LabelEscaping;
use crate::relabel::{ID_LABEL, METRIC_NAME_LABEL, NAME_LABEL, ROW_LABELS, RelabelStore};
use crate::render::RenderOptions;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Prometheus endpoint settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,

    /// Label overrides keyed by `kind.object_id`.
    #[serde(default)]
    pub relabel: BTreeMap<String, BTreeMap<String, String>>,

    /// Where entity state comes from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prometheus HTTP endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Address to listen on (default: "0.0.0.0:6053").
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,

    /// Render entities marked internal.
    #[serde(default)]
    pub include_internal: bool,

    /// Escape `\`, `"` and newlines in label values.
    #[serde(default)]
    pub escape_label_values: bool,
}

fn default_listen() -> String {
    "0.0.0.0:6053".to_string()
}

fn default_path() -> String {
    "/metrics".to_string()
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            include_internal: false,
            escape_label_values: false,
        }
    }
}

/// Entity state source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON snapshot of entity state. Without one the registry stays empty.
    #[serde(default)]
    pub state_file: Option<String>,

    /// How often the snapshot is re-read (seconds).
    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,
}

fn default_reload_interval() -> u64 {
    5
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            reload_interval_secs: default_reload_interval(),
        }
    }
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = json5::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .prometheus
            .listen
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address: {}",
                self.prometheus.listen
            )));
        }

        if !self.prometheus.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "Metrics path must start with /".to_string(),
            ));
        }

        if self.source.reload_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "reload_interval_secs must be > 0".to_string(),
            ));
        }

        for (entity, labels) in &self.relabel {
            validate_relabel_entry(entity, labels)?;
        }

        Ok(())
    }

    /// Build the relabel store described by the `relabel` section.
    pub fn relabel_store(&self) -> Result<RelabelStore, ConfigError> {
        let mut store = RelabelStore::new();

        for (entity, labels) in &self.relabel {
            let key = parse_entity_key(entity)?;
            for (name, value) in labels {
                match name.as_str() {
                    ID_LABEL => store.add_id_override(key.clone(), value),
                    NAME_LABEL => store.add_name_override(key.clone(), value),
                    _ => store.add_label(key.clone(), name, value),
                }
            }
        }

        Ok(store)
    }

    /// Rendering options described by the `prometheus` section.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            include_internal: self.prometheus.include_internal,
            escaping: if self.prometheus.escape_label_values {
                LabelEscaping::Escaped
            } else {
                LabelEscaping::Verbatim
            },
        }
    }
}

fn parse_entity_key(entity: &str) -> Result<EntityKey, ConfigError> {
    entity
        .parse()
        .map_err(|e| ConfigError::Validation(format!("Invalid relabel key '{}': {}", entity, e)))
}

fn validate_relabel_entry(
    entity: &str,
    labels: &BTreeMap<String, String>,
) -> Result<(), ConfigError> {
    parse_entity_key(entity)?;

    if labels.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Relabel entry '{}' must set at least one label",
            entity
        )));
    }

    for (name, value) in labels {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Relabel entry '{}': value of '{}' must not be empty",
                entity, name
            )));
        }

        if name == METRIC_NAME_LABEL {
            if !is_valid_metric_name(value) {
                return Err(ConfigError::Validation(format!(
                    "Relabel entry '{}': invalid metric name '{}'",
                    entity, value
                )));
            }
        } else if !is_valid_label_name(name) {
            return Err(ConfigError::Validation(format!(
                "Relabel entry '{}': invalid label name '{}'",
                entity, name
            )));
        } else if ROW_LABELS.contains(&name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Relabel entry '{}': label '{}' is reserved for metric rows",
                entity, name
            )));
        }
    }

    Ok(())
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, reserved `__` prefix excluded.
fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with("__")
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
