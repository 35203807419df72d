//! Prometheus metrics renderer for ESPHome-style entities.
//!
//! Renders the live state of a device's entities (sensors, switches, lights,
//! climate controllers...) in the Prometheus text exposition format and
//! serves it on an HTTP endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  State snapshot │────>│   EntityStore   │────>│ MetricRenderer  │──> /metrics
//! │  (JSON, reload) │     │   (registry)    │     │ (+ RelabelStore)│
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Every render writes, per kind and in a fixed kind order, one `#TYPE` line
//! per sub-metric followed by the rows of each entity of that kind:
//!
//! ```text
//! #TYPE esphome_sensor_value GAUGE
//! #TYPE esphome_sensor_failed GAUGE
//! esphome_sensor_failed{id="temp1",name="Living Room Temp"} 0
//! esphome_sensor_value{id="temp1",name="Living Room Temp",unit="°C"} 21.47
//! ```
//!
//! # Usage
//!
//! ```bash
//! esphome-prometheus --config config.json5
//! ```
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod config;
pub mod exposition;
pub mod format;
pub mod http;
pub mod kinds;
pub mod registry;
pub mod relabel;
pub mod render;

pub use config::{ConfigError, ExporterConfig};
pub use exposition::LabelEscaping;
pub use http::HttpServer;
pub use kinds::{KindRenderer, default_renderers};
pub use registry::{EntityRegistry, EntityStore, SharedRegistry};
pub use relabel::RelabelStore;
pub use render::{CONTENT_TYPE, MetricRenderer, RenderOptions, SharedRenderer};
