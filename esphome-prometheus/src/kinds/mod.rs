//! Per-kind metric renderers.
//!
//! Each entity kind has one [`KindRenderer`] declaring the sub-metrics the
//! kind can produce and writing the rows of a single entity. Kinds are
//! registered by [`default_renderers`], each behind the cargo feature of the
//! same name.

use std::fmt::Display;
use std::io::{self, Write};

use esphome_common::{Entity, EntityInfo, EntityKey, EntityKind};
use tracing::trace;

use crate::exposition::{LabelSet, write_metric_start};
use crate::render::RenderContext;

#[cfg(feature = "binary_sensor")]
mod binary_sensor;
#[cfg(feature = "climate")]
mod climate;
#[cfg(feature = "cover")]
mod cover;
#[cfg(feature = "fan")]
mod fan;
#[cfg(feature = "light")]
mod light;
#[cfg(feature = "lock")]
mod lock;
#[cfg(feature = "number")]
mod number;
#[cfg(feature = "sensor")]
mod sensor;
#[cfg(feature = "switch")]
mod switch;

#[cfg(feature = "binary_sensor")]
pub use binary_sensor::BinarySensorRenderer;
#[cfg(feature = "climate")]
pub use climate::ClimateRenderer;
#[cfg(feature = "cover")]
pub use cover::CoverRenderer;
#[cfg(feature = "fan")]
pub use fan::FanRenderer;
#[cfg(feature = "light")]
pub use light::LightRenderer;
#[cfg(feature = "lock")]
pub use lock::LockRenderer;
#[cfg(feature = "number")]
pub use number::NumberRenderer;
#[cfg(feature = "sensor")]
pub use sensor::SensorRenderer;
#[cfg(feature = "switch")]
pub use switch::SwitchRenderer;

/// Rendering rules for one entity kind.
pub trait KindRenderer: Send + Sync {
    /// Kind of entity this renderer handles.
    fn kind(&self) -> EntityKind;

    /// Default metric name prefix, e.g. `esphome_sensor`.
    fn default_prefix(&self) -> &'static str;

    /// Every sub-metric suffix the kind can ever produce.
    fn suffixes(&self) -> &'static [&'static str];

    /// Write one `#TYPE` line per sub-metric.
    fn write_type(&self, out: &mut dyn Write) -> io::Result<()> {
        for suffix in self.suffixes() {
            writeln!(out, "#TYPE {}{} GAUGE", self.default_prefix(), suffix)?;
        }
        Ok(())
    }

    /// Write the metric rows of one entity.
    ///
    /// Entities of another kind are ignored.
    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()>;
}

/// Renderers for every compiled-in kind, in rendering order.
pub fn default_renderers() -> Vec<Box<dyn KindRenderer>> {
    #[allow(unused_mut)]
    let mut renderers: Vec<Box<dyn KindRenderer>> = Vec::with_capacity(EntityKind::ALL.len());

    #[cfg(feature = "sensor")]
    renderers.push(Box::new(SensorRenderer));
    #[cfg(feature = "binary_sensor")]
    renderers.push(Box::new(BinarySensorRenderer));
    #[cfg(feature = "fan")]
    renderers.push(Box::new(FanRenderer));
    #[cfg(feature = "light")]
    renderers.push(Box::new(LightRenderer));
    #[cfg(feature = "cover")]
    renderers.push(Box::new(CoverRenderer));
    #[cfg(feature = "switch")]
    renderers.push(Box::new(SwitchRenderer));
    #[cfg(feature = "number")]
    renderers.push(Box::new(NumberRenderer));
    #[cfg(feature = "climate")]
    renderers.push(Box::new(ClimateRenderer));
    #[cfg(feature = "lock")]
    renderers.push(Box::new(LockRenderer));

    renderers
}

/// Writer for the rows of a single visible entity.
pub(crate) struct Row<'a> {
    ctx: &'a RenderContext<'a>,
    key: EntityKey,
    info: &'a EntityInfo,
    metric_name: &'a str,
}

impl<'a> Row<'a> {
    /// Resolve the metric name of an entity, or `None` if it is hidden.
    pub(crate) fn begin(
        ctx: &'a RenderContext<'a>,
        kind: EntityKind,
        info: &'a EntityInfo,
        default_prefix: &'static str,
    ) -> Option<Self> {
        let key = EntityKey::new(kind, info.object_id.as_str());

        if !ctx.is_visible(info) {
            trace!(entity = %key, "Skipping internal entity");
            return None;
        }

        let metric_name = ctx.relabel.metric_name_prefix_for(&key, default_prefix);
        Some(Self {
            ctx,
            key,
            info,
            metric_name,
        })
    }

    fn start(&self, out: &mut dyn Write, suffix: &str) -> io::Result<()> {
        write_metric_start(
            out,
            &self.key,
            self.info,
            self.ctx.relabel,
            self.ctx.escaping,
            self.metric_name,
            suffix,
        )
    }

    /// Write `<name><suffix>{<labels>} <value>`.
    pub(crate) fn gauge(
        &self,
        out: &mut dyn Write,
        suffix: &str,
        value: impl Display,
    ) -> io::Result<()> {
        self.start(out, suffix)?;
        writeln!(out, "}} {}", value)
    }

    /// Write `<name><suffix>{<labels>,<label>="<label value>"} <value>`.
    pub(crate) fn gauge_with(
        &self,
        out: &mut dyn Write,
        suffix: &str,
        label: (&str, &str),
        value: impl Display,
    ) -> io::Result<()> {
        self.start(out, suffix)?;
        LabelSet::continuing(out, self.ctx.escaping).push(label.0, label.1)?;
        writeln!(out, "}} {}", value)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use esphome_common::Entity;

    use super::KindRenderer;
    use crate::exposition::LabelEscaping;
    use crate::relabel::RelabelStore;
    use crate::render::RenderContext;

    /// Render a single entity row with the given relabeling.
    pub fn row_with(renderer: &dyn KindRenderer, entity: Entity, relabel: &RelabelStore) -> String {
        let ctx = RenderContext {
            relabel,
            include_internal: false,
            escaping: LabelEscaping::Verbatim,
        };
        let mut buf = Vec::new();
        renderer.write_row(&mut buf, &entity, &ctx).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Render a single entity row without relabeling.
    pub fn row(renderer: &dyn KindRenderer, entity: impl Into<Entity>) -> String {
        row_with(renderer, entity.into(), &RelabelStore::new())
    }

    /// Metric lines whose name starts with `metric`.
    pub fn lines_of<'a>(output: &'a str, metric: &str) -> Vec<&'a str> {
        output
            .lines()
            .filter(|line| {
                line.split('{')
                    .next()
                    .is_some_and(|name| name == metric)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renderers_follow_kind_order() {
        let kinds: Vec<EntityKind> = default_renderers().iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, EntityKind::ALL.to_vec());
    }

    #[test]
    fn test_type_declarations_use_default_prefix() {
        for renderer in default_renderers() {
            let mut buf = Vec::new();
            renderer.write_type(&mut buf).unwrap();
            let output = String::from_utf8(buf).unwrap();

            assert_eq!(output.lines().count(), renderer.suffixes().len());
            for line in output.lines() {
                assert!(line.starts_with(&format!("#TYPE {}_", renderer.default_prefix())));
                assert!(line.ends_with(" GAUGE"));
            }
        }
    }

    #[test]
    fn test_prefixes_derive_from_kind() {
        for renderer in default_renderers() {
            assert_eq!(
                renderer.default_prefix(),
                format!("esphome_{}", renderer.kind().as_str())
            );
        }
    }
}
