//! Render driver: walks the registered kinds and writes one exposition document.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use esphome_common::{EntityInfo, EntityKind};
use tracing::debug;

use crate::exposition::LabelEscaping;
use crate::kinds::{KindRenderer, default_renderers};
use crate::registry::EntityRegistry;
use crate::relabel::RelabelStore;

/// Content type of the rendered document.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Options fixed when the renderer is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render entities marked internal.
    pub include_internal: bool,
    /// How label values are written.
    pub escaping: LabelEscaping,
}

/// Read-only state shared by every row of a render.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub relabel: &'a RelabelStore,
    pub include_internal: bool,
    pub escaping: LabelEscaping,
}

impl RenderContext<'_> {
    /// Whether rows of the entity are written at all.
    pub fn is_visible(&self, info: &EntityInfo) -> bool {
        !info.internal || self.include_internal
    }
}

/// Renders entity state in the Prometheus text exposition format.
pub struct MetricRenderer {
    renderers: Vec<Box<dyn KindRenderer>>,
    relabel: RelabelStore,
    options: RenderOptions,
}

impl MetricRenderer {
    /// Create a renderer for every compiled-in kind.
    pub fn new(relabel: RelabelStore, options: RenderOptions) -> Self {
        Self::with_renderers(relabel, options, default_renderers())
    }

    /// Create a renderer for an explicit, ordered set of kinds.
    pub fn with_renderers(
        relabel: RelabelStore,
        options: RenderOptions,
        renderers: Vec<Box<dyn KindRenderer>>,
    ) -> Self {
        Self {
            renderers,
            relabel,
            options,
        }
    }

    /// Kinds rendered, in order.
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.renderers.iter().map(|r| r.kind()).collect()
    }

    /// Write the full document for the current registry state into `out`.
    ///
    /// Each kind gets its `#TYPE` declarations once, followed by the rows of
    /// every entity of that kind. Only sink errors are returned.
    pub fn render(&self, registry: &dyn EntityRegistry, out: &mut dyn Write) -> io::Result<()> {
        let start = Instant::now();
        let ctx = RenderContext {
            relabel: &self.relabel,
            include_internal: self.options.include_internal,
            escaping: self.options.escaping,
        };
        let mut rendered = 0usize;

        for renderer in &self.renderers {
            renderer.write_type(out)?;
            for entity in registry.entities(renderer.kind()) {
                renderer.write_row(out, &entity, &ctx)?;
                if ctx.is_visible(entity.info()) {
                    rendered += 1;
                }
            }
        }

        debug!(
            kinds = self.renderers.len(),
            rendered,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Rendered metrics"
        );
        Ok(())
    }

    /// Render into a string.
    pub fn render_to_string(&self, registry: &dyn EntityRegistry) -> io::Result<String> {
        let mut buf = Vec::with_capacity(4096);
        self.render(registry, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Create a shareable renderer handle.
pub type SharedRenderer = Arc<MetricRenderer>;
