use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::format_float;
use crate::render::RenderContext;

pub struct CoverRenderer;

impl KindRenderer for CoverRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Cover
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_cover"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["_value", "_tilt", "_failed"]
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()> {
        let Entity::Cover(cover) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &cover.info, self.default_prefix()) else {
            return Ok(());
        };

        if cover.position.is_nan() {
            return row.gauge(out, "_failed", 1);
        }

        row.gauge(out, "_failed", 0)?;
        row.gauge(out, "_value", format_float(cover.position))?;
        if cover.traits.supports_tilt {
            row.gauge(out, "_tilt", format_float(cover.tilt))?;
        }
        Ok(())
    }
}
