use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::format_float;
use crate::render::RenderContext;

pub struct NumberRenderer;

impl KindRenderer for NumberRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Number
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_number"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["_value", "_failed"]
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()> {
        let Entity::Number(number) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &number.info, self.default_prefix()) else {
            return Ok(());
        };

        match number.state {
            Some(state) => {
                row.gauge(out, "_failed", 0)?;
                row.gauge(out, "_value", format_float(state))
            }
            None => row.gauge(out, "_failed", 1),
        }
    }
}
