use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::format_bool;
use crate::render::RenderContext;

/// Fans: on/off always, speed and oscillation when the fan supports them.
pub struct FanRenderer;

impl KindRenderer for FanRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Fan
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_fan"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["_value", "_speed", "_oscillation"]
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()> {
        let Entity::Fan(fan) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &fan.info, self.default_prefix()) else {
            return Ok(());
        };

        row.gauge(out, "_value", format_bool(fan.state))?;
        if fan.traits.supports_speed {
            row.gauge(out, "_speed", fan.speed)?;
        }
        if fan.traits.supports_oscillation {
            row.gauge(out, "_oscillation", format_bool(fan.oscillating))?;
        }
        Ok(())
    }
}
