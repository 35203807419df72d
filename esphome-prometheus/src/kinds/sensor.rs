use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::value_accuracy_to_string;
use crate::relabel::UNIT_LABEL;
use crate::render::RenderContext;

/// Numeric sensors: `_failed` always, `_value` with a `unit` label when valid.
pub struct SensorRenderer;

impl KindRenderer for SensorRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Sensor
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_sensor"
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
        let Entity::Sensor(sensor) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &sensor.info, self.default_prefix()) else {
            return Ok(());
        };

        if sensor.state.is_nan() {
            return row.gauge(out, "_failed", 1);
        }

        row.gauge(out, "_failed", 0)?;
        row.gauge_with(
            out,
            "_value",
            (UNIT_LABEL, sensor.unit_of_measurement.as_str()),
            value_accuracy_to_string(sensor.state, sensor.accuracy_decimals),
        )
    }
}
