use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::format_bool;
use crate::render::RenderContext;

pub struct BinarySensorRenderer;

impl KindRenderer for BinarySensorRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::BinarySensor
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_binary_sensor"
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
        let Entity::BinarySensor(sensor) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &sensor.info, self.default_prefix()) else {
            return Ok(());
        };

        match sensor.state {
            Some(state) => {
                row.gauge(out, "_failed", 0)?;
                row.gauge(out, "_value", format_bool(state))
            }
            None => row.gauge(out, "_failed", 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::test_support::row;
    use esphome_common::{BinarySensor, EntityInfo};

    fn door(state: Option<bool>) -> BinarySensor {
        BinarySensor {
            info: EntityInfo::new("door", "Front Door"),
            state,
        }
    }

    #[test]
    fn test_without_state_only_failed() {
        assert_eq!(
            row(&BinarySensorRenderer, door(None)),
            "esphome_binary_sensor_failed{id=\"door\",name=\"Front Door\"} 1\n"
        );
    }

    #[test]
    fn test_with_state() {
        assert_eq!(
            row(&BinarySensorRenderer, door(Some(true))),
            "esphome_binary_sensor_failed{id=\"door\",name=\"Front Door\"} 0\n\
             esphome_binary_sensor_value{id=\"door\",name=\"Front Door\"} 1\n"
        );
        assert!(row(&BinarySensorRenderer, door(Some(false))).ends_with("} 0\n"));
    }
}
