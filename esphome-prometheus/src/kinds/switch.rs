use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::format_bool;
use crate::render::RenderContext;

pub struct SwitchRenderer;

impl KindRenderer for SwitchRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Switch
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_switch"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["_value"]
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()> {
        let Entity::Switch(switch) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &switch.info, self.default_prefix()) else {
            return Ok(());
        };

        row.gauge(out, "_value", format_bool(switch.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::test_support::row;
    use esphome_common::{EntityInfo, Switch};

    #[test]
    fn test_switch_row() {
        let relay = Switch {
            info: EntityInfo::new("relay1", "Relay"),
            state: true,
        };
        assert_eq!(
            row(&SwitchRenderer, relay),
            "esphome_switch_value{id=\"relay1\",name=\"Relay\"} 1\n"
        );
    }
}
