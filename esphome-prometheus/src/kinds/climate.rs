use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::format_float;
use crate::render::RenderContext;

/// Value written for an unset fan mode or preset.
const UNSET: i32 = -1;

/// Climate controllers: setpoints, mode, and whatever optional readings the
/// device's traits advertise.
pub struct ClimateRenderer;

impl KindRenderer for ClimateRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Climate
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_climate"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &[
            "_target_temperature_high",
            "_target_temperature_low",
            "_target_temperature",
            "_mode",
            "_action",
            "_current_temperature",
            "_fan_mode",
            "_swing_mode",
            "_preset",
        ]
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()> {
        let Entity::Climate(climate) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &climate.info, self.default_prefix()) else {
            return Ok(());
        };
        let traits = climate.traits;

        if traits.supports_two_point_target_temperature {
            row.gauge(
                out,
                "_target_temperature_high",
                format_float(climate.target_temperature_high),
            )?;
            row.gauge(
                out,
                "_target_temperature_low",
                format_float(climate.target_temperature_low),
            )?;
        } else {
            row.gauge(
                out,
                "_target_temperature",
                format_float(climate.target_temperature),
            )?;
        }

        row.gauge(out, "_mode", climate.mode as u8)?;

        if traits.supports_action {
            row.gauge(out, "_action", climate.action as u8)?;
        }
        if traits.supports_current_temperature {
            row.gauge(
                out,
                "_current_temperature",
                format_float(climate.current_temperature),
            )?;
        }
        if traits.supports_fan_modes {
            let fan_mode = climate.fan_mode.map_or(UNSET, |mode| mode as i32);
            row.gauge(out, "_fan_mode", fan_mode)?;
        }
        if traits.supports_swing_modes {
            row.gauge(out, "_swing_mode", climate.swing_mode as u8)?;
        }
        if traits.supports_presets {
            let preset = climate.preset.map_or(UNSET, |preset| preset as i32);
            row.gauge(out, "_preset", preset)?;
        }
        Ok(())
    }
}
