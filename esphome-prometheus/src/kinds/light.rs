use std::io::{self, Write};

use esphome_common::{Entity, EntityKind};

use super::{KindRenderer, Row};
use crate::format::{format_bool, format_float};
use crate::relabel::{CHANNEL_LABEL, EFFECT_LABEL};
use crate::render::RenderContext;

/// Effect name reported when no effect is running.
const NO_EFFECT: &str = "None";

/// Lights: on/off, five color channels and the active effect.
pub struct LightRenderer;

impl KindRenderer for LightRenderer {
    fn kind(&self) -> EntityKind {
        EntityKind::Light
    }

    fn default_prefix(&self) -> &'static str {
        "esphome_light"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &["_state", "_color", "_effect_active"]
    }

    fn write_row(
        &self,
        out: &mut dyn Write,
        entity: &Entity,
        ctx: &RenderContext<'_>,
    ) -> io::Result<()> {
        let Entity::Light(light) = entity else {
            return Ok(());
        };
        let Some(row) = Row::begin(ctx, self.kind(), &light.info, self.default_prefix()) else {
            return Ok(());
        };

        row.gauge(out, "_state", format_bool(light.remote_values.is_on()))?;

        let color = light.current_values;
        let brightness = color.as_brightness();
        let (r, g, b, w) = color.as_rgbw();
        for (channel, value) in [
            ("brightness", brightness),
            ("r", r),
            ("g", g),
            ("b", b),
            ("w", w),
        ] {
            row.gauge_with(out, "_color", (CHANNEL_LABEL, channel), format_float(value))?;
        }

        let effect = light.effect_name();
        if effect == NO_EFFECT {
            row.gauge_with(out, "_effect_active", (EFFECT_LABEL, NO_EFFECT), 0)
        } else {
            row.gauge_with(out, "_effect_active", (EFFECT_LABEL, effect), 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::test_support::{lines_of, row};
    use esphome_common::{EntityInfo, Light, LightColorValues};

    fn lamp(effect: Option<&str>) -> Light {
        let on = LightColorValues {
            state: 1.0,
            brightness: 0.5,
            color_brightness: 1.0,
            red: 1.0,
            green: 0.5,
            blue: 0.0,
            white: 1.0,
        };
        Light {
            info: EntityInfo::new("lamp", "Desk Lamp"),
            remote_values: on,
            current_values: on,
            effect: effect.map(str::to_string),
        }
    }

    #[test]
    fn test_full_row() {
        assert_eq!(
            row(&LightRenderer, lamp(None)),
            "esphome_light_state{id=\"lamp\",name=\"Desk Lamp\"} 1\n\
             esphome_light_color{id=\"lamp\",name=\"Desk Lamp\",channel=\"brightness\"} 0.50\n\
             esphome_light_color{id=\"lamp\",name=\"Desk Lamp\",channel=\"r\"} 0.50\n\
             esphome_light_color{id=\"lamp\",name=\"Desk Lamp\",channel=\"g\"} 0.25\n\
             esphome_light_color{id=\"lamp\",name=\"Desk Lamp\",channel=\"b\"} 0.00\n\
             esphome_light_color{id=\"lamp\",name=\"Desk Lamp\",channel=\"w\"} 0.50\n\
             esphome_light_effect_active{id=\"lamp\",name=\"Desk Lamp\",effect=\"None\"} 0\n"
        );
    }

    #[test]
    fn test_five_distinct_color_channels() {
        let output = row(&LightRenderer, lamp(None));
        let colors = lines_of(&output, "esphome_light_color");
        assert_eq!(colors.len(), 5);

        let mut channels: Vec<&str> = colors
            .iter()
            .filter_map(|line| line.split("channel=\"").nth(1))
            .filter_map(|rest| rest.split('"').next())
            .collect();
        channels.sort_unstable();
        channels.dedup();
        assert_eq!(channels, vec!["b", "brightness", "g", "r", "w"]);
    }

    #[test]
    fn test_active_effect() {
        let output = row(&LightRenderer, lamp(Some("Rainbow")));
        assert_eq!(
            lines_of(&output, "esphome_light_effect_active"),
            vec![
                "esphome_light_effect_active{id=\"lamp\",name=\"Desk Lamp\",effect=\"Rainbow\"} 1"
            ]
        );
    }

    #[test]
    fn test_effect_with_quote_written_verbatim() {
        let output = row(&LightRenderer, lamp(Some("Say \"hi\"")));
        assert!(output.contains(",effect=\"Say \"hi\"\"} 1\n"));
    }

    #[test]
    fn test_state_uses_remote_values() {
        let mut light = lamp(None);
        light.remote_values.state = 0.0;
        let output = row(&LightRenderer, light);
        assert_eq!(
            lines_of(&output, "esphome_light_state"),
            vec!["esphome_light_state{id=\"lamp\",name=\"Desk Lamp\"} 0"]
        );
        // Color still reflects the current output
        assert!(output.contains("channel=\"brightness\"} 0.50\n"));
    }
}
