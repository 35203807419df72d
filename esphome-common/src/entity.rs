//! Entity data model: kinds, keys and the per-kind state read by renderers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Closed set of entity kinds, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Sensor,
    BinarySensor,
    Fan,
    Light,
    Cover,
    Switch,
    Number,
    Climate,
    Lock,
}

impl EntityKind {
    /// Every kind in the fixed rendering order.
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Sensor,
        EntityKind::BinarySensor,
        EntityKind::Fan,
        EntityKind::Light,
        EntityKind::Cover,
        EntityKind::Switch,
        EntityKind::Number,
        EntityKind::Climate,
        EntityKind::Lock,
    ];

    /// Get the string representation used in entity keys and metric names.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Sensor => "sensor",
            EntityKind::BinarySensor => "binary_sensor",
            EntityKind::Fan => "fan",
            EntityKind::Light => "light",
            EntityKind::Cover => "cover",
            EntityKind::Switch => "switch",
            EntityKind::Number => "number",
            EntityKind::Climate => "climate",
            EntityKind::Lock => "lock",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidEntityKey(format!("unknown entity kind '{}'", s)))
    }
}

/// Stable identity of an entity: its kind plus object id.
///
/// Written as `<kind>.<object_id>`, e.g. `sensor.living_room_temp`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub object_id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, object_id: impl Into<String>) -> Self {
        Self {
            kind,
            object_id: object_id.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.object_id)
    }
}

impl FromStr for EntityKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, object_id) = s.split_once('.').ok_or_else(|| {
            Error::InvalidEntityKey(format!("'{}' is not of the form <kind>.<object_id>", s))
        })?;

        if object_id.is_empty() {
            return Err(Error::InvalidEntityKey(format!(
                "'{}' has an empty object id",
                s
            )));
        }

        Ok(Self::new(kind.parse()?, object_id))
    }
}

/// Attributes shared by every entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Stable object id, rendered as the `id` label.
    pub object_id: String,

    /// Display name, rendered as the `name` label.
    pub name: String,

    /// Internal entities are hidden unless explicitly included.
    #[serde(default)]
    pub internal: bool,
}

impl EntityInfo {
    pub fn new(object_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            name: name.into(),
            internal: false,
        }
    }

    /// Mark the entity as internal.
    pub fn with_internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }
}

fn nan() -> f32 {
    f32::NAN
}

/// Serializes NaN as `null` so invalid readings survive JSON.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
    }
}

/// Numeric sensor. A NaN state means the reading is invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default = "nan", with = "nan_as_null")]
    pub state: f32,

    #[serde(default)]
    pub unit_of_measurement: String,

    /// Decimals to round the state to; negative values round to tens, hundreds...
    #[serde(default)]
    pub accuracy_decimals: i8,
}

impl Sensor {
    pub fn new(info: EntityInfo) -> Self {
        Self {
            info,
            state: f32::NAN,
            unit_of_measurement: String::new(),
            accuracy_decimals: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinarySensor {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default)]
    pub state: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanTraits {
    #[serde(default)]
    pub supports_speed: bool,
    #[serde(default)]
    pub supports_oscillation: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fan {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default)]
    pub state: bool,

    #[serde(default)]
    pub speed: i32,

    #[serde(default)]
    pub oscillating: bool,

    #[serde(default)]
    pub traits: FanTraits,
}

/// Color state of a light, every component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightColorValues {
    pub state: f32,
    pub brightness: f32,
    pub color_brightness: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub white: f32,
}

impl Default for LightColorValues {
    fn default() -> Self {
        Self {
            state: 0.0,
            brightness: 1.0,
            color_brightness: 1.0,
            red: 1.0,
            green: 1.0,
            blue: 1.0,
            white: 1.0,
        }
    }
}

impl LightColorValues {
    pub fn is_on(&self) -> bool {
        self.state != 0.0
    }

    /// Effective brightness, zero when the light is off.
    pub fn as_brightness(&self) -> f32 {
        self.state * self.brightness
    }

    /// Effective red, green, blue and white output levels.
    pub fn as_rgbw(&self) -> (f32, f32, f32, f32) {
        let level = self.state * self.brightness;
        let color = level * self.color_brightness;
        (
            color * self.red,
            color * self.green,
            color * self.blue,
            level * self.white,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Light {
    #[serde(flatten)]
    pub info: EntityInfo,

    /// Values the light is transitioning to.
    #[serde(default)]
    pub remote_values: LightColorValues,

    /// Values currently output.
    #[serde(default)]
    pub current_values: LightColorValues,

    #[serde(default)]
    pub effect: Option<String>,
}

impl Light {
    /// Name of the active effect, `"None"` when no effect runs.
    pub fn effect_name(&self) -> &str {
        self.effect.as_deref().unwrap_or("None")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverTraits {
    #[serde(default)]
    pub supports_tilt: bool,
}

/// Cover position in `0.0` (closed) to `1.0` (open). NaN means unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default = "nan", with = "nan_as_null")]
    pub position: f32,

    #[serde(default)]
    pub tilt: f32,

    #[serde(default)]
    pub traits: CoverTraits,
}

impl Cover {
    pub fn new(info: EntityInfo) -> Self {
        Self {
            info,
            position: f32::NAN,
            tilt: 0.0,
            traits: CoverTraits::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Switch {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default)]
    pub state: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Number {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default)]
    pub state: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ClimateMode {
    #[default]
    Off = 0,
    HeatCool = 1,
    Cool = 2,
    Heat = 3,
    FanOnly = 4,
    Dry = 5,
    Auto = 6,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ClimateAction {
    #[default]
    Off = 0,
    Cooling = 2,
    Heating = 3,
    Idle = 4,
    Drying = 5,
    Fan = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ClimateFanMode {
    On = 0,
    Off = 1,
    Auto = 2,
    Low = 3,
    Medium = 4,
    High = 5,
    Middle = 6,
    Focus = 7,
    Diffuse = 8,
    Quiet = 9,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ClimateSwingMode {
    #[default]
    Off = 0,
    Both = 1,
    Vertical = 2,
    Horizontal = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ClimatePreset {
    None = 0,
    Home = 1,
    Away = 2,
    Boost = 3,
    Comfort = 4,
    Eco = 5,
    Sleep = 6,
    Activity = 7,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateTraits {
    pub supports_two_point_target_temperature: bool,
    pub supports_action: bool,
    pub supports_current_temperature: bool,
    pub supports_fan_modes: bool,
    pub supports_swing_modes: bool,
    pub supports_presets: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Climate {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default)]
    pub mode: ClimateMode,

    #[serde(default)]
    pub action: ClimateAction,

    #[serde(default = "nan", with = "nan_as_null")]
    pub current_temperature: f32,

    #[serde(default = "nan", with = "nan_as_null")]
    pub target_temperature: f32,

    #[serde(default = "nan", with = "nan_as_null")]
    pub target_temperature_low: f32,

    #[serde(default = "nan", with = "nan_as_null")]
    pub target_temperature_high: f32,

    #[serde(default)]
    pub fan_mode: Option<ClimateFanMode>,

    #[serde(default)]
    pub swing_mode: ClimateSwingMode,

    #[serde(default)]
    pub preset: Option<ClimatePreset>,

    #[serde(default)]
    pub traits: ClimateTraits,
}

impl Climate {
    pub fn new(info: EntityInfo) -> Self {
        Self {
            info,
            mode: ClimateMode::default(),
            action: ClimateAction::default(),
            current_temperature: f32::NAN,
            target_temperature: f32::NAN,
            target_temperature_low: f32::NAN,
            target_temperature_high: f32::NAN,
            fan_mode: None,
            swing_mode: ClimateSwingMode::default(),
            preset: None,
            traits: ClimateTraits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LockState {
    #[default]
    None = 0,
    Locked = 1,
    Unlocked = 2,
    Jammed = 3,
    Locking = 4,
    Unlocking = 5,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lock {
    #[serde(flatten)]
    pub info: EntityInfo,

    #[serde(default)]
    pub state: LockState,
}

/// An entity of any kind, tagged by `kind` when serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Sensor(Sensor),
    BinarySensor(BinarySensor),
    Fan(Fan),
    Light(Light),
    Cover(Cover),
    Switch(Switch),
    Number(Number),
    Climate(Climate),
    Lock(Lock),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Sensor(_) => EntityKind::Sensor,
            Entity::BinarySensor(_) => EntityKind::BinarySensor,
            Entity::Fan(_) => EntityKind::Fan,
            Entity::Light(_) => EntityKind::Light,
            Entity::Cover(_) => EntityKind::Cover,
            Entity::Switch(_) => EntityKind::Switch,
            Entity::Number(_) => EntityKind::Number,
            Entity::Climate(_) => EntityKind::Climate,
            Entity::Lock(_) => EntityKind::Lock,
        }
    }

    pub fn info(&self) -> &EntityInfo {
        match self {
            Entity::Sensor(e) => &e.info,
            Entity::BinarySensor(e) => &e.info,
            Entity::Fan(e) => &e.info,
            Entity::Light(e) => &e.info,
            Entity::Cover(e) => &e.info,
            Entity::Switch(e) => &e.info,
            Entity::Number(e) => &e.info,
            Entity::Climate(e) => &e.info,
            Entity::Lock(e) => &e.info,
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind(), self.info().object_id.clone())
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Entity {
                fn from(e: $variant) -> Self {
                    Entity::$variant(e)
                }
            }
        )*
    };
}

impl_from_entity!(
    Sensor,
    BinarySensor,
    Fan,
    Light,
    Cover,
    Switch,
    Number,
    Climate,
    Lock,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip_str() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("heater".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_key_parse() {
        let key: EntityKey = "binary_sensor.front_door".parse().unwrap();
        assert_eq!(key.kind, EntityKind::BinarySensor);
        assert_eq!(key.object_id, "front_door");
        assert_eq!(key.to_string(), "binary_sensor.front_door");
    }

    #[test]
    fn test_entity_key_object_id_may_contain_dots() {
        let key: EntityKey = "sensor.temp.raw".parse().unwrap();
        assert_eq!(key.kind, EntityKind::Sensor);
        assert_eq!(key.object_id, "temp.raw");
    }

    #[test]
    fn test_entity_key_invalid() {
        assert!("sensor".parse::<EntityKey>().is_err());
        assert!("sensor.".parse::<EntityKey>().is_err());
        assert!("gizmo.x".parse::<EntityKey>().is_err());
    }

    #[test]
    fn test_entity_kind_and_key() {
        let entity: Entity = Switch {
            info: EntityInfo::new("relay1", "Relay"),
            state: true,
        }
        .into();

        assert_eq!(entity.kind(), EntityKind::Switch);
        assert_eq!(entity.key(), EntityKey::new(EntityKind::Switch, "relay1"));
        assert_eq!(entity.info().name, "Relay");
    }

    #[test]
    fn test_light_color_decomposition() {
        let values = LightColorValues {
            state: 1.0,
            brightness: 0.5,
            color_brightness: 0.5,
            red: 1.0,
            green: 0.5,
            blue: 0.0,
            white: 0.8,
        };

        assert!(values.is_on());
        assert_eq!(values.as_brightness(), 0.5);
        assert_eq!(values.as_rgbw(), (0.25, 0.125, 0.0, 0.4));
    }

    #[test]
    fn test_light_off_outputs_zero() {
        let values = LightColorValues::default();
        assert!(!values.is_on());
        assert_eq!(values.as_brightness(), 0.0);
        assert_eq!(values.as_rgbw(), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_light_effect_name_defaults_to_none() {
        let mut light = Light::default();
        assert_eq!(light.effect_name(), "None");
        light.effect = Some("Rainbow".to_string());
        assert_eq!(light.effect_name(), "Rainbow");
    }

    #[test]
    fn test_enum_discriminants() {
        assert_eq!(ClimateMode::Auto as u8, 6);
        assert_eq!(ClimateAction::Cooling as u8, 2);
        assert_eq!(ClimateFanMode::Quiet as u8, 9);
        assert_eq!(ClimateSwingMode::Horizontal as u8, 3);
        assert_eq!(ClimatePreset::Activity as u8, 7);
        assert_eq!(LockState::Jammed as u8, 3);
    }
}
