//! Per-entity label overrides.

use std::collections::HashMap;

use esphome_common::EntityKey;

/// Label carrying the entity's object id.
pub const ID_LABEL: &str = "id";
/// Label carrying the entity's display name.
pub const NAME_LABEL: &str = "name";
/// Reserved key replacing the metric name prefix. Never rendered as a label.
pub const METRIC_NAME_LABEL: &str = "metric_name";
/// Unit of a sensor value row.
pub const UNIT_LABEL: &str = "unit";
/// Color channel of a light color row.
pub const CHANNEL_LABEL: &str = "channel";
/// Effect name of a light effect row.
pub const EFFECT_LABEL: &str = "effect";

/// Labels the renderers append to rows themselves. An override of the same
/// name would repeat the label on those rows.
pub const ROW_LABELS: [&str; 3] = [UNIT_LABEL, CHANNEL_LABEL, EFFECT_LABEL];

/// Label overrides keyed by entity.
///
/// Populated once while wiring the exporter and read-only afterwards.
/// Label names are unique per entity: adding a name twice replaces the
/// earlier value in place.
#[derive(Debug, Clone, Default)]
pub struct RelabelStore {
    overrides: HashMap<EntityKey, Vec<(String, String)>>,
}

impl RelabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a label for an entity.
    pub fn add_label(&mut self, key: EntityKey, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let labels = self.overrides.entry(key).or_default();

        match labels.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => labels.push((name, value)),
        }
    }

    /// Override the `id` label of an entity.
    pub fn add_id_override(&mut self, key: EntityKey, value: impl Into<String>) {
        self.add_label(key, ID_LABEL, value);
    }

    /// Override the `name` label of an entity.
    pub fn add_name_override(&mut self, key: EntityKey, value: impl Into<String>) {
        self.add_label(key, NAME_LABEL, value);
    }

    /// Metric name prefix for an entity, falling back to `default_value`.
    pub fn metric_name_prefix_for<'a>(
        &'a self,
        key: &EntityKey,
        default_value: &'a str,
    ) -> &'a str {
        self.overrides
            .get(key)
            .and_then(|labels| {
                labels
                    .iter()
                    .find(|(name, _)| name == METRIC_NAME_LABEL)
                    .map(|(_, value)| value.as_str())
            })
            .unwrap_or(default_value)
    }

    /// Label overrides of an entity in insertion order, without `metric_name`.
    pub fn labels_for<'a>(&'a self, key: &EntityKey) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.overrides
            .get(key)
            .into_iter()
            .flatten()
            .filter(|(name, _)| name != METRIC_NAME_LABEL)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of entities with at least one override.
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
