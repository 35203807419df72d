//! Entity registry consulted at render time.

use std::sync::Arc;

use esphome_common::{Entity, EntityKey, EntityKind};
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Source of the entities to render, queried once per kind per render.
pub trait EntityRegistry: Send + Sync {
    /// Current entities of `kind`, in registration order.
    fn entities(&self, kind: EntityKind) -> Vec<Entity>;
}

impl EntityRegistry for Vec<Entity> {
    fn entities(&self, kind: EntityKind) -> Vec<Entity> {
        self.iter().filter(|e| e.kind() == kind).cloned().collect()
    }
}

/// Thread-safe in-memory entity registry.
///
/// Entities are unique by key. Updates and renders may interleave; each
/// render reads every kind at the moment it is visited.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: RwLock<Vec<Entity>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `entities`.
    pub fn with_entities(entities: Vec<Entity>) -> Self {
        let store = Self::new();
        store.replace_all(entities);
        store
    }

    /// Insert an entity, or replace the one with the same key in place.
    ///
    /// Returns `true` if an existing entity was replaced.
    pub fn upsert(&self, entity: Entity) -> bool {
        let key = entity.key();
        let mut entities = self.entities.write();

        match entities.iter_mut().find(|e| e.key() == key) {
            Some(existing) => {
                *existing = entity;
                true
            }
            None => {
                entities.push(entity);
                false
            }
        }
    }

    /// Remove the entity with the given key.
    pub fn remove(&self, key: &EntityKey) -> Option<Entity> {
        let mut entities = self.entities.write();
        let index = entities.iter().position(|e| e.key() == *key)?;
        Some(entities.remove(index))
    }

    /// Replace every entity. Later duplicates of a key win.
    pub fn replace_all(&self, entities: Vec<Entity>) {
        let mut unique: Vec<Entity> = Vec::with_capacity(entities.len());

        for entity in entities {
            let key = entity.key();
            match unique.iter_mut().find(|e| e.key() == key) {
                Some(existing) => {
                    warn!(entity = %key, "Duplicate entity in update, keeping the last one");
                    *existing = entity;
                }
                None => unique.push(entity),
            }
        }

        debug!(entities = unique.len(), "Replaced registry contents");
        *self.entities.write() = unique;
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}

impl EntityRegistry for EntityStore {
    fn entities(&self, kind: EntityKind) -> Vec<Entity> {
        self.entities
            .read()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }
}

/// Shared handle to the live registry.
pub type SharedRegistry = Arc<EntityStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use esphome_common::{EntityInfo, Sensor, Switch};

    fn switch(object_id: &str, state: bool) -> Entity {
        Switch {
            info: EntityInfo::new(object_id, object_id.to_uppercase()),
            state,
        }
        .into()
    }

    fn sensor(object_id: &str) -> Entity {
        Sensor::new(EntityInfo::new(object_id, object_id)).into()
    }

    #[test]
    fn test_entities_filtered_by_kind_in_order() {
        let store = EntityStore::with_entities(vec![
            switch("b", true),
            sensor("temp"),
            switch("a", false),
        ]);

        let switches: Vec<String> = store
            .entities(EntityKind::Switch)
            .iter()
            .map(|e| e.info().object_id.clone())
            .collect();
        assert_eq!(switches, vec!["b", "a"]);
        assert_eq!(store.entities(EntityKind::Light).len(), 0);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let store = EntityStore::new();
        assert!(!store.upsert(switch("relay", false)));
        assert!(!store.upsert(sensor("relay")));
        assert!(store.upsert(switch("relay", true)));

        assert_eq!(store.len(), 2);
        match &store.entities(EntityKind::Switch)[0] {
            Entity::Switch(s) => assert!(s.state),
            other => panic!("expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_remove() {
        let store = EntityStore::with_entities(vec![switch("relay", true)]);
        let key = EntityKey::new(EntityKind::Switch, "relay");

        assert!(store.remove(&key).is_some());
        assert!(store.remove(&key).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_dedups_keys() {
        let store = EntityStore::new();
        store.replace_all(vec![switch("relay", false), switch("relay", true)]);

        assert_eq!(store.len(), 1);
        match &store.entities(EntityKind::Switch)[0] {
            Entity::Switch(s) => assert!(s.state),
            other => panic!("expected switch, got {:?}", other),
        }
    }
}
