//! Owner of every live actor in a run.

use std::collections::BTreeMap;

use super::types::{Entity, EntityClass, EntityId, EntityKind, EntitySnapshot, Vec2};

/// Live entities keyed by handle. Iteration is in spawn order.
///
/// Callers that mutate while walking a class take a snapshot with
/// [`EntityRegistry::ids_of`] first, then re-check liveness through
/// [`EntityRegistry::get`] for each id. Entities spawned during the walk are
/// not visited by it, and destroyed ones are skipped.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, position: Vec2, kind: EntityKind) -> EntityId {
        self.next_id += 1;
        let id = EntityId::from_raw(self.next_id);
        self.entities.insert(id, Entity { id, position, kind });
        id
    }

    /// Remove an entity. Returns it only the first time; later calls with the
    /// same handle are no-ops returning `None`.
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Snapshot of live ids of one class.
    pub fn ids_of(&self, class: EntityClass) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.class() == class)
            .map(|entity| entity.id)
            .collect()
    }

    pub fn for_each<F: FnMut(&Entity)>(&self, class: EntityClass, mut f: F) {
        self.entities
            .values()
            .filter(|entity| entity.class() == class)
            .for_each(|entity| f(entity));
    }

    pub fn count(&self, class: EntityClass) -> usize {
        self.entities
            .values()
            .filter(|entity| entity.class() == class)
            .count()
    }

    pub fn distance(&self, a: EntityId, b: EntityId) -> Option<f32> {
        let a = self.entities.get(&a)?;
        let b = self.entities.get(&b)?;
        Some(a.position.distance(b.position))
    }

    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.entities.get(&id).map(|entity| entity.position)
    }

    pub fn player(&self) -> Option<EntityId> {
        self.first_of(EntityClass::Player)
    }

    pub fn boss(&self) -> Option<EntityId> {
        self.first_of(EntityClass::Boss)
    }

    fn first_of(&self, class: EntityClass) -> Option<EntityId> {
        self.entities
            .values()
            .find(|entity| entity.class() == class)
            .map(|entity| entity.id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove every entity. Handles are still never reused afterwards.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        self.entities
            .values()
            .map(|entity| EntitySnapshot {
                id: entity.id,
                class: entity.class(),
                position: entity.position,
                health_fraction: entity.health_fraction(),
            })
            .collect()
    }
}
