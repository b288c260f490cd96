//! Entity storage.
//!
//! The store exclusively owns every entity in a session. Entities are
//! keyed by a monotonically increasing id in a `BTreeMap`, so iteration
//! order is creation order on every platform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::{Entity, EntityId, Faction};
use crate::kind::EntityKind;
use crate::math::{Fixed, Vec2Fixed};

/// Storage for all entities in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: EntityId,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Create empty entity storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Reserve the id the next inserted entity will receive.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an entity built with an id from [`allocate_id`](Self::allocate_id).
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    /// Remove every entity, keeping the id counter running.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Remove an entity by ID.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Get an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Get the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity ids in creation order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Iterate over all entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterate mutably over all entities in creation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Remove every entity with `hp <= 0` in one pass.
    ///
    /// Returns the removed ids.
    pub fn purge_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| !e.is_alive())
            .map(|e| e.id)
            .collect();
        self.entities.retain(|_, e| e.is_alive());
        dead
    }

    /// Whether `faction` owns at least one entity of `kind`.
    #[must_use]
    pub fn has_kind(&self, kind: EntityKind, faction: Faction) -> bool {
        self.iter().any(|e| e.kind == kind && e.faction == faction)
    }

    /// Number of entities of `kind` regardless of faction.
    #[must_use]
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.iter().filter(|e| e.kind == kind).count()
    }

    /// Nearest live entity of `faction` to `from`, skipping `exclude`.
    ///
    /// Linear scan; ties go to the entity created first. Returns the id
    /// and the squared distance.
    #[must_use]
    pub fn nearest(
        &self,
        from: Vec2Fixed,
        faction: Faction,
        exclude: EntityId,
    ) -> Option<(EntityId, Fixed)> {
        let mut best: Option<(EntityId, Fixed)> = None;
        for other in self.iter() {
            if other.id == exclude || other.faction != faction || !other.is_alive() {
                continue;
            }
            let dist_sq = from.distance_squared(other.position);
            match best {
                Some((_, best_dist)) if dist_sq >= best_dist => {}
                _ => best = Some((other.id, dist_sq)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(store: &mut EntityStore, kind: EntityKind, x: i32, y: i32, faction: Faction) -> EntityId {
        let id = store.allocate_id();
        let pos = Vec2Fixed::from_ints(x, y);
        let entity = Entity::structure(id, kind, pos, faction)
            .or_else(|| Entity::unit(id, kind, pos, faction, None))
            .unwrap();
        store.insert(entity)
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut store = EntityStore::new();
        let a = spawn(&mut store, EntityKind::Hq, 0, 0, Faction::Player);
        let b = spawn(&mut store, EntityKind::Hq, 10, 0, Faction::Enemy);
        assert!(b > a);
        assert_eq!(store.ids(), vec![a, b]);
    }

    #[test]
    fn test_ids_keep_counting_after_clear() {
        let mut store = EntityStore::new();
        let a = spawn(&mut store, EntityKind::Hq, 0, 0, Faction::Player);
        store.clear();
        let b = spawn(&mut store, EntityKind::Hq, 0, 0, Faction::Player);
        assert_ne!(a, b);
    }

    #[test]
    fn test_purge_dead_removes_only_zero_hp() {
        let mut store = EntityStore::new();
        let alive = spawn(&mut store, EntityKind::Infantry, 0, 0, Faction::Player);
        let dead = spawn(&mut store, EntityKind::EnemyLight, 5, 0, Faction::Enemy);
        let overkilled = spawn(&mut store, EntityKind::EnemyLight, 6, 0, Faction::Enemy);
        store.get_mut(dead).unwrap().hp = Fixed::ZERO;
        store.get_mut(overkilled).unwrap().hp = Fixed::from_num(-40);

        let removed = store.purge_dead();
        assert_eq!(removed, vec![dead, overkilled]);
        assert!(store.contains(alive));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_nearest_picks_closest_opponent() {
        let mut store = EntityStore::new();
        let me = spawn(&mut store, EntityKind::Turret, 0, 0, Faction::Player);
        let _friend = spawn(&mut store, EntityKind::Infantry, 1, 0, Faction::Player);
        let far = spawn(&mut store, EntityKind::EnemyLight, 100, 0, Faction::Enemy);
        let near = spawn(&mut store, EntityKind::EnemyLight, 0, 50, Faction::Enemy);

        let (found, dist_sq) = store.nearest(Vec2Fixed::ZERO, Faction::Enemy, me).unwrap();
        assert_eq!(found, near);
        assert_eq!(dist_sq, Fixed::from_num(2500));

        store.get_mut(near).unwrap().hp = Fixed::ZERO;
        let (found, _) = store.nearest(Vec2Fixed::ZERO, Faction::Enemy, me).unwrap();
        assert_eq!(found, far, "dead entities are not targetable");
    }

    #[test]
    fn test_nearest_tie_goes_to_first_created() {
        let mut store = EntityStore::new();
        let first = spawn(&mut store, EntityKind::EnemyLight, 10, 0, Faction::Enemy);
        let _second = spawn(&mut store, EntityKind::EnemyLight, -10, 0, Faction::Enemy);
        let (found, _) = store.nearest(Vec2Fixed::ZERO, Faction::Enemy, 0).unwrap();
        assert_eq!(found, first);
    }

    #[test]
    fn test_has_kind_respects_faction() {
        let mut store = EntityStore::new();
        spawn(&mut store, EntityKind::Barracks, 0, 0, Faction::Enemy);
        assert!(!store.has_kind(EntityKind::Barracks, Faction::Player));
        assert!(store.has_kind(EntityKind::Barracks, Faction::Enemy));
    }
}
