//! Entity scheduling
//!
//! The manager owns every live entity in insertion order. Structural changes
//! requested while an update pass is running are queued and committed only
//! after the pass, so the pass always walks the set as it was when it began.
//! Adds are committed before removes.

use std::fmt;

use crate::renderer::Canvas;
use crate::settings::RenderConfig;

/// Stable handle to an entity, allocated when the add is queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something the manager can schedule
pub trait GameEntity: Sized {
    /// Variant tag used for filtered queries
    type Kind: Copy + Eq + fmt::Debug;
    /// Shared state threaded through every update and draw
    type World;

    fn kind(&self) -> Self::Kind;

    /// Lower values are drawn first
    fn draw_order(&self) -> i32;

    fn update(&mut self, scene: &mut Scene<'_, Self>, world: &mut Self::World, dt: f32);

    fn draw(&self, world: &Self::World, config: &RenderConfig, canvas: &mut dyn Canvas);
}

struct Slot<E> {
    id: EntityId,
    /// `None` only while this entity's own update is running
    entity: Option<E>,
}

/// Queueing handle into an [`EntityManager`]
///
/// Handed to each entity during its update, and available between passes
/// through [`EntityManager::scene`]. Queries see the live set only; queued
/// adds become visible after the next commit.
pub struct Scene<'a, E> {
    live: &'a mut [Slot<E>],
    pending_add: &'a mut Vec<Slot<E>>,
    pending_remove: &'a mut Vec<EntityId>,
    next_id: &'a mut u64,
}

impl<E: GameEntity> Scene<'_, E> {
    /// Queue an entity for insertion
    pub fn add(&mut self, entity: E) -> EntityId {
        let id = EntityId(*self.next_id);
        *self.next_id += 1;
        self.pending_add.push(Slot {
            id,
            entity: Some(entity),
        });
        id
    }

    /// Queue an entity for removal; removing a queued add cancels it
    ///
    /// # Panics
    ///
    /// Panics if `id` is neither live nor queued for insertion.
    pub fn remove(&mut self, id: EntityId) {
        if let Some(index) = self.pending_add.iter().position(|s| s.id == id) {
            self.pending_add.remove(index);
            return;
        }
        assert!(
            self.live.iter().any(|s| s.id == id),
            "cannot remove entity {id}: it is not managed by this scene"
        );
        if !self.pending_remove.contains(&id) {
            self.pending_remove.push(id);
        }
    }

    /// Live entities in insertion order (excluding the one currently updating)
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.live
            .iter()
            .filter_map(|s| s.entity.as_ref().map(|e| (s.id, e)))
    }

    /// Mutable view of the live set, for managers that move what they own
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut E)> {
        self.live.iter_mut().filter_map(|s| {
            let id = s.id;
            s.entity.as_mut().map(|e| (id, e))
        })
    }

    /// Live entities with the given tag
    pub fn of_kind(&self, kind: E::Kind) -> impl Iterator<Item = (EntityId, &E)> {
        self.iter().filter(move |(_, e)| e.kind() == kind)
    }

    /// Entities queued for insertion but not yet committed
    pub fn pending(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.pending_add
            .iter()
            .filter_map(|s| s.entity.as_ref().map(|e| (s.id, e)))
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.live
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn is_removing(&self, id: EntityId) -> bool {
        self.pending_remove.contains(&id)
    }
}

/// Ordered owner of every live entity
pub struct EntityManager<E> {
    live: Vec<Slot<E>>,
    pending_add: Vec<Slot<E>>,
    pending_remove: Vec<EntityId>,
    next_id: u64,
}

impl<E> Default for EntityManager<E> {
    fn default() -> Self {
        Self {
            live: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            next_id: 1,
        }
    }
}

impl<E: GameEntity> EntityManager<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queueing handle for use between passes
    pub fn scene(&mut self) -> Scene<'_, E> {
        Scene {
            live: &mut self.live,
            pending_add: &mut self.pending_add,
            pending_remove: &mut self.pending_remove,
            next_id: &mut self.next_id,
        }
    }

    /// Queue an entity for insertion at the end of the next update pass
    pub fn add(&mut self, entity: E) -> EntityId {
        self.scene().add(entity)
    }

    /// Queue an entity for removal at the end of the next update pass
    ///
    /// # Panics
    ///
    /// Panics if `id` is neither live nor queued for insertion.
    pub fn remove(&mut self, id: EntityId) {
        self.scene().remove(id);
    }

    /// Queue removal of every live entity
    pub fn clear(&mut self) {
        for slot in &self.live {
            if !self.pending_remove.contains(&slot.id) {
                self.pending_remove.push(slot.id);
            }
        }
    }

    /// Run one update pass, then commit queued adds and removes
    pub fn update(&mut self, world: &mut E::World, dt: f32) {
        for index in 0..self.live.len() {
            let id = self.live[index].id;
            if self.pending_remove.contains(&id) {
                continue;
            }
            let Some(mut entity) = self.live[index].entity.take() else {
                continue;
            };
            let mut scene = Scene {
                live: &mut self.live,
                pending_add: &mut self.pending_add,
                pending_remove: &mut self.pending_remove,
                next_id: &mut self.next_id,
            };
            entity.update(&mut scene, world, dt);
            self.live[index].entity = Some(entity);
        }
        self.commit();
    }

    fn commit(&mut self) {
        self.live.append(&mut self.pending_add);
        if !self.pending_remove.is_empty() {
            let removed = std::mem::take(&mut self.pending_remove);
            self.live.retain(|s| !removed.contains(&s.id));
        }
    }

    /// Draw live entities by ascending draw order (ties keep insertion order)
    pub fn draw(&self, world: &E::World, config: &RenderConfig, canvas: &mut dyn Canvas) {
        let mut ordered: Vec<&E> = self.iter().map(|(_, e)| e).collect();
        ordered.sort_by_key(|e| e.draw_order());
        for entity in ordered {
            entity.draw(world, config, canvas);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.live
            .iter()
            .filter_map(|s| s.entity.as_ref().map(|e| (s.id, e)))
    }

    /// Lazy view over live entities with the given tag
    pub fn entities_of_kind(&self, kind: E::Kind) -> impl Iterator<Item = (EntityId, &E)> {
        self.iter().filter(move |(_, e)| e.kind() == kind)
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.live
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.live.iter().any(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of queued adds and removes awaiting the next commit
    pub fn pending_changes(&self) -> (usize, usize) {
        (self.pending_add.len(), self.pending_remove.len())
    }
}
