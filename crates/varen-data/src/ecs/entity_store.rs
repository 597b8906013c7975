// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Slot-based entity storage with stable identity and two-phase deletion.

use thiserror::Error;

use crate::ecs::EntityId;
use crate::entity::Entity;

/// The fixed slot capacity of an [`EntityStore`].
pub const ENTITY_COUNT: usize = 1024;

/// Errors reported by [`EntityStore`] mutations.
///
/// None of these corrupt existing state; the failed operation is a no-op and
/// the caller decides whether to drop the request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Every slot is live; the spawn request must be dropped or retried later.
    #[error("entity store capacity exhausted ({capacity} slots)")]
    CapacityExhausted {
        /// The fixed slot capacity of the store.
        capacity: usize,
    },
    /// An explicit-id allocation targeted a slot that is currently live.
    #[error("entity slot {index} is already occupied")]
    SlotOccupied {
        /// The requested slot index.
        index: u32,
    },
    /// An explicit-id allocation targeted an index past the store's capacity.
    #[error("entity index {index} out of range (capacity {capacity})")]
    IndexOutOfRange {
        /// The requested slot index.
        index: u32,
        /// The fixed slot capacity of the store.
        capacity: usize,
    },
}

/// Slot-indexed storage of entity records with stable identity across
/// deletion and reuse.
///
/// The store is the exclusive owner of all entity memory. Deletion is
/// two-phase: [`mark_deleted`](EntityStore::mark_deleted) only defers, and
/// [`propagate_changes`](EntityStore::propagate_changes) releases slots at a
/// defined point outside any entity iteration, so update logic that deletes
/// another entity can never invalidate an in-progress scan.
#[derive(Debug)]
pub struct EntityStore {
    /// One slot per index that has ever been allocated. The stored id carries
    /// the slot's current generation; the entity is `Some` only while live.
    slots: Vec<(EntityId, Option<Entity>)>,
    /// Indices available for reuse, enabling O(1) allocation.
    free: Vec<u32>,
    /// Ids marked for deletion, drained by `propagate_changes`.
    pending_delete: Vec<EntityId>,
    /// The fixed slot capacity.
    capacity: usize,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Creates an empty store with the default [`ENTITY_COUNT`] capacity.
    pub fn new() -> Self {
        Self::with_capacity(ENTITY_COUNT)
    }

    /// Creates an empty store with an explicit slot capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            pending_delete: Vec::new(),
            capacity,
        }
    }

    /// The fixed slot capacity of this store.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocates a new or recycled slot holding a default [`Entity`].
    ///
    /// Callers follow up with [`get_mut`](EntityStore::get_mut) to perform
    /// the typed construction (kind flags, payloads). Fails with
    /// [`StoreError::CapacityExhausted`] when every slot is in use.
    pub fn allocate(&mut self) -> Result<EntityId, StoreError> {
        if let Some(index) = self.free.pop() {
            let (id_slot, entity_slot) = &mut self.slots[index as usize];
            id_slot.generation += 1;
            *entity_slot = Some(Entity::default());
            return Ok(*id_slot);
        }
        if self.slots.len() >= self.capacity {
            return Err(StoreError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        let new_id = EntityId {
            index: self.slots.len() as u32,
            generation: 0,
        };
        self.slots.push((new_id, Some(Entity::default())));
        Ok(new_id)
    }

    /// Claims an exact index and generation, used by the persistence
    /// collaborator to reconstruct an id mapping on load.
    pub fn allocate_with_id(&mut self, id: EntityId) -> Result<EntityId, StoreError> {
        let index = id.index as usize;
        if index >= self.capacity {
            return Err(StoreError::IndexOutOfRange {
                index: id.index,
                capacity: self.capacity,
            });
        }
        while self.slots.len() <= index {
            let filler = EntityId {
                index: self.slots.len() as u32,
                generation: 0,
            };
            self.free.push(filler.index);
            self.slots.push((filler, None));
        }
        let (id_slot, entity_slot) = &mut self.slots[index];
        if entity_slot.is_some() {
            return Err(StoreError::SlotOccupied { index: id.index });
        }
        self.free.retain(|&free_index| free_index != id.index);
        *id_slot = id;
        *entity_slot = Some(Entity::default());
        Ok(id)
    }

    /// Returns a reference to an entity if `id` is still its live handle.
    ///
    /// The generation of the provided `EntityId` must match the current
    /// generation in the store, so stale handles from before a slot reuse
    /// can never read the new occupant.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index as usize)
            .and_then(|(slot_id, entity)| {
                if slot_id.generation == id.generation {
                    entity.as_ref()
                } else {
                    None
                }
            })
    }

    /// Returns a mutable reference to an entity if `id` is still its live handle.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index as usize)
            .and_then(|(slot_id, entity)| {
                if slot_id.generation == id.generation {
                    entity.as_mut()
                } else {
                    None
                }
            })
    }

    /// Marks an entity for deletion on the next
    /// [`propagate_changes`](EntityStore::propagate_changes). Lookups remain
    /// valid until then.
    ///
    /// Stale or duplicate marks are ignored with a debug diagnostic.
    pub fn mark_deleted(&mut self, id: EntityId) {
        if self.get(id).is_none() {
            log::debug!(
                "ignoring delete of stale entity handle {}v{}",
                id.index,
                id.generation
            );
            return;
        }
        if !self.pending_delete.contains(&id) {
            self.pending_delete.push(id);
        }
    }

    /// Drains the deferred-deletion list: releases entity memory, returns
    /// indices to the free stack, and nulls the slots.
    ///
    /// Called once per frame at end of tick, never inside an entity
    /// iteration loop.
    pub fn propagate_changes(&mut self) {
        let pending = std::mem::take(&mut self.pending_delete);
        for id in pending {
            let index = id.index as usize;
            let Some((slot_id, entity_slot)) = self.slots.get_mut(index) else {
                continue;
            };
            if slot_id.generation != id.generation || entity_slot.is_none() {
                continue;
            }
            *entity_slot = None;
            self.free.push(id.index);
        }
    }

    /// The number of slots currently being used (live or recyclable).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The number of live entities.
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|(_, entity)| entity.is_some())
            .count()
    }

    /// Returns the slot at a raw index, for frame iteration.
    pub fn slot_at_mut(&mut self, index: usize) -> Option<(EntityId, &mut Entity)> {
        self.slots
            .get_mut(index)
            .and_then(|(id, entity)| entity.as_mut().map(|entity| (*id, entity)))
    }

    /// Iterates over live entities, used by the persistence collaborator to
    /// enumerate the scene.
    pub fn iter_live(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .filter_map(|(id, entity)| entity.as_ref().map(|entity| (*id, entity)))
    }
}
