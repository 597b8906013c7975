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

//! # Varen Data
//!
//! Data layouts owned by the runtime core: the slot-based entity store, the
//! per-entity animation event state, and the bounded player action queue.
//! The store is the sole owner of entity memory and is mutated only from the
//! main-thread tick.

pub mod anim;
pub mod camera;
pub mod ecs;
pub mod entity;
pub mod player;

pub use anim::{AnimationEvent, AnimationState, MAX_EVENT_DEPTH};
pub use camera::CameraTransition;
pub use ecs::{EntityId, EntityStore, StoreError, ENTITY_COUNT};
pub use entity::{Entity, EntityKindFlags, PointLight};
pub use player::{ActionKind, ActionQueue, PlayerAction, PlayerState, MAX_ACTION_BUFFER, MAX_SPEEDUP};
