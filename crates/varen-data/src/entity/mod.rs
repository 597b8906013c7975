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

//! The entity record: base transform fields, capability flags, and the
//! per-kind payloads.

mod kind;

pub use kind::EntityKindFlags;

use varen_core::math::{Quaternion, Vec3};
use varen_core::physics::RigidBodyHandle;

use crate::anim::AnimationState;
use crate::player::PlayerState;

/// A point-light payload.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    /// Linear RGB light color.
    pub color: Vec3,
    /// Light intensity multiplier.
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

/// A single entity record.
///
/// Rather than a class hierarchy, an entity is base fields plus a capability
/// bitmask and optional payloads; systems check [`EntityKindFlags`] bits to
/// decide what to do with it. The payload options are expected to be `Some`
/// exactly when the corresponding flag is set.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Capability flags describing what this entity is.
    pub kind: EntityKindFlags,
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation.
    pub rotation: Quaternion,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Per-entity animation time multiplier, updated each frame by the
    /// movement model for the player and left at `1.0` otherwise.
    pub time_scale: f32,
    /// Ticks animation for this entity even while the simulation is paused
    /// (editor preview).
    pub force_animate: bool,
    /// Physics body, authoritative for the transform while playing.
    pub body: Option<RigidBodyHandle>,
    /// Animation playback state (`ANIMATED_MESH`).
    pub animation: Option<AnimationState>,
    /// Movement model state (`PLAYER`).
    pub player: Option<PlayerState>,
    /// Light payload (`POINT_LIGHT`).
    pub light: Option<PointLight>,
}

impl Entity {
    /// Creates an entity with the given capability flags and identity
    /// transform. Payloads start empty and are attached by the caller.
    pub fn new(kind: EntityKindFlags) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

impl Default for Entity {
    /// An empty record with an identity transform and unit time scale.
    fn default() -> Self {
        Self {
            kind: EntityKindFlags::NONE,
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vec3::ONE,
            time_scale: 1.0,
            force_animate: false,
            body: None,
            animation: None,
            player: None,
            light: None,
        }
    }
}
