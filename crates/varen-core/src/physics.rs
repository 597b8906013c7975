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

//! # Physics Abstractions
//!
//! The narrow, read-only contract through which the simulation core consumes
//! an external physics engine. While the simulation is playing, the physics
//! engine is authoritative for the transform of any entity that owns a body;
//! the per-frame tick pulls positions and rotations through this trait and
//! never pushes state back.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::math::{Quaternion, Vec3};

/// Opaque handle to a rigid body in the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct RigidBodyHandle(pub u64);

/// Read-only view of rigid bodies owned by an external physics engine.
///
/// Stepping the simulation, creating bodies, and collision response are the
/// backend's concern; the runtime core only ever queries transforms here,
/// once per frame, on the main thread.
pub trait BodyInterface {
    /// Returns `true` if the body behind `handle` is still alive in the backend.
    fn body_exists(&self, handle: RigidBodyHandle) -> bool;

    /// Returns the world-space center-of-mass position of the body.
    fn center_of_mass_position(&self, handle: RigidBodyHandle) -> Vec3;

    /// Returns the world-space rotation of the body.
    fn rotation(&self, handle: RigidBodyHandle) -> Quaternion;
}
