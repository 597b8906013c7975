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

//! Capability flags describing what an entity is.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Flags representing the capabilities of an entity.
///
/// An entity can be several kinds at once (a collider that is also a mesh,
/// a player that is also an animated mesh). Systems dispatch by checking
/// flag bits, not by downcasting. Multiple kinds can be combined using
/// bitwise operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode,
)]
pub struct EntityKindFlags {
    bits: u32,
}

impl EntityKindFlags {
    /// No capabilities.
    pub const NONE: Self = Self { bits: 0 };
    /// A static rendered mesh.
    pub const MESH: Self = Self { bits: 1 << 0 };
    /// A skinned mesh driven by the animation blender.
    pub const ANIMATED_MESH: Self = Self { bits: 1 << 1 };
    /// A grid-snapped collider participating in occupancy checks.
    pub const COLLIDER: Self = Self { bits: 1 << 2 };
    /// A water volume.
    pub const WATER: Self = Self { bits: 1 << 3 };
    /// The player entity driven by the movement model.
    pub const PLAYER: Self = Self { bits: 1 << 4 };
    /// A point light.
    pub const POINT_LIGHT: Self = Self { bits: 1 << 5 };

    /// Creates a new set of kind flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if these flags contain every bit of `other`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if these flags are empty (no capabilities).
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl Default for EntityKindFlags {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::ops::BitOr for EntityKindFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for EntityKindFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}
