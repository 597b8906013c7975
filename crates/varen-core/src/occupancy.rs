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

//! Grid-snapped occupancy queries.
//!
//! Player movement is validated against an integer lattice: world positions
//! are rounded to the nearest cell and compared against static collider
//! entities. This is a pure validity check, not a physics-simulated collision
//! response.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// An integer lattice coordinate used for occupancy tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct GridCell {
    /// The x coordinate of the cell.
    pub x: i32,
    /// The y coordinate of the cell.
    pub y: i32,
    /// The z coordinate of the cell.
    pub z: i32,
}

impl GridCell {
    /// Creates a cell from explicit lattice coordinates.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Snaps a world-space position to the nearest lattice cell.
    #[inline]
    pub fn from_world(position: Vec3) -> Self {
        Self {
            x: position.x.round() as i32,
            y: position.y.round() as i32,
            z: position.z.round() as i32,
        }
    }

    /// Returns the cell exactly one unit beneath this one.
    #[inline]
    pub const fn below(&self) -> Self {
        Self {
            x: self.x,
            y: self.y - 1,
            z: self.z,
        }
    }
}

/// Occupancy collaborator queried by the movement model.
///
/// Implementations are expected to be a snapshot of collider entities snapped
/// to the lattice; queries must be side-effect free so that identical input
/// sequences produce identical movement decisions.
pub trait OccupancyProvider {
    /// Returns `true` if no collider occupies the given cell.
    fn is_position_free(&self, cell: GridCell) -> bool;
}
