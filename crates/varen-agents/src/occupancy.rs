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

//! Grid occupancy captured from the entity store.

use std::collections::HashSet;

use varen_core::occupancy::{GridCell, OccupancyProvider};
use varen_data::{EntityKindFlags, EntityStore};

/// A snapshot of which grid cells are solid, taken once at the start of a
/// tick. Movement validates against this snapshot, so the answer stays
/// consistent for the whole frame even while entities move.
#[derive(Debug, Default, Clone)]
pub struct OccupancyGrid {
    solid: HashSet<GridCell>,
}

impl OccupancyGrid {
    /// Captures the cells occupied by `COLLIDER` entities.
    pub fn capture(store: &EntityStore) -> Self {
        let mut solid = HashSet::new();
        for (_, entity) in store.iter_live() {
            if entity.kind.contains(EntityKindFlags::COLLIDER) {
                solid.insert(GridCell::from_world(entity.position));
            }
        }
        Self { solid }
    }
}

impl OccupancyProvider for OccupancyGrid {
    fn is_position_free(&self, cell: GridCell) -> bool {
        !self.solid.contains(&cell)
    }
}
