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

use varen_data::camera::CameraTransition;
use varen_data::{EntityId, EntityStore};

/// Everything a simulation tick operates on.
///
/// Owned by whoever drives the loop (the editor shell or a headless
/// runner); the agent borrows it once per frame.
#[derive(Debug)]
pub struct SimulationContext {
    /// The scene's entities.
    pub store: EntityStore,
    /// The entity movement input is routed to. `NULL` when no player exists.
    pub player: EntityId,
    /// Whether the simulation is in play mode at all.
    pub playing: bool,
    /// Pause flag, only meaningful while playing.
    pub paused: bool,
    /// Global time multiplier applied to simulation time (not the camera).
    pub time_scale: f32,
    /// The editor/play camera transition.
    pub camera: CameraTransition,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationContext {
    /// Creates an empty, stopped context at full capacity.
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(),
            player: EntityId::NULL,
            playing: false,
            paused: false,
            time_scale: 1.0,
            camera: CameraTransition::default(),
        }
    }

    /// Whether simulation time advances this frame.
    pub fn is_running(&self) -> bool {
        self.playing && !self.paused
    }
}
