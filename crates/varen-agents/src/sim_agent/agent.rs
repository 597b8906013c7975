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

use varen_core::asset::ClipLibrary;
use varen_core::physics::BodyInterface;
use varen_data::player::ActionKind;
use varen_data::EntityKindFlags;
use varen_lanes::{AnimationLane, CameraLane, MovementLane};

use crate::occupancy::OccupancyGrid;
use crate::sim_agent::SimulationContext;

/// Runs the fixed per-frame phase order over a [`SimulationContext`].
///
/// Phases, in order:
/// 1. capture the occupancy snapshot for this frame,
/// 2. per entity in slot order: pull the physics transform, then tick
///    animation,
/// 3. tick player movement,
/// 4. tick the camera transition on raw wall time,
/// 5. propagate deferred entity deletions.
///
/// Deletions requested during phases 2-3 only take effect in phase 5, so
/// every system within a frame sees the same entity set.
#[derive(Debug, Default)]
pub struct SimulationAgent {
    anim_lane: AnimationLane,
    move_lane: MovementLane,
    camera_lane: CameraLane,
}

impl SimulationAgent {
    /// Creates the agent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers a movement action on the context's player entity. Returns
    /// `false` when there is no player or its buffer is full.
    pub fn queue_action(&self, ctx: &mut SimulationContext, kind: ActionKind) -> bool {
        match ctx.store.get_mut(ctx.player) {
            Some(entity) => MovementLane::enqueue(entity, kind),
            None => false,
        }
    }

    /// Advances the simulation by `dt` seconds of wall time.
    pub fn tick(
        &self,
        ctx: &mut SimulationContext,
        bodies: &dyn BodyInterface,
        assets: &dyn ClipLibrary,
        dt: f32,
    ) {
        let running = ctx.is_running();
        let sim_dt = dt * ctx.time_scale;
        let occupancy = OccupancyGrid::capture(&ctx.store);

        for index in 0..ctx.store.slot_count() {
            let Some((_, entity)) = ctx.store.slot_at_mut(index) else {
                continue;
            };

            // The physics engine owns the transform of simulated bodies
            // while the world runs.
            if running {
                if let Some(handle) = entity.body {
                    if bodies.body_exists(handle) {
                        entity.position = bodies.center_of_mass_position(handle);
                        entity.rotation = bodies.rotation(handle);
                    }
                }
            }

            if entity.kind.contains(EntityKindFlags::ANIMATED_MESH)
                && (running || entity.force_animate)
            {
                self.anim_lane.tick(entity, assets, sim_dt);
            }
        }

        if running && !ctx.player.is_null() {
            if let Some(entity) = ctx.store.get_mut(ctx.player) {
                self.move_lane.update(entity, &occupancy, assets, sim_dt);
            } else {
                log::debug!("player handle {:?} is stale", ctx.player);
            }
        }

        self.camera_lane.tick(&mut ctx.camera, dt);

        ctx.store.propagate_changes();
    }
}
