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

//! The movement lane: grid-snapped player movement driven by the bounded
//! action queue.
//!
//! Actions never preempt each other. The head action activates only after an
//! occupancy check of its target cell; a blocked action is dropped, not
//! retried. While the head runs, the second action is previewed one step
//! ahead so its clip can be queued early enough for the blender to cross-fade
//! into it.

use varen_core::asset::ClipLibrary;
use varen_core::math::{Quaternion, Vec3};
use varen_core::occupancy::{GridCell, OccupancyProvider};
use varen_data::player::ActionKind;
use varen_data::{AnimationState, Entity};

use crate::anim_lane::{AnimationLane, PlayRequest};

/// The grid movement model.
#[derive(Debug, Default)]
pub struct MovementLane;

impl MovementLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Buffers an action on a player entity. Returns `false` when the entity
    /// is not a player or the buffer is full.
    pub fn enqueue(entity: &mut Entity, kind: ActionKind) -> bool {
        match entity.player.as_mut() {
            Some(player) => player.actions.push(kind),
            None => false,
        }
    }

    /// Runs one movement tick for the player entity.
    ///
    /// `dt` is world time; the backlog speed multiplier is applied to the
    /// action timers here and mirrored onto `entity.time_scale` so the
    /// animation lane paces clips identically.
    pub fn update(
        &self,
        entity: &mut Entity,
        occupancy: &dyn OccupancyProvider,
        assets: &dyn ClipLibrary,
        dt: f32,
    ) {
        let Entity {
            position,
            rotation,
            time_scale,
            animation,
            player,
            ..
        } = entity;
        let Some(player) = player.as_mut() else {
            return;
        };

        let multiplier = player.actions.speed_multiplier();
        *time_scale = multiplier;
        let pending_offset = player.pending_offset;

        // Head activation.
        let mut head_blocked = false;
        let mut activation: Option<(ActionKind, Vec3, Quaternion, f32)> = None;
        if let Some(head) = player.actions.front_mut() {
            if !head.active {
                let target = *position + pending_offset + rotation.rotate_vec3(head.delta_position);
                if Self::target_free(occupancy, target) {
                    head.active = true;
                    activation = Some((head.kind, head.delta_position, head.delta_rotation, head.duration));
                } else {
                    head_blocked = true;
                }
            }
        }
        if head_blocked {
            if let Some(dropped) = player.actions.pop_front() {
                log::debug!("movement blocked, dropping {:?}", dropped.kind);
            }
        }
        if let Some((kind, delta_position, delta_rotation, duration)) = activation {
            Self::start_action_clip(animation, assets, kind, delta_position, delta_rotation, duration);
        }

        // Look-ahead: while the head runs, validate and start the second
        // action against the pose the head will leave behind.
        let head_deltas = player
            .actions
            .iter()
            .next()
            .filter(|head| head.active)
            .map(|head| (head.delta_position, head.delta_rotation));
        if let Some((head_position, head_rotation)) = head_deltas {
            let mut second_blocked = false;
            let mut second_activation: Option<(ActionKind, Vec3, Quaternion, f32)> = None;
            if let Some(second) = player.actions.second_mut() {
                if !second.active {
                    let position_after = *position + pending_offset + rotation.rotate_vec3(head_position);
                    let rotation_after = *rotation * head_rotation;
                    let target = position_after + rotation_after.rotate_vec3(second.delta_position);
                    if Self::target_free(occupancy, target) {
                        second.active = true;
                        second_activation =
                            Some((second.kind, second.delta_position, second.delta_rotation, second.duration));
                    } else {
                        second_blocked = true;
                    }
                }
            }
            if second_blocked {
                if let Some(dropped) = player.actions.drop_second() {
                    log::debug!("look-ahead blocked, dropping {:?}", dropped.kind);
                }
            }
            if let Some((kind, delta_position, delta_rotation, duration)) = second_activation {
                Self::start_action_clip(animation, assets, kind, delta_position, delta_rotation, duration);
            }
        }

        // Timers. The entity transform itself is driven by the animation
        // lane's buffered delta, not here.
        let head_done = match player.actions.front_mut() {
            Some(head) if head.active => {
                head.elapsed += dt * multiplier;
                head.elapsed >= head.duration
            }
            _ => false,
        };
        if head_done {
            player.actions.pop_front();
        }
    }

    /// Queues the clip an activating action plays, carrying the action's
    /// deltas so the blender applies them at clip completion. The clip is
    /// retimed to the action's fixed pacing duration.
    fn start_action_clip(
        animation: &mut Option<AnimationState>,
        assets: &dyn ClipLibrary,
        kind: ActionKind,
        delta_position: Vec3,
        delta_rotation: Quaternion,
        duration: f32,
    ) {
        let Some(state) = animation.as_mut() else {
            return;
        };
        if let Some(event) = AnimationLane::play(state, assets, PlayRequest::queued(kind.clip_name()))
        {
            event.blend = true;
            event.transform_entity = true;
            event.delta_position = delta_position;
            event.delta_rotation = delta_rotation;
            if duration > f32::EPSILON && event.duration > f32::EPSILON {
                event.time_scale = event.duration / duration;
            }
        }
    }

    /// A target is walkable when its own cell is free and the cell beneath
    /// it is not: standing room above solid ground.
    fn target_free(occupancy: &dyn OccupancyProvider, target: Vec3) -> bool {
        let cell = GridCell::from_world(target);
        occupancy.is_position_free(cell) && !occupancy.is_position_free(cell.below())
    }
}
