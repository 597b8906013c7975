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

//! Discrete player actions and the bounded queue that buffers them.

use std::collections::VecDeque;

use varen_core::math::{Quaternion, Vec3, FRAC_PI_2};

/// Maximum number of buffered actions. Enqueue requests past this bound are
/// refused, never silently grown.
pub const MAX_ACTION_BUFFER: usize = 5;

/// Maximum extra playback speed applied when the action queue is full, so a
/// backlog drains faster instead of accumulating visual lag.
pub const MAX_SPEEDUP: f32 = 1.5;

/// How long a forward step takes, in seconds.
pub const STEP_DURATION: f32 = 0.4;
/// How long a quarter turn takes, in seconds.
pub const TURN_DURATION: f32 = 0.3;

/// The discrete actions the player can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Move one grid unit along the current facing.
    StepForward,
    /// Rotate 90 degrees counterclockwise.
    TurnLeft,
    /// Rotate 90 degrees clockwise.
    TurnRight,
}

impl ActionKind {
    /// The animation clip played when this action activates.
    pub fn clip_name(&self) -> &'static str {
        match self {
            ActionKind::StepForward => "step_forward",
            ActionKind::TurnLeft => "turn_left",
            ActionKind::TurnRight => "turn_right",
        }
    }

    /// The fixed pacing duration of this action, in seconds.
    ///
    /// Deliberately decoupled from the animation clip's own length; the two
    /// are reconciled via `time_scale` on the animation event.
    pub fn duration(&self) -> f32 {
        match self {
            ActionKind::StepForward => STEP_DURATION,
            ActionKind::TurnLeft | ActionKind::TurnRight => TURN_DURATION,
        }
    }
}

/// A queued, non-preemptible player action.
#[derive(Debug, Clone)]
pub struct PlayerAction {
    /// What this action does.
    pub kind: ActionKind,
    /// Fixed pacing duration in seconds.
    pub duration: f32,
    /// Time elapsed since activation, in seconds of scaled entity time.
    pub elapsed: f32,
    /// Set once the action passed its occupancy check and started its clip.
    pub active: bool,
    /// Position delta relative to the acting entity's orientation at
    /// activation. One unit forward is `-Z`.
    pub delta_position: Vec3,
    /// Rotation delta applied by this action.
    pub delta_rotation: Quaternion,
}

impl PlayerAction {
    /// Creates an inactive action carrying the deltas its kind represents.
    pub fn new(kind: ActionKind) -> Self {
        let (delta_position, delta_rotation) = match kind {
            ActionKind::StepForward => (Vec3::new(0.0, 0.0, -1.0), Quaternion::IDENTITY),
            ActionKind::TurnLeft => (Vec3::ZERO, Quaternion::from_rotation_y(FRAC_PI_2)),
            ActionKind::TurnRight => (Vec3::ZERO, Quaternion::from_rotation_y(-FRAC_PI_2)),
        };
        Self {
            kind,
            duration: kind.duration(),
            elapsed: 0.0,
            active: false,
            delta_position,
            delta_rotation,
        }
    }
}

/// Ordered, bounded queue of player actions, consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    actions: VecDeque<PlayerAction>,
}

impl ActionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action, refusing when the buffer already holds
    /// [`MAX_ACTION_BUFFER`] entries. A `false` return means "input dropped,
    /// buffer full"; the caller decides how to react.
    pub fn push(&mut self, kind: ActionKind) -> bool {
        if self.actions.len() >= MAX_ACTION_BUFFER {
            return false;
        }
        self.actions.push_back(PlayerAction::new(kind));
        true
    }

    /// The action at the head of the queue.
    pub fn front_mut(&mut self) -> Option<&mut PlayerAction> {
        self.actions.front_mut()
    }

    /// The second queued action, previewed by the movement model's
    /// look-ahead while the head is active.
    pub fn second_mut(&mut self) -> Option<&mut PlayerAction> {
        self.actions.get_mut(1)
    }

    /// Removes and returns the head action.
    pub fn pop_front(&mut self) -> Option<PlayerAction> {
        self.actions.pop_front()
    }

    /// Removes the second queued action (a blocked look-ahead target).
    pub fn drop_second(&mut self) -> Option<PlayerAction> {
        self.actions.remove(1)
    }

    /// The number of buffered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are buffered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Playback speed multiplier for the current backlog:
    /// `1 + (len / MAX_ACTION_BUFFER) * MAX_SPEEDUP`.
    pub fn speed_multiplier(&self) -> f32 {
        1.0 + (self.actions.len() as f32 / MAX_ACTION_BUFFER as f32) * MAX_SPEEDUP
    }

    /// Iterates the buffered actions front to back.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerAction> {
        self.actions.iter()
    }
}

/// Movement state attached to the `PLAYER` entity. The queue is owned
/// exclusively here.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    /// The buffered actions.
    pub actions: ActionQueue,
    /// Offset applied by an in-progress editor gizmo drag, composed into
    /// movement targets so a dragged player validates against where it will
    /// land.
    pub pending_offset: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use varen_core::math::approx_eq;

    #[test]
    fn queue_refuses_past_the_bound() {
        let mut queue = ActionQueue::new();
        for _ in 0..MAX_ACTION_BUFFER {
            assert!(queue.push(ActionKind::StepForward));
        }
        assert!(!queue.push(ActionKind::StepForward));
        assert_eq!(queue.len(), MAX_ACTION_BUFFER);
    }

    #[test]
    fn speed_multiplier_scales_with_backlog() {
        let mut queue = ActionQueue::new();
        assert!(approx_eq(queue.speed_multiplier(), 1.0));
        for _ in 0..MAX_ACTION_BUFFER {
            queue.push(ActionKind::TurnLeft);
        }
        assert!(approx_eq(queue.speed_multiplier(), 1.0 + MAX_SPEEDUP));
    }

    #[test]
    fn turn_actions_carry_quarter_turn_deltas() {
        let left = PlayerAction::new(ActionKind::TurnLeft);
        let forward = Vec3::new(0.0, 0.0, -1.0);
        let turned = left.delta_rotation.rotate_vec3(forward);
        assert!(approx_eq(turned.x, -1.0));
        assert!(approx_eq(turned.z, 0.0));
    }
}
