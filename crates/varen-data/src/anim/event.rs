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

//! Animation events: live playback instances of shared clips.

use std::collections::VecDeque;
use std::sync::Arc;

use varen_core::asset::{AnimationClip, SkeletonHandle};
use varen_core::math::{Mat4, Quaternion, Vec3};

/// Maximum number of concurrently queued events per entity: one spent
/// "previous" entry kept for blending plus two pending plays.
pub const MAX_EVENT_DEPTH: usize = 3;

/// Default progress threshold below which a starting clip blends from its
/// predecessor.
pub const DEFAULT_BLEND_PREV_END: f32 = 0.25;
/// Default progress threshold above which a finishing clip blends toward its
/// successor.
pub const DEFAULT_BLEND_NEXT_START: f32 = 0.75;

/// The result of advancing an event's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still playing (or not playing at all).
    Running,
    /// A looping clip wrapped past its end.
    Wrapped,
    /// A non-looping clip reached its end this tick; `playing` was cleared.
    Finished,
}

/// A live, per-entity instance of clip playback state.
///
/// The clip asset itself is shared and read-only; everything mutable about
/// playback (time, blending, the buffered transform delta) lives here.
#[derive(Debug, Clone)]
pub struct AnimationEvent {
    /// The shared clip being played.
    pub clip: Arc<AnimationClip>,
    /// Playback position in seconds, always within `[0, duration]`.
    pub current_time: f32,
    /// Event length in seconds at `time_scale == 1`.
    pub duration: f32,
    /// Playback rate multiplier for this event.
    pub time_scale: f32,
    /// Whether the clip wraps via modulo instead of clamping.
    pub looped: bool,
    /// Whether the clock advances.
    pub playing: bool,
    /// Whether this event participates in blending at all.
    pub blend: bool,
    /// Progress at which blending from the previous pose starts.
    pub blend_prev_start: f32,
    /// Progress below which the event blends from the previous pose.
    pub blend_prev_end: f32,
    /// Progress above which the event blends toward the upcoming pose.
    pub blend_next_start: f32,
    /// Whether the clip's net displacement is applied to the owning entity
    /// at completion.
    pub transform_entity: bool,
    /// Net position displacement the clip represents, in entity-local space.
    pub delta_position: Vec3,
    /// Net rotation displacement the clip represents.
    pub delta_rotation: Quaternion,
    /// The event's remaining presence after its last blend, used to keep
    /// chained blends continuous when this event becomes the "previous"
    /// partner. `1.0` when the event has not blended away at all.
    pub blend_amount: f32,
}

impl AnimationEvent {
    /// Creates an event playing `clip` from the start at its native length.
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let duration = clip.duration_seconds();
        Self {
            clip,
            current_time: 0.0,
            duration,
            time_scale: 1.0,
            looped: false,
            playing: true,
            blend: false,
            blend_prev_start: 0.0,
            blend_prev_end: DEFAULT_BLEND_PREV_END,
            blend_next_start: DEFAULT_BLEND_NEXT_START,
            transform_entity: false,
            delta_position: Vec3::ZERO,
            delta_rotation: Quaternion::IDENTITY,
            blend_amount: 1.0,
        }
    }

    /// Playback progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration > f32::EPSILON {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Advances the event clock by `dt` seconds of entity time.
    ///
    /// Looping clips wrap via modulo; non-looping clips clamp to `duration`
    /// and clear `playing` exactly once. Overshoot past the end is not
    /// stored; a caller that wants to carry leftover time into a follow-up
    /// event computes it from the pre-advance remaining time.
    pub fn advance(&mut self, dt: f32) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Running;
        }
        self.current_time += dt * self.time_scale;
        if self.duration <= f32::EPSILON {
            self.current_time = 0.0;
            if !self.looped {
                self.playing = false;
                return TickOutcome::Finished;
            }
            return TickOutcome::Running;
        }
        if self.current_time < self.duration {
            return TickOutcome::Running;
        }
        if self.looped {
            self.current_time = self.current_time.rem_euclid(self.duration);
            TickOutcome::Wrapped
        } else {
            self.current_time = self.duration;
            self.playing = false;
            TickOutcome::Finished
        }
    }
}

/// Animation playback state attached to an `ANIMATED_MESH` entity.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// The skeleton this entity is skinned to.
    pub skeleton: SkeletonHandle,
    /// Queued events, front to back. After the first-ever play completes,
    /// the front entry is the most recently finished event, retained as the
    /// blend-with-previous partner.
    pub events: VecDeque<AnimationEvent>,
    /// The persistent idle event, current whenever the queue has nothing to
    /// play, and the blend partner at the edges of the queue.
    pub default_event: Option<AnimationEvent>,
    /// Set once the first-ever queued play has finished.
    pub started: bool,
    /// Transform delta buffered at event completion, applied to the owning
    /// entity at the start of the next tick (never mid-frame).
    pub pending_delta: Option<(Vec3, Quaternion)>,
    /// The skinning palette produced by the last pose evaluation.
    pub bone_matrices: Vec<Mat4>,
}

impl AnimationState {
    /// Creates an empty playback state for the given skeleton.
    pub fn new(skeleton: SkeletonHandle) -> Self {
        Self {
            skeleton,
            events: VecDeque::new(),
            default_event: None,
            started: false,
            pending_delta: None,
            bone_matrices: Vec::new(),
        }
    }

    /// Pushes a new event, refusing past [`MAX_EVENT_DEPTH`].
    pub fn push_event(&mut self, event: AnimationEvent) -> bool {
        if self.events.len() >= MAX_EVENT_DEPTH {
            log::warn!(
                "animation event queue full (depth {}), dropping '{}'",
                MAX_EVENT_DEPTH,
                event.clip.name
            );
            return false;
        }
        self.events.push_back(event);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varen_core::math::approx_eq;

    fn test_clip(duration_ticks: f32, ticks_per_second: f32) -> Arc<AnimationClip> {
        Arc::new(AnimationClip {
            name: "test".to_string(),
            duration_ticks,
            ticks_per_second,
            tracks: vec![],
        })
    }

    #[test]
    fn looping_event_wraps_via_modulo() {
        // duration = 20 ticks / 10 tps = 2.0 s
        let mut event = AnimationEvent::new(test_clip(20.0, 10.0));
        event.looped = true;

        assert_eq!(event.advance(1.2), TickOutcome::Running);
        assert_eq!(event.advance(1.2), TickOutcome::Wrapped);

        assert!(approx_eq(event.current_time, 0.4));
        assert!(event.playing);
    }

    #[test]
    fn non_looping_event_clamps_and_stops_exactly_once() {
        let mut event = AnimationEvent::new(test_clip(20.0, 10.0));

        assert_eq!(event.advance(1.5), TickOutcome::Running);
        assert_eq!(event.advance(1.5), TickOutcome::Finished);
        assert!(approx_eq(event.current_time, 2.0));
        assert!(!event.playing);

        // A stopped event no longer advances or re-finishes.
        assert_eq!(event.advance(1.0), TickOutcome::Running);
        assert!(approx_eq(event.current_time, 2.0));
    }

    #[test]
    fn current_time_stays_within_bounds_under_any_dt_sequence() {
        let mut looped = AnimationEvent::new(test_clip(20.0, 10.0));
        looped.looped = true;
        let mut clamped = AnimationEvent::new(test_clip(20.0, 10.0));

        for dt in [0.016, 0.7, 1.9, 0.33, 5.0, 0.0, 2.0] {
            looped.advance(dt);
            clamped.advance(dt);
            for event in [&looped, &clamped] {
                assert!(event.current_time >= 0.0);
                assert!(event.current_time <= event.duration);
            }
        }
    }

    #[test]
    fn event_queue_is_depth_bounded() {
        let mut state = AnimationState::new(SkeletonHandle(1));
        for _ in 0..MAX_EVENT_DEPTH {
            assert!(state.push_event(AnimationEvent::new(test_clip(10.0, 10.0))));
        }
        assert!(!state.push_event(AnimationEvent::new(test_clip(10.0, 10.0))));
        assert_eq!(state.events.len(), MAX_EVENT_DEPTH);
    }
}
