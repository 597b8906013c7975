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

//! The animation lane: clip scheduling, cross-fade blending, and skinning
//! palette evaluation.
//!
//! Per entity and per tick the lane runs three phases in a fixed order:
//! blend-state selection from the current event's playback progress, pose
//! evaluation at the pre-advance clock values, and finally the time advance
//! with completion handling. Transform deltas produced by a completing event
//! are buffered and applied at the start of the *next* tick, so an entity's
//! transform never changes mid-frame.

use varen_core::asset::{AnimationClip, ClipLibrary, SkeletalBone, Skeleton};
use varen_core::math::{linear_step, Mat4};
use varen_data::anim::{AnimationEvent, AnimationState, TickOutcome};
use varen_data::Entity;

/// A request to schedule clip playback on an [`AnimationState`].
#[derive(Debug, Clone, Copy)]
pub struct PlayRequest<'a> {
    /// The clip name, resolved against the state's skeleton.
    pub name: &'a str,
    /// Playback position to start from, in seconds.
    pub start_time: f32,
    /// Install as the persistent looping idle instead of queueing.
    pub fallback: bool,
    /// Drop queued-but-not-current events before scheduling.
    pub immediate: bool,
    /// Whether the event's clock runs.
    pub playing: bool,
}

impl<'a> PlayRequest<'a> {
    /// A plain queued play of `name` from the start.
    pub fn queued(name: &'a str) -> Self {
        Self {
            name,
            start_time: 0.0,
            fallback: false,
            immediate: false,
            playing: true,
        }
    }
}

/// Which pose a blending event mixes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// An entry of the event queue.
    Queued(usize),
    /// The persistent idle event.
    Default,
}

/// The blend state chosen for one tick.
#[derive(Debug, Clone, Copy)]
struct BlendChoice {
    partner: Slot,
    /// Whether the partner is the upcoming pose rather than the outgoing one.
    with_next: bool,
    /// Weight of the partner pose, in `[0, 1]`.
    bias: f32,
}

/// The animation blender.
#[derive(Debug, Default)]
pub struct AnimationLane;

impl AnimationLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Schedules clip playback on `state`, returning the created event for
    /// further configuration. Unknown clip names are logged and skipped, so
    /// bad asset data degrades to a missing animation rather than a crash.
    pub fn play<'s>(
        state: &'s mut AnimationState,
        assets: &dyn ClipLibrary,
        request: PlayRequest<'_>,
    ) -> Option<&'s mut AnimationEvent> {
        let Some(clip) = assets.resolve_clip_by_name(state.skeleton, request.name) else {
            log::warn!(
                "unknown animation clip '{}' for skeleton {:?}",
                request.name,
                state.skeleton
            );
            return None;
        };
        let mut event = AnimationEvent::new(clip);
        event.playing = request.playing;
        event.current_time = request.start_time.clamp(0.0, event.duration);

        if request.fallback {
            event.looped = true;
            state.default_event = Some(event);
            return state.default_event.as_mut();
        }
        if request.immediate {
            // Keep the current event (and the spent previous one), drop
            // everything queued behind it.
            let keep = match Self::current_slot(state) {
                Some(Slot::Queued(index)) => index + 1,
                _ => state.events.len().min(1),
            };
            state.events.truncate(keep);
        }
        if !state.push_event(event) {
            return None;
        }
        state.events.back_mut()
    }

    /// Runs one animation tick for `entity` with `dt` seconds of world time.
    ///
    /// `dt` is scaled by the entity's own `time_scale` before reaching event
    /// clocks. Entities without animation state are ignored.
    pub fn tick(&self, entity: &mut Entity, assets: &dyn ClipLibrary, dt: f32) {
        // Phase 0: commit the transform delta buffered on the previous tick.
        let pending = entity
            .animation
            .as_mut()
            .and_then(|state| state.pending_delta.take());
        if let Some((delta_position, delta_rotation)) = pending {
            entity.position += entity.rotation.rotate_vec3(delta_position);
            entity.rotation = (entity.rotation * delta_rotation).normalize();
        }

        let entity_scale = entity.time_scale;
        let Some(state) = entity.animation.as_mut() else {
            return;
        };
        let Some(skeleton) = assets.skeleton(state.skeleton) else {
            log::warn!("unknown skeleton {:?}, skipping animation tick", state.skeleton);
            return;
        };

        // Phase 1: pick the blend state from the current progress.
        let blend = Self::select_blend(state);
        if let Some(slot) = Self::current_slot(state) {
            let amount = match blend {
                Some(choice) => 1.0 - choice.bias,
                None => 1.0,
            };
            if let Some(current) = Self::event_mut(state, slot) {
                current.blend_amount = amount;
            }
        }

        // Phase 2: evaluate the pose at the pre-advance clock values.
        Self::evaluate_pose(state, &skeleton, blend);

        // Phase 3: advance clocks and handle completion.
        Self::advance_time(state, dt * entity_scale, blend.map(|choice| choice.partner));
    }

    /// The slot whose clip the entity is currently showing.
    ///
    /// Before the first-ever play finishes, the front queue entry is current;
    /// afterwards the front entry is the retained "previous" event and the
    /// second entry is current. The persistent idle covers the gaps.
    fn current_slot(state: &AnimationState) -> Option<Slot> {
        if !state.started {
            if !state.events.is_empty() {
                return Some(Slot::Queued(0));
            }
        } else if state.events.len() >= 2 {
            return Some(Slot::Queued(1));
        }
        state.default_event.as_ref().map(|_| Slot::Default)
    }

    /// The outgoing pose the current event blends from near its start.
    fn previous_slot(state: &AnimationState, current: Slot) -> Option<Slot> {
        match current {
            Slot::Queued(0) => state.default_event.as_ref().map(|_| Slot::Default),
            Slot::Queued(index) => Some(Slot::Queued(index - 1)),
            Slot::Default => {
                if state.started && !state.events.is_empty() {
                    Some(Slot::Queued(0))
                } else {
                    None
                }
            }
        }
    }

    /// The upcoming pose the current event blends toward near its end.
    fn next_slot(state: &AnimationState, current: Slot) -> Option<Slot> {
        match current {
            Slot::Queued(index) => {
                if index + 1 < state.events.len() {
                    Some(Slot::Queued(index + 1))
                } else {
                    state.default_event.as_ref().map(|_| Slot::Default)
                }
            }
            Slot::Default => None,
        }
    }

    fn event(state: &AnimationState, slot: Slot) -> Option<&AnimationEvent> {
        match slot {
            Slot::Queued(index) => state.events.get(index),
            Slot::Default => state.default_event.as_ref(),
        }
    }

    fn event_mut(state: &mut AnimationState, slot: Slot) -> Option<&mut AnimationEvent> {
        match slot {
            Slot::Queued(index) => state.events.get_mut(index),
            Slot::Default => state.default_event.as_mut(),
        }
    }

    /// Decides whether this tick blends, with which partner, and how hard.
    ///
    /// Early in the current event the partner is the previous pose and the
    /// partner weight falls from 1 to 0 across the blend-in window; late in
    /// the event the partner is the next pose and the weight rises from 0 to
    /// 1. A partner that has itself partially blended away scales the weight
    /// by its remaining `blend_amount`, which keeps chained cross-fades from
    /// popping.
    fn select_blend(state: &AnimationState) -> Option<BlendChoice> {
        let current_slot = Self::current_slot(state)?;
        let current = Self::event(state, current_slot)?;
        if !current.blend {
            return None;
        }
        let progress = current.progress();

        if progress < current.blend_prev_end {
            let partner = Self::previous_slot(state, current_slot)?;
            let previous = Self::event(state, partner)?;
            let mut bias =
                1.0 - linear_step(current.blend_prev_start, current.blend_prev_end, progress);
            if previous.blend {
                bias *= previous.blend_amount;
            }
            return Some(BlendChoice {
                partner,
                with_next: false,
                bias,
            });
        }
        if progress > current.blend_next_start {
            let partner = Self::next_slot(state, current_slot)?;
            let next = Self::event(state, partner)?;
            let mut bias = linear_step(current.blend_next_start, 1.0, progress);
            if next.blend {
                bias *= next.blend_amount;
            }
            return Some(BlendChoice {
                partner,
                with_next: true,
                bias,
            });
        }
        None
    }

    /// Writes the skinning palette for this tick into `state.bone_matrices`.
    fn evaluate_pose(state: &mut AnimationState, skeleton: &Skeleton, blend: Option<BlendChoice>) {
        let bone_count = skeleton.bones.len();
        state.bone_matrices.clear();
        state
            .bone_matrices
            .resize(skeleton.skin_matrix_count, Mat4::IDENTITY);

        let current = Self::current_slot(state).and_then(|slot| Self::event(state, slot)).cloned();
        let Some(current) = current else {
            // Nothing scheduled at all: the bind pose.
            let mut globals = vec![Mat4::IDENTITY; bone_count];
            for index in 0..bone_count {
                let bone = &skeleton.bones[index];
                let parent = bone.parent.map_or(Mat4::IDENTITY, |p| globals[p]);
                globals[index] = parent * bone.local_bind;
                Self::write_skin_matrix(&mut state.bone_matrices, bone, globals[index]);
            }
            return;
        };

        let current_tick = current.clip.tick_at(current.current_time, current.looped);
        let mut globals = vec![Mat4::IDENTITY; bone_count];
        for index in 0..bone_count {
            let bone = &skeleton.bones[index];
            let local = Self::sample_local(&current.clip, index, current_tick, bone);
            let parent = bone.parent.map_or(Mat4::IDENTITY, |p| globals[p]);
            globals[index] = parent * local;
        }

        let partner = blend.and_then(|choice| {
            Self::event(state, choice.partner)
                .cloned()
                .map(|event| (event, choice))
        });
        let Some((partner, choice)) = partner else {
            for (index, bone) in skeleton.bones.iter().enumerate() {
                Self::write_skin_matrix(&mut state.bone_matrices, bone, globals[index]);
            }
            return;
        };

        // The upcoming clip is authored relative to where the entity will
        // stand after the current one lands, so its hierarchy is evaluated
        // under the current event's pending displacement.
        let partner_root = if choice.with_next {
            Mat4::from_translation(current.delta_position) * Mat4::from_quat(current.delta_rotation)
        } else {
            Mat4::IDENTITY
        };
        let partner_tick = partner.clip.tick_at(partner.current_time, partner.looped);
        let mut partner_globals = vec![Mat4::IDENTITY; bone_count];
        for index in 0..bone_count {
            let bone = &skeleton.bones[index];
            let local = Self::sample_local(&partner.clip, index, partner_tick, bone);
            let parent = bone.parent.map_or(partner_root, |p| partner_globals[p]);
            partner_globals[index] = parent * local;
        }

        for (index, bone) in skeleton.bones.iter().enumerate() {
            let mixed = Mat4::lerp(globals[index], partner_globals[index], choice.bias);
            Self::write_skin_matrix(&mut state.bone_matrices, bone, mixed);
        }
    }

    /// Samples a bone's local transform, falling back to the rest pose for
    /// bones the clip does not animate.
    fn sample_local(clip: &AnimationClip, bone_index: usize, tick: f32, bone: &SkeletalBone) -> Mat4 {
        clip.tracks
            .get(bone_index)
            .and_then(|track| track.as_ref())
            .map_or(bone.local_bind, |track| track.sample(tick))
    }

    fn write_skin_matrix(palette: &mut [Mat4], bone: &SkeletalBone, global: Mat4) {
        let Some(slot) = bone.skin_slot else {
            return;
        };
        let Some(entry) = palette.get_mut(slot) else {
            log::warn!("skin slot {} out of range for bone '{}'", slot, bone.name);
            return;
        };
        *entry = global * bone.offset;
    }

    /// Advances the clocks of the current event and its blend partner and
    /// handles completion of the current event.
    fn advance_time(state: &mut AnimationState, dt: f32, partner: Option<Slot>) {
        let Some(current_slot) = Self::current_slot(state) else {
            return;
        };

        if let Slot::Queued(index) = current_slot {
            let (outcome, leftover) = {
                let event = &mut state.events[index];
                let remaining = if event.playing && event.time_scale > f32::EPSILON {
                    (event.duration - event.current_time) / event.time_scale
                } else {
                    f32::INFINITY
                };
                let outcome = event.advance(dt);
                (outcome, (dt - remaining).max(0.0))
            };
            if outcome == TickOutcome::Finished {
                Self::complete_current(state, index, leftover);
            }
        } else if let Some(idle) = state.default_event.as_mut() {
            idle.advance(dt);
        }

        // The blend partner's clock keeps running so an idle partner stays
        // alive through the cross-fade. A spent previous event has
        // `playing == false` and stays put.
        if let Some(partner_slot) = partner {
            if partner_slot != current_slot {
                if let Some(event) = Self::event_mut(state, partner_slot) {
                    event.advance(dt);
                }
            }
        }
    }

    /// Handles completion of the current queued event: buffers its transform
    /// delta, promotes it to the retained "previous" entry, and carries any
    /// overshoot time into whatever plays next.
    fn complete_current(state: &mut AnimationState, index: usize, leftover: f32) {
        let event = &state.events[index];
        if event.transform_entity {
            state.pending_delta = Some((event.delta_position, event.delta_rotation));
        }
        if index == 0 {
            state.started = true;
        } else {
            // The finished event becomes the new previous; the old one is
            // spent twice over and goes away.
            state.events.pop_front();
        }

        if leftover <= f32::EPSILON {
            return;
        }
        if state.events.len() >= 2 {
            let next = &mut state.events[1];
            if next.playing {
                next.current_time =
                    (next.current_time + leftover * next.time_scale).min(next.duration);
            }
        } else if let Some(idle) = state.default_event.as_mut() {
            idle.advance(leftover);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use varen_core::asset::{BoneTrack, Keyframe, SkeletonHandle};
    use varen_core::math::{approx_eq, approx_eq_eps, Quaternion, Vec3};
    use varen_data::{Entity, EntityKindFlags};

    struct TestLibrary {
        skeleton: Arc<Skeleton>,
        clips: HashMap<String, Arc<AnimationClip>>,
    }

    impl ClipLibrary for TestLibrary {
        fn resolve_clip_by_name(
            &self,
            _skeleton: SkeletonHandle,
            name: &str,
        ) -> Option<Arc<AnimationClip>> {
            self.clips.get(name).cloned()
        }

        fn skeleton(&self, _handle: SkeletonHandle) -> Option<Arc<Skeleton>> {
            Some(self.skeleton.clone())
        }
    }

    /// A two-bone skeleton (root plus one child) with skin slots 0 and 1.
    fn test_skeleton() -> Arc<Skeleton> {
        Arc::new(Skeleton::new(vec![
            SkeletalBone {
                name: "root".to_string(),
                parent: None,
                skin_slot: Some(0),
                offset: Mat4::IDENTITY,
                local_bind: Mat4::IDENTITY,
            },
            SkeletalBone {
                name: "spine".to_string(),
                parent: Some(0),
                skin_slot: Some(1),
                offset: Mat4::IDENTITY,
                local_bind: Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
            },
        ]))
    }

    /// A clip translating the root from origin to `end` over one second.
    fn slide_clip(name: &str, end: Vec3) -> Arc<AnimationClip> {
        Arc::new(AnimationClip {
            name: name.to_string(),
            duration_ticks: 10.0,
            ticks_per_second: 10.0,
            tracks: vec![
                Some(BoneTrack {
                    position_keys: vec![Keyframe::new(0.0, Vec3::ZERO), Keyframe::new(10.0, end)],
                    rotation_keys: vec![],
                    scale_keys: vec![],
                }),
                None,
            ],
        })
    }

    fn test_library() -> TestLibrary {
        let mut clips = HashMap::new();
        clips.insert("idle".to_string(), slide_clip("idle", Vec3::ZERO));
        clips.insert(
            "step_forward".to_string(),
            slide_clip("step_forward", Vec3::new(0.0, 0.0, -1.0)),
        );
        TestLibrary {
            skeleton: test_skeleton(),
            clips,
        }
    }

    fn animated_entity() -> Entity {
        let mut entity = Entity::new(EntityKindFlags::ANIMATED_MESH);
        entity.animation = Some(AnimationState::new(SkeletonHandle(1)));
        entity
    }

    #[test]
    fn test_play_unknown_clip_is_skipped() {
        // --- 1. SETUP ---
        let library = test_library();
        let mut state = AnimationState::new(SkeletonHandle(1));

        // --- 2. ACTION ---
        let event = AnimationLane::play(&mut state, &library, PlayRequest::queued("missing"));

        // --- 3. ASSERTIONS ---
        assert!(event.is_none());
        assert!(state.events.is_empty(), "No event may be queued for a bad name");
    }

    #[test]
    fn test_fallback_installs_looping_idle() {
        // --- 1. SETUP ---
        let library = test_library();
        let mut state = AnimationState::new(SkeletonHandle(1));

        // --- 2. ACTION ---
        let request = PlayRequest {
            fallback: true,
            ..PlayRequest::queued("idle")
        };
        AnimationLane::play(&mut state, &library, request).expect("idle should resolve");

        // --- 3. ASSERTIONS ---
        let idle = state.default_event.as_ref().expect("default event installed");
        assert!(idle.looped, "The fallback idle must loop");
        assert!(state.events.is_empty(), "Fallback must not enter the queue");
    }

    #[test]
    fn test_tick_fills_the_skinning_palette() {
        // --- 1. SETUP ---
        let library = test_library();
        let lane = AnimationLane::new();
        let mut entity = animated_entity();
        let state = entity.animation.as_mut().unwrap();
        AnimationLane::play(state, &library, PlayRequest::queued("step_forward")).unwrap();

        // --- 2. ACTION ---
        lane.tick(&mut entity, &library, 0.5);

        // --- 3. ASSERTIONS ---
        let state = entity.animation.as_ref().unwrap();
        assert_eq!(state.bone_matrices.len(), 2);
        // Pose is evaluated before the advance, so the first tick samples t=0.
        let root = state.bone_matrices[0].transform_point3(Vec3::ZERO);
        assert!(approx_eq(root.z, 0.0));
        let spine = state.bone_matrices[1].transform_point3(Vec3::ZERO);
        assert!(approx_eq(spine.y, 1.0), "Child bones inherit parent globals");
    }

    #[test]
    fn test_blend_bias_follows_the_windows() {
        // --- 1. SETUP ---
        let library = test_library();
        let mut state = AnimationState::new(SkeletonHandle(1));
        let request = PlayRequest {
            fallback: true,
            ..PlayRequest::queued("idle")
        };
        AnimationLane::play(&mut state, &library, request).unwrap();
        let event =
            AnimationLane::play(&mut state, &library, PlayRequest::queued("step_forward")).unwrap();
        event.blend = true;

        // --- 2. ACTION / ASSERTIONS ---
        // Early: blending in from the idle, partner weight falling 1 -> 0.
        state.events[0].current_time = 0.1; // progress 0.1 of blend window [0, 0.25]
        let choice = AnimationLane::select_blend(&state).expect("should blend in");
        assert!(!choice.with_next);
        assert!(approx_eq(choice.bias, 1.0 - 0.1 / 0.25));

        // Middle: no blending at all.
        state.events[0].current_time = 0.5;
        assert!(AnimationLane::select_blend(&state).is_none());

        // Late: blending out toward the idle, weight rising 0 -> 1.
        state.events[0].current_time = 0.9; // window [0.75, 1.0]
        let choice = AnimationLane::select_blend(&state).expect("should blend out");
        assert!(choice.with_next);
        assert!(approx_eq(choice.bias, (0.9 - 0.75) / 0.25));
        assert!(choice.bias >= 0.0 && choice.bias <= 1.0);
    }

    #[test]
    fn test_partner_presence_scales_a_chained_blend() {
        // --- 1. SETUP ---
        // A previous event that had already faded to 40% presence.
        let library = test_library();
        let mut state = AnimationState::new(SkeletonHandle(1));
        let first =
            AnimationLane::play(&mut state, &library, PlayRequest::queued("step_forward")).unwrap();
        first.blend = true;
        first.blend_amount = 0.4;
        first.playing = false;
        first.current_time = first.duration;
        state.started = true;
        let second =
            AnimationLane::play(&mut state, &library, PlayRequest::queued("step_forward")).unwrap();
        second.blend = true;
        second.current_time = 0.05;

        // --- 2. ACTION ---
        let choice = AnimationLane::select_blend(&state).expect("should blend from previous");

        // --- 3. ASSERTIONS ---
        let raw = 1.0 - 0.05 / 0.25;
        assert!(approx_eq(choice.bias, raw * 0.4));
    }

    #[test]
    fn test_with_next_partner_is_posed_under_the_pending_displacement() {
        // --- 1. SETUP ---
        // A displacing clip blending out toward the idle. The idle pose must
        // be evaluated where the entity is about to land, not where it
        // stands, so the hand-off shows no jump.
        let library = test_library();
        let lane = AnimationLane::new();
        let mut entity = animated_entity();
        let state = entity.animation.as_mut().unwrap();
        let request = PlayRequest {
            fallback: true,
            ..PlayRequest::queued("idle")
        };
        AnimationLane::play(state, &library, request).unwrap();
        // The idle keeps the root at the origin, so any Z offset in the
        // palette can only come from the displacement pre-transform.
        let event = AnimationLane::play(state, &library, PlayRequest::queued("idle")).unwrap();
        event.blend = true;
        event.transform_entity = true;
        event.delta_position = Vec3::new(0.0, 0.0, -1.0);
        event.current_time = 0.875; // bias 0.5 inside the [0.75, 1.0] window

        // --- 2. ACTION ---
        lane.tick(&mut entity, &library, 0.0);

        // --- 3. ASSERTIONS ---
        let state = entity.animation.as_ref().unwrap();
        let root = state.bone_matrices[0].transform_point3(Vec3::ZERO);
        assert!(
            approx_eq(root.z, -0.5),
            "Half-weight blend shows half the displacement, got {}",
            root.z
        );

        // --- 4. ACTION: full partner weight at the very end of the clip ---
        entity.animation.as_mut().unwrap().events[0].current_time = 1.0;
        lane.tick(&mut entity, &library, 0.0);

        let state = entity.animation.as_ref().unwrap();
        let root = state.bone_matrices[0].transform_point3(Vec3::ZERO);
        let spine = state.bone_matrices[1].transform_point3(Vec3::ZERO);
        assert!(approx_eq(root.z, -1.0), "Full weight shows the full displacement");
        assert!(approx_eq(spine.z, -1.0), "Child bones inherit the displaced root");
        assert!(approx_eq(spine.y, 1.0));
    }

    #[test]
    fn test_transform_delta_is_buffered_one_tick() {
        // --- 1. SETUP ---
        let library = test_library();
        let lane = AnimationLane::new();
        let mut entity = animated_entity();
        let state = entity.animation.as_mut().unwrap();
        let event =
            AnimationLane::play(state, &library, PlayRequest::queued("step_forward")).unwrap();
        event.transform_entity = true;
        event.delta_position = Vec3::new(0.0, 0.0, -1.0);

        // --- 2. ACTION ---
        lane.tick(&mut entity, &library, 1.5); // clip is 1s long; finishes here

        // --- 3. ASSERTIONS ---
        assert!(
            approx_eq(entity.position.z, 0.0),
            "The delta must not land on the tick the event finishes"
        );
        assert!(entity.animation.as_ref().unwrap().pending_delta.is_some());

        lane.tick(&mut entity, &library, 0.1);
        assert!(approx_eq(entity.position.z, -1.0), "The delta lands next tick");
        assert!(entity.animation.as_ref().unwrap().pending_delta.is_none());
    }

    #[test]
    fn test_delta_is_applied_in_entity_local_space() {
        // --- 1. SETUP ---
        // Facing +X (a quarter turn left from -Z): a forward step must move
        // the entity along -X... facing left means -Z rotates onto -X.
        let library = test_library();
        let lane = AnimationLane::new();
        let mut entity = animated_entity();
        entity.rotation = Quaternion::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let state = entity.animation.as_mut().unwrap();
        let event =
            AnimationLane::play(state, &library, PlayRequest::queued("step_forward")).unwrap();
        event.transform_entity = true;
        event.delta_position = Vec3::new(0.0, 0.0, -1.0);

        // --- 2. ACTION ---
        lane.tick(&mut entity, &library, 1.5);
        lane.tick(&mut entity, &library, 0.1);

        // --- 3. ASSERTIONS ---
        assert!(approx_eq_eps(entity.position.x, -1.0, 1e-4));
        assert!(approx_eq_eps(entity.position.z, 0.0, 1e-4));
    }

    #[test]
    fn test_completion_promotes_and_carries_leftover_time() {
        // --- 1. SETUP ---
        let library = test_library();
        let lane = AnimationLane::new();
        let mut entity = animated_entity();
        let state = entity.animation.as_mut().unwrap();
        AnimationLane::play(state, &library, PlayRequest::queued("step_forward")).unwrap();
        AnimationLane::play(state, &library, PlayRequest::queued("step_forward")).unwrap();

        // --- 2. ACTION ---
        // First event (1s) finishes with 0.3s to spare.
        lane.tick(&mut entity, &library, 1.3);

        // --- 3. ASSERTIONS ---
        let state = entity.animation.as_ref().unwrap();
        assert!(state.started, "First-ever completion sets the started flag");
        assert_eq!(state.events.len(), 2, "The finished event stays as previous");
        assert!(!state.events[0].playing);
        assert!(
            approx_eq(state.events[1].current_time, 0.3),
            "Leftover time must carry into the follow-up event"
        );

        // --- 4. ACTION: second completion pops the old previous ---
        lane.tick(&mut entity, &library, 1.0);
        let state = entity.animation.as_ref().unwrap();
        assert_eq!(state.events.len(), 1);
        assert!(!state.events[0].playing, "The new previous is the spent second event");
    }

    #[test]
    fn test_idle_runs_when_the_queue_is_drained() {
        // --- 1. SETUP ---
        let library = test_library();
        let lane = AnimationLane::new();
        let mut entity = animated_entity();
        let state = entity.animation.as_mut().unwrap();
        let request = PlayRequest {
            fallback: true,
            ..PlayRequest::queued("idle")
        };
        AnimationLane::play(state, &library, request).unwrap();

        // --- 2. ACTION ---
        lane.tick(&mut entity, &library, 0.25);
        lane.tick(&mut entity, &library, 0.25);

        // --- 3. ASSERTIONS ---
        let state = entity.animation.as_ref().unwrap();
        let idle = state.default_event.as_ref().unwrap();
        assert!(approx_eq(idle.current_time, 0.5), "The idle clock keeps running");
        assert_eq!(state.bone_matrices.len(), 2);
    }

    #[test]
    fn test_immediate_play_drops_pending_events_only() {
        // --- 1. SETUP ---
        let library = test_library();
        let mut state = AnimationState::new(SkeletonHandle(1));
        AnimationLane::play(&mut state, &library, PlayRequest::queued("step_forward")).unwrap();
        AnimationLane::play(&mut state, &library, PlayRequest::queued("step_forward")).unwrap();
        state.events[0].current_time = 0.5;

        // --- 2. ACTION ---
        let request = PlayRequest {
            immediate: true,
            ..PlayRequest::queued("idle")
        };
        AnimationLane::play(&mut state, &library, request).unwrap();

        // --- 3. ASSERTIONS ---
        assert_eq!(state.events.len(), 2, "Current stays, pending replaced");
        assert!(approx_eq(state.events[0].current_time, 0.5));
        assert_eq!(state.events[1].clip.name, "idle");
    }
}
