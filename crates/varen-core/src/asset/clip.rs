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

//! Animation clip data and keyframe-track sampling.

use crate::math::{Mat4, Quaternion, Vec3};

/// A single keyframe: a timestamp in clip ticks and a value.
#[derive(Debug, Clone, Copy)]
pub struct Keyframe<T> {
    /// The key's timestamp, in clip ticks.
    pub time: f32,
    /// The keyed value.
    pub value: T,
}

impl<T> Keyframe<T> {
    /// Creates a new keyframe.
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// The keyframe tracks a clip carries for one bone.
///
/// A missing channel (empty key list) leaves that component at its neutral
/// value; a bone with no track at all falls back to its rest-pose transform
/// instead.
#[derive(Debug, Clone, Default)]
pub struct BoneTrack {
    /// Translation keys, in ticks.
    pub position_keys: Vec<Keyframe<Vec3>>,
    /// Rotation keys, in ticks.
    pub rotation_keys: Vec<Keyframe<Quaternion>>,
    /// Scale keys, in ticks.
    pub scale_keys: Vec<Keyframe<Vec3>>,
}

impl BoneTrack {
    /// Samples the track at the given tick and composes the result into a
    /// local bone transform (`Translate * Rotate * Scale`).
    ///
    /// Sampling clamps outside the keyed range: before the first key the
    /// first value is returned, after the last key the last value.
    pub fn sample(&self, tick: f32) -> Mat4 {
        let translation = sample_keys(&self.position_keys, tick, Vec3::ZERO, Vec3::lerp);
        let rotation = sample_keys(
            &self.rotation_keys,
            tick,
            Quaternion::IDENTITY,
            Quaternion::slerp,
        );
        let scale = sample_keys(&self.scale_keys, tick, Vec3::ONE, Vec3::lerp);
        Mat4::from_trs(translation, rotation, scale)
    }
}

/// Finds the key pair surrounding `tick` and interpolates between them.
fn sample_keys<T: Copy>(keys: &[Keyframe<T>], tick: f32, neutral: T, mix: fn(T, T, f32) -> T) -> T {
    let (first, last) = match (keys.first(), keys.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return neutral,
    };
    if tick <= first.time {
        return first.value;
    }
    if tick >= last.time {
        return last.value;
    }
    // Keys are few (grid-step clips) and sorted; a linear scan is fine.
    for pair in keys.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if tick < b.time {
            let span = b.time - a.time;
            let t = if span > f32::EPSILON {
                (tick - a.time) / span
            } else {
                0.0
            };
            return mix(a.value, b.value, t);
        }
    }
    last.value
}

/// A named, shared, read-only animation clip.
///
/// Tracks are indexed by bone index in the owning skeleton; `None` entries
/// mean the clip does not animate that bone.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// The clip's name, unique within its skeleton.
    pub name: String,
    /// The clip length, in ticks.
    pub duration_ticks: f32,
    /// Playback rate converting event seconds into ticks.
    pub ticks_per_second: f32,
    /// Per-bone tracks, indexed by bone index.
    pub tracks: Vec<Option<BoneTrack>>,
}

impl AnimationClip {
    /// The clip length in seconds at its native playback rate.
    pub fn duration_seconds(&self) -> f32 {
        if self.ticks_per_second > f32::EPSILON {
            self.duration_ticks / self.ticks_per_second
        } else {
            0.0
        }
    }

    /// Converts an event-local time in seconds to a tick inside the clip,
    /// wrapping via modulo when looping and clamping otherwise.
    pub fn tick_at(&self, seconds: f32, looped: bool) -> f32 {
        let tick = seconds * self.ticks_per_second;
        if self.duration_ticks <= f32::EPSILON {
            return 0.0;
        }
        if looped {
            tick.rem_euclid(self.duration_ticks)
        } else {
            tick.min(self.duration_ticks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn sampling_interpolates_between_keys() {
        let track = BoneTrack {
            position_keys: vec![
                Keyframe::new(0.0, Vec3::ZERO),
                Keyframe::new(10.0, Vec3::new(0.0, 0.0, -1.0)),
            ],
            rotation_keys: vec![],
            scale_keys: vec![],
        };
        let m = track.sample(5.0);
        let p = m.transform_point3(Vec3::ZERO);
        assert!(approx_eq(p.z, -0.5));
    }

    #[test]
    fn sampling_clamps_outside_keyed_range() {
        let track = BoneTrack {
            position_keys: vec![
                Keyframe::new(2.0, Vec3::X),
                Keyframe::new(4.0, Vec3::X * 3.0),
            ],
            rotation_keys: vec![],
            scale_keys: vec![],
        };
        assert!(approx_eq(track.sample(0.0).transform_point3(Vec3::ZERO).x, 1.0));
        assert!(approx_eq(track.sample(9.0).transform_point3(Vec3::ZERO).x, 3.0));
    }

    #[test]
    fn tick_at_wraps_when_looping_and_clamps_when_not() {
        let clip = AnimationClip {
            name: "walk".to_string(),
            duration_ticks: 20.0,
            ticks_per_second: 10.0,
            tracks: vec![],
        };
        assert!(approx_eq(clip.tick_at(2.4, true), 4.0));
        assert!(approx_eq(clip.tick_at(2.4, false), 20.0));
        assert!(approx_eq(clip.duration_seconds(), 2.0));
    }

    #[test]
    fn empty_channels_yield_neutral_components() {
        let track = BoneTrack::default();
        assert_eq!(track.sample(3.0), Mat4::IDENTITY);
    }
}
