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

//! The camera lane: the smoothed editor/play transition.

use varen_core::math::{lerp, saturate, smooth_step, Vec3};
use varen_data::camera::CameraTransition;

/// Drives in-flight [`CameraTransition`]s.
///
/// The position eases along `sqrt(smooth_step(s))`, which starts fast and
/// settles softly into the target. Fog density eases linearly back to its
/// baseline over the same span. The transition runs on raw wall time, not
/// simulation time, so pausing the world does not freeze the camera.
#[derive(Debug, Default)]
pub struct CameraLane;

impl CameraLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Advances an in-flight transition by `dt` seconds. Inactive
    /// transitions are untouched.
    pub fn tick(&self, transition: &mut CameraTransition, dt: f32) {
        if !transition.active {
            return;
        }
        transition.elapsed += dt;
        let span = if transition.duration > f32::EPSILON {
            transition.elapsed / transition.duration
        } else {
            1.0
        };
        let s = saturate(span);
        let ease = smooth_step(0.0, 1.0, s).sqrt();
        transition.position = Vec3::lerp(transition.start_position, transition.target_position, ease);
        transition.fog_density = lerp(transition.start_fog_density, transition.baseline_fog_density, s);

        if s >= 1.0 {
            // Land exactly, never approximately.
            transition.position = transition.target_position;
            transition.fog_density = transition.baseline_fog_density;
            transition.active = false;
        }
    }
}
