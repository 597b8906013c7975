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

//! Camera transition state for editor/play mode switches.

use varen_core::math::Vec3;

/// Duration of a camera transition, in seconds.
pub const TRANSITION_DURATION: f32 = 1.5;

/// A smoothed camera move with an associated fog-density ease.
///
/// Runs independently of entity ticking; used for cinematic transitions when
/// switching between editor and play mode. While the transition runs, the
/// fog density eases back to its baseline so the scene "clears" as the
/// camera arrives.
#[derive(Debug, Clone)]
pub struct CameraTransition {
    /// Whether a transition is in progress.
    pub active: bool,
    /// Seconds elapsed since the transition started.
    pub elapsed: f32,
    /// Total transition length in seconds.
    pub duration: f32,
    /// Where the camera started.
    pub start_position: Vec3,
    /// Where the camera is headed.
    pub target_position: Vec3,
    /// The camera's current interpolated position.
    pub position: Vec3,
    /// Fog density at the start of the transition.
    pub start_fog_density: f32,
    /// The resting fog density the transition eases back to.
    pub baseline_fog_density: f32,
    /// The current interpolated fog density.
    pub fog_density: f32,
}

impl Default for CameraTransition {
    fn default() -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            duration: TRANSITION_DURATION,
            start_position: Vec3::ZERO,
            target_position: Vec3::ZERO,
            position: Vec3::ZERO,
            start_fog_density: 0.0,
            baseline_fog_density: 0.0,
            fog_density: 0.0,
        }
    }
}

impl CameraTransition {
    /// Starts a transition from the camera's current position.
    pub fn begin(&mut self, from: Vec3, to: Vec3, fog_density: f32) {
        self.active = true;
        self.elapsed = 0.0;
        self.start_position = from;
        self.target_position = to;
        self.position = from;
        self.start_fog_density = fog_density;
        self.fog_density = fog_density;
    }
}
