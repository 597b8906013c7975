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

//! # Varen Lanes
//!
//! The per-frame simulation systems. Each lane is a stateless strategy that
//! operates on entity data by direct reference during the single-threaded
//! tick; lanes must not be reentered concurrently. The one exception is the
//! asset lane's decode pool, which fans embarrassingly-parallel image decode
//! out to worker threads behind a join barrier.

pub mod anim_lane;
pub mod asset_lane;
pub mod camera_lane;
pub mod move_lane;

pub use anim_lane::{AnimationLane, PlayRequest};
pub use asset_lane::{DecodePool, DecodedImage};
pub use camera_lane::CameraLane;
pub use move_lane::MovementLane;
