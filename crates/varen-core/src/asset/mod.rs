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

//! Shared, read-only animation assets.
//!
//! Skeletons and animation clips are loaded by an external asset pipeline and
//! referenced (never owned) by the entities that play them. The runtime core
//! resolves clips by name through the [`ClipLibrary`] collaborator.

mod clip;
mod skeleton;

pub use clip::{AnimationClip, BoneTrack, Keyframe};
pub use skeleton::{Skeleton, SkeletalBone, SkeletonHandle};

use std::sync::Arc;

/// Animation-asset collaborator.
///
/// A lookup miss (unknown skeleton or clip name) is an expected condition:
/// callers log a diagnostic and skip the corresponding update step rather
/// than aborting the frame.
pub trait ClipLibrary {
    /// Resolves a clip by name for the given skeleton.
    fn resolve_clip_by_name(
        &self,
        skeleton: SkeletonHandle,
        name: &str,
    ) -> Option<Arc<AnimationClip>>;

    /// Returns the skeleton data behind a handle.
    fn skeleton(&self, handle: SkeletonHandle) -> Option<Arc<Skeleton>>;
}
