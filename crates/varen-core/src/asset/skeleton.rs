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

//! Skeleton hierarchy description for skinned meshes.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::math::Mat4;

/// Opaque handle to a skeleton registered with the asset collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct SkeletonHandle(pub u64);

/// A single bone in a skeleton hierarchy.
#[derive(Debug, Clone)]
pub struct SkeletalBone {
    /// The bone's name, matched against clip track names at import time.
    pub name: String,
    /// Index of the parent bone. `None` for the root. Parents always precede
    /// children in [`Skeleton::bones`].
    pub parent: Option<usize>,
    /// Slot in the skinning palette this bone writes to, or `None` for
    /// helper nodes that influence children but carry no vertices.
    pub skin_slot: Option<usize>,
    /// The inverse bind-pose matrix, applied after the animated global
    /// transform to produce the final skinning matrix.
    pub offset: Mat4,
    /// The bone's rest-pose local transform, used when a clip carries no
    /// track for this bone.
    pub local_bind: Mat4,
}

/// A skeleton: bones ordered parent-before-child, plus the size of the
/// skinning palette its clips write into.
#[derive(Debug, Clone)]
pub struct Skeleton {
    /// The bone hierarchy, ordered so that `bones[i].parent < Some(i)`.
    pub bones: Vec<SkeletalBone>,
    /// Number of skinning-palette slots referenced by the bones.
    pub skin_matrix_count: usize,
}

impl Skeleton {
    /// Builds a skeleton from a bone list, deriving the skinning palette size.
    ///
    /// Bones whose parent index does not precede them are demoted to roots
    /// with a diagnostic; a malformed asset must not be able to make pose
    /// evaluation read ahead of itself.
    pub fn new(mut bones: Vec<SkeletalBone>) -> Self {
        for index in 0..bones.len() {
            if let Some(parent) = bones[index].parent {
                if parent >= index {
                    log::warn!(
                        "skeleton bone '{}' has out-of-order parent {} >= {}; treating as root",
                        bones[index].name,
                        parent,
                        index
                    );
                    bones[index].parent = None;
                }
            }
        }
        let skin_matrix_count = bones
            .iter()
            .filter_map(|bone| bone.skin_slot)
            .map(|slot| slot + 1)
            .max()
            .unwrap_or(0);
        Self {
            bones,
            skin_matrix_count,
        }
    }
}
