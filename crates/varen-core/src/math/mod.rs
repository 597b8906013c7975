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

//! Provides the mathematics primitives used by the simulation core.
//!
//! This module contains the vector, matrix, and quaternion types that back
//! entity transforms and skeletal pose evaluation, plus the scalar helpers
//! the animation blender builds its bias curves from.
//!
//! All angular functions in this module operate in **radians**.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

// Re-export standard mathematical constants for convenience.
pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

// --- Declare Sub-Modules ---

pub mod matrix;
pub mod quaternion;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::matrix::Mat4;
pub use self::quaternion::Quaternion;
pub use self::vector::{Vec3, Vec4};

// --- Utility Functions ---

/// Clamps a value to a specified minimum and maximum range.
///
/// # Examples
///
/// ```
/// use varen_core::math::clamp;
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
/// assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
/// ```
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min_val: T, max_val: T) -> T {
    if value < min_val {
        min_val
    } else if value > max_val {
        max_val
    } else {
        value
    }
}

/// Clamps a floating-point value to the `[0.0, 1.0]` range.
///
/// # Examples
///
/// ```
/// use varen_core::math::saturate;
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(saturate(-0.5), 0.0);
/// ```
#[inline]
pub fn saturate(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Linearly ramps from `0.0` to `1.0` as `x` moves from `edge0` to `edge1`,
/// clamping outside that window.
///
/// This is the `linearstep` function used for blend-bias computation: unlike
/// `smooth_step` the slope is constant, which keeps chained blend weights
/// composable.
///
/// # Examples
///
/// ```
/// use varen_core::math::linear_step;
/// assert_eq!(linear_step(0.0, 2.0, 1.0), 0.5);
/// assert_eq!(linear_step(0.0, 2.0, -1.0), 0.0);
/// assert_eq!(linear_step(0.0, 2.0, 3.0), 1.0);
/// ```
#[inline]
pub fn linear_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    saturate((x - edge0) / (edge1 - edge0))
}

/// Hermite interpolation between `0.0` and `1.0` as `x` moves from `edge0`
/// to `edge1`.
///
/// # Examples
///
/// ```
/// use varen_core::math::smooth_step;
/// assert_eq!(smooth_step(0.0, 1.0, 0.5), 0.5);
/// assert_eq!(smooth_step(0.0, 1.0, 2.0), 1.0);
/// ```
#[inline]
pub fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = linear_step(edge0, edge1, x);
    t * t * (3.0 - 2.0 * t)
}

/// Performs a linear interpolation between two floats.
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use varen_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_step_is_clamped_and_linear() {
        assert_eq!(linear_step(0.2, 0.8, 0.0), 0.0);
        assert_eq!(linear_step(0.2, 0.8, 1.0), 1.0);
        assert!(approx_eq(linear_step(0.2, 0.8, 0.5), 0.5));
        // Degenerate window behaves like a step function.
        assert_eq!(linear_step(0.5, 0.5, 0.4), 0.0);
        assert_eq!(linear_step(0.5, 0.5, 0.6), 1.0);
    }

    #[test]
    fn smooth_step_matches_hermite_endpoints() {
        assert_eq!(smooth_step(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smooth_step(0.0, 1.0, 1.0), 1.0);
        assert!(smooth_step(0.0, 1.0, 0.25) < 0.25);
        assert!(smooth_step(0.0, 1.0, 0.75) > 0.75);
    }
}
