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

//! Integration tests for the full simulation tick: physics pull, animation,
//! grid movement, camera transition, and deferred deletion, end to end.

use std::collections::HashMap;
use std::sync::Arc;

use varen_agents::{SimulationAgent, SimulationContext};
use varen_core::asset::{
    AnimationClip, BoneTrack, ClipLibrary, Keyframe, SkeletalBone, Skeleton, SkeletonHandle,
};
use varen_core::math::{approx_eq, approx_eq_eps, Mat4, Quaternion, Vec3, FRAC_PI_2};
use varen_core::physics::{BodyInterface, RigidBodyHandle};
use varen_data::player::{ActionKind, PlayerState};
use varen_data::{AnimationState, EntityId, EntityKindFlags};

// --- Test setup: physics and asset stubs ---

#[derive(Default)]
struct TestBodies {
    bodies: HashMap<RigidBodyHandle, (Vec3, Quaternion)>,
}

impl BodyInterface for TestBodies {
    fn body_exists(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn center_of_mass_position(&self, handle: RigidBodyHandle) -> Vec3 {
        self.bodies.get(&handle).map_or(Vec3::ZERO, |b| b.0)
    }

    fn rotation(&self, handle: RigidBodyHandle) -> Quaternion {
        self.bodies
            .get(&handle)
            .map_or(Quaternion::IDENTITY, |b| b.1)
    }
}

struct TestLibrary {
    skeleton: Arc<Skeleton>,
    clips: HashMap<String, Arc<AnimationClip>>,
}

impl TestLibrary {
    fn new() -> Self {
        let mut clips = HashMap::new();
        for name in ["idle", "step_forward", "turn_left", "turn_right"] {
            // One-second clips; movement retimes them to action pacing.
            clips.insert(
                name.to_string(),
                Arc::new(AnimationClip {
                    name: name.to_string(),
                    duration_ticks: 10.0,
                    ticks_per_second: 10.0,
                    tracks: vec![Some(BoneTrack {
                        position_keys: vec![Keyframe::new(0.0, Vec3::ZERO)],
                        rotation_keys: vec![],
                        scale_keys: vec![],
                    })],
                }),
            );
        }
        Self {
            skeleton: Arc::new(Skeleton::new(vec![SkeletalBone {
                name: "root".to_string(),
                parent: None,
                skin_slot: Some(0),
                offset: Mat4::IDENTITY,
                local_bind: Mat4::IDENTITY,
            }])),
            clips,
        }
    }
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

/// Spawns floor colliders at the given grid coordinates (y = -1) and a
/// player standing at the origin, then enters play mode.
fn walking_scene(floor: &[(i32, i32)]) -> SimulationContext {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = SimulationContext::new();
    for &(x, z) in floor {
        let id = ctx.store.allocate().unwrap();
        let entity = ctx.store.get_mut(id).unwrap();
        entity.kind = EntityKindFlags::MESH | EntityKindFlags::COLLIDER;
        entity.position = Vec3::new(x as f32, -1.0, z as f32);
    }
    let player = ctx.store.allocate().unwrap();
    {
        let entity = ctx.store.get_mut(player).unwrap();
        entity.kind = EntityKindFlags::PLAYER | EntityKindFlags::ANIMATED_MESH;
        entity.animation = Some(AnimationState::new(SkeletonHandle(1)));
        entity.player = Some(PlayerState::default());
    }
    ctx.player = player;
    ctx.playing = true;
    ctx
}

fn run(agent: &SimulationAgent, ctx: &mut SimulationContext, ticks: usize, dt: f32) {
    let bodies = TestBodies::default();
    let assets = TestLibrary::new();
    for _ in 0..ticks {
        agent.tick(ctx, &bodies, &assets, dt);
    }
}

#[test]
fn test_physics_transform_pull_only_while_running() {
    // --- 1. SETUP ---
    let agent = SimulationAgent::new();
    let assets = TestLibrary::new();
    let mut bodies = TestBodies::default();
    let handle = RigidBodyHandle(7);
    bodies
        .bodies
        .insert(handle, (Vec3::new(1.0, 2.0, 3.0), Quaternion::IDENTITY));

    let mut ctx = SimulationContext::new();
    let id = ctx.store.allocate().unwrap();
    ctx.store.get_mut(id).unwrap().body = Some(handle);

    // --- 2. ACTION / ASSERTIONS ---
    // Stopped: the entity keeps its authored transform.
    agent.tick(&mut ctx, &bodies, &assets, 0.016);
    assert_eq!(ctx.store.get(id).unwrap().position, Vec3::ZERO);

    // Running: the body drives the transform.
    ctx.playing = true;
    agent.tick(&mut ctx, &bodies, &assets, 0.016);
    assert_eq!(ctx.store.get(id).unwrap().position, Vec3::new(1.0, 2.0, 3.0));

    // A vanished body leaves the last pulled transform in place.
    bodies.bodies.clear();
    ctx.store.get_mut(id).unwrap().position = Vec3::new(9.0, 9.0, 9.0);
    agent.tick(&mut ctx, &bodies, &assets, 0.016);
    assert_eq!(ctx.store.get(id).unwrap().position, Vec3::new(9.0, 9.0, 9.0));
}

#[test]
fn test_deletions_propagate_at_end_of_tick() {
    // --- 1. SETUP ---
    let agent = SimulationAgent::new();
    let mut ctx = SimulationContext::new();
    let doomed = ctx.store.allocate().unwrap();

    // --- 2. ACTION ---
    ctx.store.mark_deleted(doomed);
    assert!(ctx.store.get(doomed).is_some(), "Alive until the tick ends");
    run(&agent, &mut ctx, 1, 0.016);

    // --- 3. ASSERTIONS ---
    assert!(ctx.store.get(doomed).is_none());
    let recycled = ctx.store.allocate().unwrap();
    assert_eq!(recycled.index, doomed.index);
    assert_eq!(recycled.generation, doomed.generation + 1);
}

#[test]
fn test_player_walks_one_grid_step() {
    // --- 1. SETUP ---
    let agent = SimulationAgent::new();
    let mut ctx = walking_scene(&[(0, 0), (0, -1)]);

    // --- 2. ACTION ---
    assert!(agent.queue_action(&mut ctx, ActionKind::StepForward));
    run(&agent, &mut ctx, 20, 0.05);

    // --- 3. ASSERTIONS ---
    let player = ctx.store.get(ctx.player).unwrap();
    assert!(
        approx_eq_eps(player.position.z, -1.0, 1e-4),
        "The step lands exactly one grid unit forward, got {}",
        player.position.z
    );
    assert!(approx_eq_eps(player.position.x, 0.0, 1e-4));
    assert!(player.player.as_ref().unwrap().actions.is_empty());
}

#[test]
fn test_step_without_ground_is_refused() {
    // --- 1. SETUP ---
    // Floor only under the player; ahead is a pit.
    let agent = SimulationAgent::new();
    let mut ctx = walking_scene(&[(0, 0)]);

    // --- 2. ACTION ---
    assert!(agent.queue_action(&mut ctx, ActionKind::StepForward));
    run(&agent, &mut ctx, 20, 0.05);

    // --- 3. ASSERTIONS ---
    let player = ctx.store.get(ctx.player).unwrap();
    assert!(approx_eq(player.position.z, 0.0), "The pit stays unvisited");
    assert!(player.player.as_ref().unwrap().actions.is_empty());
}

#[test]
fn test_turn_then_step_moves_along_the_new_facing() {
    // --- 1. SETUP ---
    // Ground under the player and one cell to its left (-X).
    let agent = SimulationAgent::new();
    let mut ctx = walking_scene(&[(0, 0), (-1, 0)]);

    // --- 2. ACTION ---
    assert!(agent.queue_action(&mut ctx, ActionKind::TurnLeft));
    assert!(agent.queue_action(&mut ctx, ActionKind::StepForward));
    run(&agent, &mut ctx, 40, 0.05);

    // --- 3. ASSERTIONS ---
    let player = ctx.store.get(ctx.player).unwrap();
    assert!(
        approx_eq_eps(player.position.x, -1.0, 1e-3),
        "A left turn then a step lands one unit along -X, got {:?}",
        player.position
    );
    let forward = player.rotation.rotate_vec3(Vec3::new(0.0, 0.0, -1.0));
    assert!(approx_eq_eps(forward.x, -1.0, 1e-3), "Facing turned 90 degrees");

    let rotated = Quaternion::from_rotation_y(FRAC_PI_2);
    assert!(rotated.dot(player.rotation).abs() > 0.999);
}

#[test]
fn test_simulation_is_deterministic() {
    // --- 1. SETUP / ACTION ---
    let run_once = || {
        let agent = SimulationAgent::new();
        let mut ctx = walking_scene(&[(0, 0), (0, -1), (0, -2), (-1, -2)]);
        agent.queue_action(&mut ctx, ActionKind::StepForward);
        agent.queue_action(&mut ctx, ActionKind::StepForward);
        agent.queue_action(&mut ctx, ActionKind::TurnLeft);
        run(&agent, &mut ctx, 120, 0.016);
        let player = ctx.store.get(ctx.player).unwrap();
        (player.position, player.rotation)
    };
    let first = run_once();
    let second = run_once();

    // --- 2. ASSERTIONS ---
    // Identical inputs over a fixed store layout must replay bit for bit.
    assert_eq!(first.0, second.0);
    assert_eq!(first.1.x.to_bits(), second.1.x.to_bits());
    assert_eq!(first.1.w.to_bits(), second.1.w.to_bits());
}

#[test]
fn test_pause_freezes_animation_unless_forced() {
    // --- 1. SETUP ---
    let agent = SimulationAgent::new();
    let assets = TestLibrary::new();
    let bodies = TestBodies::default();
    let mut ctx = SimulationContext::new();
    let mut spawn_idler = |force: bool| {
        let id = ctx.store.allocate().unwrap();
        let entity = ctx.store.get_mut(id).unwrap();
        entity.kind = EntityKindFlags::ANIMATED_MESH;
        entity.force_animate = force;
        let mut state = AnimationState::new(SkeletonHandle(1));
        let mut idle =
            varen_data::AnimationEvent::new(assets.clips.get("idle").unwrap().clone());
        idle.looped = true;
        state.default_event = Some(idle);
        entity.animation = Some(state);
        id
    };
    let frozen = spawn_idler(false);
    let forced = spawn_idler(true);
    ctx.playing = true;
    ctx.paused = true;

    // --- 2. ACTION ---
    agent.tick(&mut ctx, &bodies, &assets, 0.25);

    // --- 3. ASSERTIONS ---
    let clock = |id: EntityId, ctx: &SimulationContext| {
        ctx.store
            .get(id)
            .unwrap()
            .animation
            .as_ref()
            .unwrap()
            .default_event
            .as_ref()
            .unwrap()
            .current_time
    };
    assert!(approx_eq(clock(frozen, &ctx), 0.0));
    assert!(approx_eq(clock(forced, &ctx), 0.25), "force_animate ticks while paused");
}

#[test]
fn test_camera_transition_runs_on_wall_time() {
    // --- 1. SETUP ---
    let agent = SimulationAgent::new();
    let mut ctx = SimulationContext::new();
    ctx.time_scale = 0.0; // simulation time frozen entirely
    ctx.camera.begin(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 1.0);
    ctx.camera.baseline_fog_density = 0.25;

    // --- 2. ACTION ---
    run(&agent, &mut ctx, 1, 2.0);

    // --- 3. ASSERTIONS ---
    assert!(!ctx.camera.active);
    assert_eq!(ctx.camera.position, Vec3::new(6.0, 0.0, 0.0));
    assert!(approx_eq(ctx.camera.fog_density, 0.25));
}
