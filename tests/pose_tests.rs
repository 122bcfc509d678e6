//! Pose evaluation tests
//!
//! Tests for:
//! - Palette contents for identity, chained and inverse-bound bones
//! - Playhead wrapping through Animator::update
//! - Animated non-bone ancestors
//! - Malformed hierarchies (cycles) evaluating without hanging
//! - AnimationSystem driving several skeletons

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use skinrig::{
    AnimationClip, AnimationSystem, Animator, Bone, ClipId, KeyframeTrack, LoopMode, Node, NodeId, NodeTrack,
    Scene, Skeleton, SkeletonId, SkinrigError, Transform,
};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn translation(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

fn move_track(node: NodeId, to: Vec3) -> NodeTrack {
    NodeTrack::new(node).with_translation(KeyframeTrack::from_keys([(0.0, Vec3::ZERO), (1.0, to)]))
}

/// One bone on one node, clip "MoveX" from x=0 to x=1 over one second.
fn move_x_scene() -> Arc<Scene> {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("RootBone"));
    scene.add_skeleton(Skeleton::from_bones(
        "TestSkeleton",
        vec![Bone::new("RootBone", Some(root), Mat4::IDENTITY)],
    ));
    scene.add_clip(AnimationClip::new(
        "MoveX",
        1.0,
        30.0,
        vec![
            move_track(root, Vec3::X)
                .with_rotation(KeyframeTrack::from_keys([(0.0, Quat::IDENTITY)]))
                .with_scale(KeyframeTrack::from_keys([(0.0, Vec3::ONE)])),
        ],
    ));
    Arc::new(scene)
}

fn bound(scene: &Arc<Scene>, loop_mode: LoopMode) -> Animator {
    let mut animator = Animator::new();
    animator.bind(scene.clone(), SkeletonId(0));
    animator.set_clip(ClipId(0), loop_mode);
    animator
}

// ============================================================================
// Playback
// ============================================================================

#[test]
fn move_x_half_second() {
    let scene = move_x_scene();
    let mut animator = Animator::new();
    animator.bind(scene, SkeletonId(0));
    animator.set_clip(ClipId(0), true);
    animator.update(0.5);

    let palette = animator.palette();
    assert_eq!(palette.len(), 1);
    assert!((palette[0].w_axis.x - 0.5).abs() < 1e-3);
}

#[test]
fn palette_bytes_are_column_major_floats() {
    let scene = move_x_scene();
    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.5);

    let floats: &[f32] = bytemuck::cast_slice(animator.palette_bytes());
    assert_eq!(floats.len(), 16);
    assert!(approx(floats[12], 0.5));
    assert!(approx(floats[15], 1.0));
}

#[test]
fn looping_wraps_past_the_end() {
    let scene = move_x_scene();
    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(1.5);

    assert!(approx(animator.state().time, 1.5));
    assert!(approx(animator.last_update_stats().sample_time, 0.5));
    assert!(approx(animator.palette()[0].w_axis.x, 0.5));
}

#[test]
fn once_holds_last_pose() {
    let scene = move_x_scene();
    let mut animator = bound(&scene, LoopMode::Once);
    animator.update(1.5);

    assert!(approx(animator.last_update_stats().sample_time, 1.0));
    assert!(approx(animator.palette()[0].w_axis.x, 1.0));
}

#[test]
fn reverse_once_holds_first_pose() {
    let scene = move_x_scene();
    let mut animator = bound(&scene, LoopMode::Once);
    animator.set_speed(-1.0);
    animator.update(0.75);

    assert!(approx(animator.state().time, -0.75));
    assert!(approx(animator.palette()[0].w_axis.x, 0.0));
}

#[test]
fn reverse_loop_wraps_to_tail() {
    let scene = move_x_scene();
    let mut animator = bound(&scene, LoopMode::Loop);
    animator.set_speed(-1.0);
    animator.update(0.25);

    assert!(approx(animator.palette()[0].w_axis.x, 0.75));
}

#[test]
fn speed_scales_advance() {
    let scene = move_x_scene();
    let mut animator = bound(&scene, LoopMode::Once);
    animator.set_speed(0.5);
    animator.update(0.5);
    assert!(approx(animator.palette()[0].w_axis.x, 0.25));
}

#[test]
fn set_clip_rewinds_playhead() {
    let scene = move_x_scene();
    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.6);
    animator.set_clip(ClipId(0), LoopMode::PingPong);
    assert_eq!(animator.state().time, 0.0);
    assert_eq!(animator.state().loop_mode, LoopMode::PingPong);
}

// ============================================================================
// Palette contents
// ============================================================================

#[test]
fn identity_root_gives_identity_matrix() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    scene.add_skeleton(Skeleton::from_bones("S", vec![Bone::new("Root", Some(root), Mat4::IDENTITY)]));
    scene.add_clip(AnimationClip::new("Still", 1.0, 30.0, Vec::new()));
    let scene = Arc::new(scene);

    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.3);
    assert!(animator.palette()[0].abs_diff_eq(Mat4::IDENTITY, 1e-6));
}

#[test]
fn palette_is_identity_before_first_update() {
    let scene = move_x_scene();
    let animator = bound(&scene, LoopMode::Loop);
    assert_eq!(animator.palette(), &[Mat4::IDENTITY]);
    assert_eq!(animator.palette_bytes().len(), std::mem::size_of::<Mat4>());
}

#[test]
fn child_bone_inherits_parent_translation() {
    let dx = 2.5;
    let mut scene = Scene::new();
    let upper = scene.add_node(Node::new("Upper"));
    let lower = scene.add_child(upper, Node::new("Lower"));
    scene.add_skeleton(Skeleton::from_bones(
        "Arm",
        vec![
            Bone::new("Upper", Some(upper), Mat4::IDENTITY),
            Bone::new("Lower", Some(lower), Mat4::IDENTITY).with_parent(Some(0)),
        ],
    ));
    scene.add_clip(AnimationClip::new(
        "Shift",
        1.0,
        30.0,
        vec![NodeTrack::new(upper).with_translation(KeyframeTrack::from_keys([(0.0, Vec3::new(dx, 0.0, 0.0))]))],
    ));
    let scene = Arc::new(scene);

    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.1);
    assert!(vec3_approx(translation(&animator.palette()[1]), Vec3::new(dx, 0.0, 0.0)));
}

#[test]
fn unanimated_nodes_use_bind_pose() {
    let mut scene = Scene::new();
    let upper = scene.add_node(Node::new("Upper").with_bind(Transform::from_translation(Vec3::Y)));
    let lower = scene.add_child(upper, Node::new("Lower").with_bind(Transform::from_translation(Vec3::Y)));
    scene.add_skeleton(Skeleton::from_bones(
        "Arm",
        vec![
            Bone::new("Upper", Some(upper), Mat4::IDENTITY),
            Bone::new("Lower", Some(lower), Mat4::IDENTITY).with_parent(Some(0)),
        ],
    ));
    scene.add_clip(AnimationClip::new("Empty", 1.0, 30.0, Vec::new()));
    let scene = Arc::new(scene);

    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.0);
    assert!(vec3_approx(translation(&animator.palette()[1]), Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn bind_pose_with_matching_inverse_bind_is_identity() {
    let mut scene = Scene::new();
    let hips = scene.add_node(Node::new("Hips").with_bind(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))));
    let spine = scene.add_child(
        hips,
        Node::new("Spine").with_bind(Transform::new(
            Vec3::new(0.0, 0.5, 0.0),
            Quat::from_rotation_x(0.4),
            Vec3::ONE,
        )),
    );

    let hips_world = scene.nodes[hips.index()].bind.to_mat4();
    let spine_world = hips_world * scene.nodes[spine.index()].bind.to_mat4();
    scene.add_skeleton(Skeleton::from_bones(
        "Rig",
        vec![
            Bone::new("Hips", Some(hips), hips_world.inverse()),
            Bone::new("Spine", Some(spine), spine_world.inverse()).with_parent(Some(0)),
        ],
    ));
    scene.add_clip(AnimationClip::new("Rest", 1.0, 30.0, Vec::new()));
    let scene = Arc::new(scene);

    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.2);
    for matrix in animator.palette() {
        assert!(matrix.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }
}

#[test]
fn animated_non_bone_ancestor_moves_skeleton() {
    let mut scene = Scene::new();
    let armature = scene.add_node(Node::new("Armature"));
    let hips = scene.add_child(armature, Node::new("Hips"));
    scene.add_skeleton(Skeleton::from_bones("Rig", vec![Bone::new("Hips", Some(hips), Mat4::IDENTITY)]));
    scene.add_clip(AnimationClip::new("Slide", 1.0, 30.0, vec![move_track(armature, Vec3::Z * 4.0)]));
    let scene = Arc::new(scene);

    let mut animator = bound(&scene, LoopMode::Once);
    animator.update(0.5);
    assert!(vec3_approx(translation(&animator.palette()[0]), Vec3::new(0.0, 0.0, 2.0)));
}

#[test]
fn bone_without_node_is_identity_local() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    scene.add_skeleton(Skeleton::from_bones(
        "Rig",
        vec![
            Bone::new("Root", Some(root), Mat4::IDENTITY),
            Bone::new("Ghost", None, Mat4::IDENTITY).with_parent(Some(0)),
        ],
    ));
    scene.add_clip(AnimationClip::new("Move", 1.0, 30.0, vec![move_track(root, Vec3::X)]));
    let scene = Arc::new(scene);

    let mut animator = bound(&scene, LoopMode::Once);
    animator.update(1.0);
    assert!(vec3_approx(translation(&animator.palette()[1]), Vec3::X));
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn nan_duration_samples_first_pose() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    scene.add_skeleton(Skeleton::from_bones("S", vec![Bone::new("Root", Some(root), Mat4::IDENTITY)]));
    scene.add_clip(AnimationClip::new("Bad", f32::NAN, 30.0, vec![move_track(root, Vec3::X)]));

    assert!(matches!(scene.validate(), Err(SkinrigError::InvalidDuration { .. })));

    let scene = Arc::new(scene);
    for mode in [LoopMode::Once, LoopMode::Loop, LoopMode::PingPong] {
        let mut animator = bound(&scene, mode);
        animator.update(0.5);
        assert!(animator.last_update_stats().evaluated);
        assert_eq!(animator.last_update_stats().sample_time, 0.0);
        assert!(approx(animator.palette()[0].w_axis.x, 0.0));
    }
}

#[test]
fn node_cycle_is_reported_and_evaluation_finishes() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A").with_bind(Transform::from_translation(Vec3::X)));
    let b = scene.add_node(Node::new("B").with_bind(Transform::from_translation(Vec3::Y)));
    scene.nodes[a.index()].set_parent(Some(b));
    scene.nodes[b.index()].set_parent(Some(a));
    scene.add_skeleton(Skeleton::from_bones("Loop", vec![Bone::new("A", Some(a), Mat4::IDENTITY)]));
    scene.add_clip(AnimationClip::new("Still", 1.0, 30.0, Vec::new()));

    assert!(matches!(scene.validate(), Err(SkinrigError::CycleDetected { .. })));

    let scene = Arc::new(scene);
    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.1);

    assert!(animator.last_update_stats().cycles_broken > 0);
    assert!(animator.palette()[0].is_finite());
}

#[test]
fn bone_cycle_is_reported_and_evaluation_finishes() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_node(Node::new("B"));
    scene.add_skeleton(Skeleton::from_bones(
        "Loop",
        vec![
            Bone::new("A", Some(a), Mat4::IDENTITY).with_parent(Some(1)),
            Bone::new("B", Some(b), Mat4::IDENTITY).with_parent(Some(0)),
        ],
    ));
    scene.add_clip(AnimationClip::new("Still", 1.0, 30.0, Vec::new()));

    assert!(matches!(scene.validate(), Err(SkinrigError::BoneCycleDetected { .. })));

    let scene = Arc::new(scene);
    let mut animator = bound(&scene, LoopMode::Loop);
    animator.update(0.1);
    assert!(animator.last_update_stats().cycles_broken > 0);
    assert!(animator.palette().iter().all(Mat4::is_finite));
}

// ============================================================================
// AnimationSystem
// ============================================================================

#[test]
fn system_drives_every_skeleton() {
    let mut scene = Scene::new();
    let left = scene.add_node(Node::new("Left"));
    let right = scene.add_node(Node::new("Right"));
    scene.add_skeleton(Skeleton::from_bones("L", vec![Bone::new("Left", Some(left), Mat4::IDENTITY)]));
    scene.add_skeleton(Skeleton::from_bones("R", vec![Bone::new("Right", Some(right), Mat4::IDENTITY)]));
    scene.add_clip(AnimationClip::new(
        "Both",
        1.0,
        30.0,
        vec![move_track(left, Vec3::X), move_track(right, Vec3::NEG_X)],
    ));

    let mut system = AnimationSystem::new(Arc::new(scene));
    system.update(0.5);

    let l = system.animator(SkeletonId(0)).expect("left");
    let r = system.animator(SkeletonId(1)).expect("right");
    assert!(approx(l.palette()[0].w_axis.x, 0.5));
    assert!(approx(r.palette()[0].w_axis.x, -0.5));
}
