//! # skinrig
//!
//! Skeletal pose evaluation and skinning for rigged 3D assets.
//!
//! The pipeline has two halves:
//!
//! - **Import** ([`assets`]): raw per-mesh bone lists become one deduplicated
//!   [`Skeleton`] with resolved parents, per-vertex influences are reduced to
//!   four normalized slots, and tick-based channels become second-based
//!   [`AnimationClip`]s.
//! - **Runtime** ([`pose`]): an [`Animator`] samples the clip at its playhead,
//!   composes world transforms through the node graph and writes the skin
//!   matrix palette a vertex shader consumes.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use skinrig::prelude::*;
//!
//! let scene = Arc::new(assemble_scene(nodes, &meshes, &clips, &ImportSettings::default()));
//! let mut system = AnimationSystem::new(scene);
//! system.update(1.0 / 60.0);
//! let bytes = system.animators()[0].palette_bytes();
//! ```

pub use skinrig_animation as animation;
pub use skinrig_assets as assets;
pub use skinrig_core as core;
pub use skinrig_pose as pose;
pub use skinrig_scene as scene;

pub use skinrig_animation::{
    AnimationClip, InterpolationMode, Interpolatable, KeyframeTrack, LoopMode, NodeTrack, wrap_time,
};
pub use skinrig_assets::{
    ImportSettings, RawBone, RawChannel, RawClip, RawMesh, SceneImporter, SkeletonBuilder,
    assemble_scene, normalize_influences, normalize_influences_with_limit,
};
pub use skinrig_core::{
    ClipId, LightId, MAX_BONE_INFLUENCES, MeshId, NodeId, Result, SkeletonId, SkinId, SkinrigError,
    Transform,
};
pub use skinrig_pose::{AnimationSystem, Animator, AnimatorState, UpdateStats};
pub use skinrig_scene::{
    Bone, Light, LightKind, Node, PackedInfluence4, Scene, SceneStats, Skeleton, Skin, SkinnedMesh,
};

pub use glam;

/// Everything needed to import a rig and play it back.
pub mod prelude {
    pub use crate::{
        AnimationClip, AnimationSystem, Animator, Bone, ClipId, ImportSettings, KeyframeTrack,
        LoopMode, Node, NodeId, NodeTrack, PackedInfluence4, RawBone, RawChannel, RawClip, RawMesh,
        Scene, SceneImporter, Skeleton, SkeletonId, SkinrigError, Transform, assemble_scene,
    };
    pub use glam::{Mat4, Quat, Vec3};
}
