//! Static scene snapshot consumed by the pose evaluator.
//!
//! Produced once by an importer and treated as read-only afterwards:
//! - [`Node`]: forest of transform nodes with bind-pose locals
//! - [`Skeleton`] / [`Bone`]: ordered bone lists, the palette layout contract
//! - [`Skin`] / [`SkinnedMesh`]: per-vertex packed influences bound to a skeleton
//! - [`AnimationClip`](skinrig_animation::AnimationClip)s keyed by node
//!
//! All cross references are typed indices ([`NodeId`](skinrig_core::NodeId) etc.).

pub mod hierarchy;
pub mod light;
pub mod node;
pub mod scene;
pub mod skeleton;
pub mod skin;

pub use light::{Light, LightKind};
pub use node::Node;
pub use scene::{Scene, SceneStats};
pub use skeleton::{Bone, Skeleton};
pub use skin::{PackedInfluence4, Skin, SkinnedMesh};
