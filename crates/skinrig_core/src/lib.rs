//! Foundational types shared by every skinrig crate.
//!
//! - [`ids`]: typed indices into the scene snapshot arrays
//! - [`transform`]: translation / rotation / scale triples and their matrices
//! - [`errors`]: the workspace error type used by validation and import code

pub mod errors;
pub mod ids;
pub mod transform;

pub use errors::{Result, SkinrigError};
pub use ids::{ClipId, LightId, MeshId, NodeId, SkeletonId, SkinId};
pub use transform::Transform;

/// Number of (joint, weight) slots packed per skinned vertex.
pub const MAX_BONE_INFLUENCES: usize = 4;
