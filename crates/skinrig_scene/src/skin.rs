use skinrig_core::{MAX_BONE_INFLUENCES, MeshId, SkeletonId};

/// Fixed-width per-vertex skinning influences.
///
/// Weights sum to 1. The default binds everything to joint 0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackedInfluence4 {
    pub joints: [u16; MAX_BONE_INFLUENCES],
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

impl PackedInfluence4 {
    pub const DEFAULT: Self = Self {
        joints: [0; MAX_BONE_INFLUENCES],
        weights: [1.0, 0.0, 0.0, 0.0],
    };

    #[inline]
    #[must_use]
    pub fn weight_sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

impl Default for PackedInfluence4 {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Skinning data of one imported mesh. Geometry itself lives with the
/// renderer; only the per-vertex influences matter here.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkinnedMesh {
    pub name: String,
    /// One entry per vertex, joint indices in skeleton bone order.
    pub influences: Vec<PackedInfluence4>,
}

impl SkinnedMesh {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.influences.len()
    }
}

/// Binds a mesh to the skeleton whose palette deforms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skin {
    pub skeleton: SkeletonId,
    pub mesh: MeshId,
}
