use glam::Mat4;
use rustc_hash::FxHashMap;
use skinrig_core::NodeId;

/// A named joint bound to a scene node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    pub name: String,
    /// Owning node. `None` when the bone name matched no node at import; the
    /// bone keeps its slot and evaluates with an identity local transform.
    pub node: Option<NodeId>,
    /// Index of the nearest ancestor bone, `None` for skeleton roots.
    pub parent: Option<usize>,
    /// Maps a vertex from bind-time model space into this bone's space.
    pub inverse_bind: Mat4,
    /// `inverse_bind.inverse()`, informational only.
    pub global_bind: Mat4,
}

impl Bone {
    #[must_use]
    pub fn new(name: impl Into<String>, node: Option<NodeId>, inverse_bind: Mat4) -> Self {
        Self {
            name: name.into(),
            node,
            parent: None,
            inverse_bind,
            global_bind: inverse_bind.inverse(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: Option<usize>) -> Self {
        self.parent = parent;
        self
    }
}

/// Ordered bone list.
///
/// Bone order is the palette layout: palette entry `i` is the skin matrix of
/// `bones()[i]`, and vertex joint indices refer to the same positions. It is
/// fixed once the skeleton is built.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "SkeletonDesc", into = "SkeletonDesc"))]
pub struct Skeleton {
    pub name: String,
    root_node: Option<NodeId>,
    bones: Vec<Bone>,
    bone_map: FxHashMap<String, usize>,
}

impl Skeleton {
    /// Builds a skeleton from bones whose parent indices are already resolved.
    ///
    /// The root node is the node of the first parentless bone that has one.
    /// Duplicate names keep their slots; lookups return the first.
    #[must_use]
    pub fn from_bones(name: impl Into<String>, bones: Vec<Bone>) -> Self {
        let mut bone_map = FxHashMap::default();
        for (index, bone) in bones.iter().enumerate() {
            bone_map.entry(bone.name.clone()).or_insert(index);
        }

        let root_node = bones
            .iter()
            .filter(|bone| bone.parent.is_none())
            .find_map(|bone| bone.node);

        Self {
            name: name.into(),
            root_node,
            bones,
            bone_map,
        }
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_map.get(name).copied()
    }

    /// Node of the first root bone.
    #[inline]
    #[must_use]
    pub fn root_node(&self) -> Option<NodeId> {
        self.root_node
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SkeletonDesc {
    name: String,
    bones: Vec<Bone>,
}

#[cfg(feature = "serde")]
impl From<SkeletonDesc> for Skeleton {
    fn from(desc: SkeletonDesc) -> Self {
        Self::from_bones(desc.name, desc.bones)
    }
}

#[cfg(feature = "serde")]
impl From<Skeleton> for SkeletonDesc {
    fn from(skeleton: Skeleton) -> Self {
        Self {
            name: skeleton.name,
            bones: skeleton.bones,
        }
    }
}
