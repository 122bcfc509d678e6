use skinrig_core::{LightId, MeshId, NodeId, SkinId, Transform};

/// A scene-graph node.
///
/// # Hierarchy
///
/// - `parent`: parent node id (`None` for roots)
/// - `children`: child node ids
///
/// Well-formed input is a forest. Nothing here enforces that; use
/// [`Scene::validate`](crate::Scene::validate) after import.
///
/// # Attachments
///
/// Mesh, skin and light references are optional ids into the scene arrays.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    /// Bind-pose local transform (the artist rest pose).
    pub bind: Transform,

    pub mesh: Option<MeshId>,
    pub skin: Option<SkinId>,
    pub light: Option<LightId>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bind(mut self, bind: Transform) -> Self {
        self.bind = bind;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Sets the parent link only. Prefer [`Scene::add_child`](crate::Scene::add_child),
    /// which keeps both sides in sync; this exists for low-level construction.
    #[inline]
    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Appends a child link only. See [`Node::set_parent`].
    #[inline]
    pub fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }
}
