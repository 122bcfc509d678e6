use log::debug;
use rustc_hash::FxHashMap;
use skinrig_animation::AnimationClip;
use skinrig_core::{
    ClipId, LightId, MeshId, NodeId, Result, SkeletonId, SkinId, SkinrigError,
};

use crate::hierarchy::find_parent_cycle;
use crate::light::Light;
use crate::node::Node;
use crate::skeleton::Skeleton;
use crate::skin::{Skin, SkinnedMesh};

/// Imported scene snapshot.
///
/// Arrays are addressed by the typed ids in `skinrig_core`. The snapshot is
/// built once and must not be structurally mutated while any pose evaluation
/// reads it; evaluators hold it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub nodes: Vec<Node>,
    pub roots: Vec<NodeId>,
    pub meshes: Vec<SkinnedMesh>,
    pub skeletons: Vec<Skeleton>,
    pub skins: Vec<Skin>,
    pub clips: Vec<AnimationClip>,
    pub lights: Vec<Light>,

    node_names: FxHashMap<String, NodeId>,
}

/// Element counts of a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneStats {
    pub node_count: usize,
    pub mesh_count: usize,
    pub skeleton_count: usize,
    pub bone_count: usize,
    pub skin_count: usize,
    pub clip_count: usize,
    pub light_count: usize,
    pub vertex_count: usize,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Adds a root node.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.insert_node(node);
        self.roots.push(id);
        id
    }

    /// Adds a node under `parent`, linking both sides. An unknown parent
    /// makes the node a root.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        if parent.index() >= self.nodes.len() {
            return self.add_node(node);
        }

        node.parent = Some(parent);
        let id = self.insert_node(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn insert_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::from(self.nodes.len());
        // First node with a given name wins, matching import-time lookup.
        self.node_names.entry(node.name.clone()).or_insert(id);
        self.nodes.push(node);
        id
    }

    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Looks a node up by name.
    ///
    /// Names registered through [`Scene::add_node`] / [`Scene::add_child`]
    /// are indexed; nodes pushed directly into `nodes` are found by a scan.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        if let Some(&id) = self.node_names.get(name) {
            return Some(id);
        }
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId::from)
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkeletonId {
        let id = SkeletonId::from(self.skeletons.len());
        debug!(
            "Scene: skeleton {id} '{}' with {} bones",
            skeleton.name,
            skeleton.len()
        );
        self.skeletons.push(skeleton);
        id
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self, id: SkeletonId) -> Option<&Skeleton> {
        self.skeletons.get(id.index())
    }

    pub fn add_clip(&mut self, clip: AnimationClip) -> ClipId {
        let id = ClipId::from(self.clips.len());
        self.clips.push(clip);
        id
    }

    #[inline]
    #[must_use]
    pub fn clip(&self, id: ClipId) -> Option<&AnimationClip> {
        self.clips.get(id.index())
    }

    #[must_use]
    pub fn clip_by_name(&self, name: &str) -> Option<ClipId> {
        self.clips
            .iter()
            .position(|clip| clip.name == name)
            .map(ClipId::from)
    }

    /// Registers a skinned mesh, a skin binding it to `skeleton`, and attaches
    /// both to `node` when given.
    ///
    /// A node already carrying a mesh keeps it; the new mesh goes on a fresh
    /// identity child named `<node>_mesh_<id>`.
    pub fn add_skinned_mesh(
        &mut self,
        mesh: SkinnedMesh,
        skeleton: SkeletonId,
        node: Option<NodeId>,
    ) -> (MeshId, SkinId) {
        let mesh_id = MeshId::from(self.meshes.len());
        self.meshes.push(mesh);

        let skin_id = SkinId::from(self.skins.len());
        self.skins.push(Skin {
            skeleton,
            mesh: mesh_id,
        });

        let target = node.and_then(|id| {
            let occupied = self.node(id)?;
            if occupied.mesh.is_none() {
                return Some(id);
            }
            let name = format!("{}_mesh_{}", occupied.name, mesh_id.index());
            debug!("Scene: node {id} already has a mesh, attaching {mesh_id} to '{name}'");
            Some(self.add_child(id, Node::new(name)))
        });

        if let Some(node) = target.and_then(|id| self.node_mut(id)) {
            node.mesh = Some(mesh_id);
            node.skin = Some(skin_id);
        }

        (mesh_id, skin_id)
    }

    pub fn add_light(&mut self, light: Light, node: Option<NodeId>) -> LightId {
        let id = LightId::from(self.lights.len());
        self.lights.push(light);
        if let Some(node) = node.and_then(|id| self.nodes.get_mut(id.index())) {
            node.light = Some(id);
        }
        id
    }

    #[must_use]
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            node_count: self.nodes.len(),
            mesh_count: self.meshes.len(),
            skeleton_count: self.skeletons.len(),
            bone_count: self.skeletons.iter().map(Skeleton::len).sum(),
            skin_count: self.skins.len(),
            clip_count: self.clips.len(),
            light_count: self.lights.len(),
            vertex_count: self.meshes.iter().map(SkinnedMesh::vertex_count).sum(),
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the structural invariants the evaluator assumes but does not
    /// enforce: forest-shaped nodes, in-range and acyclic bone parents, and
    /// time-ascending keys.
    ///
    /// Evaluation of a scene that fails here still runs; it falls back to
    /// identity at the broken links.
    pub fn validate(&self) -> Result<()> {
        self.validate_nodes()?;
        self.validate_skeletons()?;
        self.validate_clips()
    }

    fn validate_nodes(&self) -> Result<()> {
        let count = self.nodes.len();

        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId::from(index);
            if let Some(parent) = node.parent
                && parent.index() >= count
            {
                return Err(SkinrigError::InvalidParent { node: id, parent });
            }

            for &child in &node.children {
                let linked = self
                    .node(child)
                    .is_some_and(|c| c.parent == Some(id));
                if !linked {
                    return Err(SkinrigError::HierarchyMismatch { parent: id, child });
                }
            }
        }

        match find_parent_cycle(count, |i| self.nodes[i].parent.map(NodeId::index)) {
            Some(node) => Err(SkinrigError::CycleDetected {
                node: NodeId::from(node),
            }),
            None => Ok(()),
        }
    }

    fn validate_skeletons(&self) -> Result<()> {
        for (index, skeleton) in self.skeletons.iter().enumerate() {
            let id = SkeletonId::from(index);
            let bones = skeleton.bones();

            for (bone, entry) in bones.iter().enumerate() {
                if let Some(parent) = entry.parent
                    && parent >= bones.len()
                {
                    return Err(SkinrigError::InvalidParentBone {
                        skeleton: id,
                        bone,
                        parent,
                    });
                }
            }

            if let Some(bone) = find_parent_cycle(bones.len(), |i| bones[i].parent) {
                return Err(SkinrigError::BoneCycleDetected { skeleton: id, bone });
            }
        }
        Ok(())
    }

    fn validate_clips(&self) -> Result<()> {
        for (index, clip) in self.clips.iter().enumerate() {
            let id = ClipId::from(index);
            if !clip.duration.is_finite() || clip.duration < 0.0 {
                return Err(SkinrigError::InvalidDuration {
                    clip: id,
                    duration: clip.duration,
                });
            }

            for track in clip.tracks() {
                if track.node.index() >= self.nodes.len() {
                    return Err(SkinrigError::InvalidTrackTarget {
                        clip: id,
                        node: track.node,
                    });
                }

                let channels = [
                    ("translation", track.translation.first_unsorted_key()),
                    ("rotation", track.rotation.first_unsorted_key()),
                    ("scale", track.scale.first_unsorted_key()),
                ];
                for (channel, key) in channels {
                    if let Some(key) = key {
                        return Err(SkinrigError::UnsortedKeys {
                            clip: id,
                            node: track.node,
                            channel,
                            key,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
