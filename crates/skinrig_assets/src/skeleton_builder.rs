use glam::Mat4;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use skinrig_core::NodeId;
use skinrig_scene::{Bone, PackedInfluence4, Scene, Skeleton};
use smallvec::SmallVec;

use crate::import::RawMesh;
use crate::influence::normalize_influences_with_limit;
use crate::settings::ImportSettings;

/// Accumulates bones from every mesh that shares one skeleton.
///
/// Bones are registered by name on first encounter, and registration order
/// is the final bone index. That index is what vertex joint slots and the
/// palette both use, so it never changes after registration. Parent bones
/// are resolved in [`SkeletonBuilder::finish`], once every mesh has been
/// seen.
pub struct SkeletonBuilder<'a> {
    scene: &'a Scene,
    name: String,
    influence_limit: usize,
    bones: Vec<Bone>,
    bone_map: FxHashMap<String, usize>,
}

impl<'a> SkeletonBuilder<'a> {
    #[must_use]
    pub fn new(scene: &'a Scene, settings: &ImportSettings) -> Self {
        Self {
            scene,
            name: settings.skeleton_name.clone(),
            influence_limit: settings.influence_limit(),
            bones: Vec::new(),
            bone_map: FxHashMap::default(),
        }
    }

    /// Registers `name` if unseen and returns its bone index.
    ///
    /// A name without a matching scene node is still registered so mesh joint
    /// indices stay aligned; the bone evaluates with an identity local.
    /// For an already registered name the first inverse-bind matrix is kept.
    pub fn register_bone(&mut self, name: &str, inverse_bind: Mat4) -> usize {
        if let Some(&index) = self.bone_map.get(name) {
            return index;
        }

        let node = self.scene.find_node(name);
        if node.is_none() {
            warn!("SkeletonBuilder: bone '{name}' has no matching node");
        }

        let index = self.bones.len();
        self.bones.push(Bone::new(name, node, inverse_bind));
        self.bone_map.insert(name.to_string(), index);
        index
    }

    /// Registers the bones of one mesh and packs its per-vertex influences.
    ///
    /// Returns one entry per vertex. Untouched vertices get the default
    /// binding; weights naming vertices past `vertex_count` are ignored.
    pub fn add_mesh(&mut self, mesh: &RawMesh) -> Vec<PackedInfluence4> {
        let mut per_vertex: Vec<SmallVec<[(u32, f32); 8]>> =
            vec![SmallVec::new(); mesh.vertex_count];

        for raw in &mesh.bones {
            let bone = self.register_bone(&raw.name, raw.inverse_bind) as u32;
            for &(vertex, weight) in &raw.weights {
                if let Some(list) = per_vertex.get_mut(vertex as usize) {
                    list.push((bone, weight));
                }
            }
        }

        per_vertex
            .iter()
            .map(|list| normalize_influences_with_limit(list, self.influence_limit))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Resolves parent bones and produces the skeleton.
    ///
    /// A bone's parent is the nearest ancestor of its node that is itself a
    /// registered bone; bones with no such ancestor, or with no node, are
    /// roots.
    #[must_use]
    pub fn finish(self) -> Skeleton {
        let Self {
            scene, name, mut bones, ..
        } = self;

        // First bone per node, matching a front-to-back scan of the bone list.
        let mut bone_by_node: FxHashMap<NodeId, usize> = FxHashMap::default();
        for (index, bone) in bones.iter().enumerate() {
            if let Some(node) = bone.node {
                bone_by_node.entry(node).or_insert(index);
            }
        }

        for bone in &mut bones {
            bone.parent = bone
                .node
                .and_then(|node| nearest_bone_ancestor(scene, node, &bone_by_node));
        }

        let skeleton = Skeleton::from_bones(name, bones);
        debug!(
            "SkeletonBuilder: built '{}' with {} bones, root node {:?}",
            skeleton.name,
            skeleton.len(),
            skeleton.root_node()
        );
        skeleton
    }
}

fn nearest_bone_ancestor(
    scene: &Scene,
    node: NodeId,
    bone_by_node: &FxHashMap<NodeId, usize>,
) -> Option<usize> {
    // A well-formed chain is at most `nodes.len()` long; the bound keeps a
    // malformed cyclic chain from spinning forever.
    let mut walk = scene.node(node)?.parent();
    for _ in 0..scene.nodes.len() {
        let current = walk?;
        if current == node {
            // Walked all the way around a cycle back to ourselves.
            return None;
        }
        if let Some(&bone) = bone_by_node.get(&current) {
            return Some(bone);
        }
        walk = scene.node(current)?.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinrig_scene::Node;

    #[test]
    fn cyclic_node_chain_terminates() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::new("a"));
        let b = scene.add_child(a, Node::new("b"));
        scene.nodes[a.index()].set_parent(Some(b));

        let settings = ImportSettings::default();
        let mut builder = SkeletonBuilder::new(&scene, &settings);
        builder.register_bone("b", Mat4::IDENTITY);
        let skeleton = builder.finish();
        assert_eq!(skeleton.bones()[0].parent, None);
    }

    #[test]
    fn reregistering_keeps_first_inverse_bind() {
        let scene = Scene::new();
        let settings = ImportSettings::default();
        let mut builder = SkeletonBuilder::new(&scene, &settings);
        let first = builder.register_bone("hip", Mat4::IDENTITY);
        let again = builder.register_bone("hip", Mat4::from_scale(glam::Vec3::splat(2.0)));
        assert_eq!(first, again);
        assert_eq!(builder.bone_count(), 1);
        assert_eq!(builder.finish().bones()[0].inverse_bind, Mat4::IDENTITY);
    }
}
