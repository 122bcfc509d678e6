//! Importer seam and scene assembly.

use glam::Mat4;
use log::debug;
use skinrig_core::Result;
use skinrig_scene::{Scene, SkinnedMesh};

use crate::clip_import::{RawClip, convert_clip};
use crate::settings::ImportSettings;
use crate::skeleton_builder::SkeletonBuilder;

/// A bone as listed by one mesh: name, inverse-bind matrix (already in the
/// scene's coordinate system) and the vertices it weights.
#[derive(Debug, Clone)]
pub struct RawBone {
    pub name: String,
    pub inverse_bind: Mat4,
    /// `(vertex index, weight)` pairs.
    pub weights: Vec<(u32, f32)>,
}

#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub name: String,
    pub vertex_count: usize,
    pub bones: Vec<RawBone>,
    /// Name of the node the mesh hangs off, if any.
    pub node: Option<String>,
}

/// A source of scene snapshots (a file format reader, a procedural
/// generator, a test fixture).
pub trait SceneImporter {
    fn import(&mut self, settings: &ImportSettings) -> Result<Scene>;
}

/// Completes a scene whose node graph is already populated.
///
/// All meshes with bones share one skeleton, built in mesh order. Meshes
/// without bones are not skinned and are skipped here. Clips are converted
/// in order; ids follow input order.
#[must_use]
pub fn assemble_scene(
    mut scene: Scene,
    meshes: &[RawMesh],
    clips: &[RawClip],
    settings: &ImportSettings,
) -> Scene {
    let mut skinned = Vec::new();
    let skeleton = {
        let mut builder = SkeletonBuilder::new(&scene, settings);
        for mesh in meshes.iter().filter(|mesh| !mesh.bones.is_empty()) {
            let influences = builder.add_mesh(mesh);
            let node = mesh.node.as_deref().and_then(|name| scene.find_node(name));
            skinned.push((
                SkinnedMesh {
                    name: mesh.name.clone(),
                    influences,
                },
                node,
            ));
        }
        (builder.bone_count() > 0).then(|| builder.finish())
    };

    if let Some(skeleton) = skeleton {
        let skeleton_id = scene.add_skeleton(skeleton);
        for (mesh, node) in skinned {
            scene.add_skinned_mesh(mesh, skeleton_id, node);
        }
    }

    for (index, raw) in clips.iter().enumerate() {
        let clip = convert_clip(raw, index, &scene, settings);
        scene.add_clip(clip);
    }

    debug!("assemble_scene: {:?}", scene.stats());
    scene
}
