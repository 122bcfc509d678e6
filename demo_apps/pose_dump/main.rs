//! Pose Dump
//!
//! Reads a JSON rig (nodes, skinned meshes, tick-based clips), assembles a
//! scene with `skinrig` and prints the bone palette translations for a few
//! frames of every clip.
//!
//! ```text
//! cargo run -p pose_dump -- [rig.json] [frames] [fps]
//! RUST_LOG=debug cargo run -p pose_dump
//! ```
//!
//! Without a path the bundled `rig.json` is used.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use skinrig::prelude::*;

const BUNDLED_RIG: &str = include_str!("rig.json");

// ============================================================================
// Rig document
// ============================================================================

#[derive(Debug, Deserialize)]
struct RigDocument {
    #[serde(default)]
    name: String,
    nodes: Vec<NodeDesc>,
    #[serde(default)]
    meshes: Vec<MeshDesc>,
    #[serde(default)]
    clips: Vec<ClipDesc>,
}

#[derive(Debug, Deserialize)]
struct NodeDesc {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    translation: Option<Vec3>,
    #[serde(default)]
    rotation: Option<Quat>,
    #[serde(default)]
    scale: Option<Vec3>,
}

#[derive(Debug, Deserialize)]
struct MeshDesc {
    name: String,
    #[serde(default)]
    node: Option<String>,
    vertex_count: usize,
    #[serde(default)]
    bones: Vec<BoneDesc>,
}

#[derive(Debug, Deserialize)]
struct BoneDesc {
    name: String,
    /// Defaults to the inverse of the bone node's bind-pose world matrix.
    #[serde(default)]
    inverse_bind: Option<Mat4>,
    #[serde(default)]
    weights: Vec<(u32, f32)>,
}

#[derive(Debug, Deserialize)]
struct ClipDesc {
    #[serde(default)]
    name: String,
    duration_ticks: f64,
    #[serde(default)]
    ticks_per_second: f64,
    #[serde(default)]
    channels: Vec<ChannelDesc>,
}

#[derive(Debug, Deserialize)]
struct ChannelDesc {
    node: String,
    #[serde(default)]
    position_keys: Vec<(f64, Vec3)>,
    #[serde(default)]
    rotation_keys: Vec<(f64, Quat)>,
    #[serde(default)]
    scale_keys: Vec<(f64, Vec3)>,
}

impl RigDocument {
    fn build_nodes(&self) -> skinrig::Result<Scene> {
        let mut scene = Scene::new();
        for desc in &self.nodes {
            let bind = Transform::new(
                desc.translation.unwrap_or(Vec3::ZERO),
                desc.rotation.unwrap_or(Quat::IDENTITY).normalize(),
                desc.scale.unwrap_or(Vec3::ONE),
            );
            let node = Node::new(desc.name.clone()).with_bind(bind);

            match desc.parent.as_deref() {
                None => {
                    scene.add_node(node);
                }
                Some(parent) => {
                    let parent_id = scene.find_node(parent).ok_or_else(|| {
                        SkinrigError::ImportFailed(format!(
                            "node '{}' names parent '{parent}' before it is declared",
                            desc.name
                        ))
                    })?;
                    scene.add_child(parent_id, node);
                }
            }
        }
        Ok(scene)
    }
}

fn bind_world(scene: &Scene, name: &str) -> Mat4 {
    let mut world = Mat4::IDENTITY;
    let mut current = scene.find_node(name);
    for _ in 0..scene.nodes.len() {
        let Some(node) = current.and_then(|id| scene.node(id)) else {
            break;
        };
        world = node.bind.to_mat4() * world;
        current = node.parent();
    }
    world
}

impl SceneImporter for RigDocument {
    fn import(&mut self, settings: &ImportSettings) -> skinrig::Result<Scene> {
        let scene = self.build_nodes()?;

        let meshes: Vec<RawMesh> = self
            .meshes
            .iter()
            .map(|mesh| RawMesh {
                name: mesh.name.clone(),
                vertex_count: mesh.vertex_count,
                node: mesh.node.clone(),
                bones: mesh
                    .bones
                    .iter()
                    .map(|bone| RawBone {
                        name: bone.name.clone(),
                        inverse_bind: bone
                            .inverse_bind
                            .unwrap_or_else(|| bind_world(&scene, &bone.name).inverse()),
                        weights: bone.weights.clone(),
                    })
                    .collect(),
            })
            .collect();

        let clips: Vec<RawClip> = self
            .clips
            .iter()
            .map(|clip| RawClip {
                name: clip.name.clone(),
                duration_ticks: clip.duration_ticks,
                ticks_per_second: clip.ticks_per_second,
                channels: clip
                    .channels
                    .iter()
                    .map(|channel| RawChannel {
                        node_name: channel.node.clone(),
                        position_keys: channel.position_keys.clone(),
                        rotation_keys: channel.rotation_keys.clone(),
                        scale_keys: channel.scale_keys.clone(),
                    })
                    .collect(),
            })
            .collect();

        Ok(assemble_scene(scene, &meshes, &clips, settings))
    }
}

// ============================================================================
// Entry point
// ============================================================================

struct Options {
    path: Option<PathBuf>,
    frames: usize,
    fps: f32,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut args = std::env::args().skip(1);
    let path = args.next().map(PathBuf::from);
    let frames = args
        .next()
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("frames must be a non-negative integer")?
        .unwrap_or(5);
    let fps = args
        .next()
        .map(|s| s.parse::<f32>())
        .transpose()
        .context("fps must be a number")?
        .unwrap_or(4.0);
    anyhow::ensure!(fps > 0.0, "fps must be positive");
    Ok(Options { path, frames, fps })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args()?;
    let source = match &options.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => BUNDLED_RIG.to_string(),
    };

    let mut document: RigDocument = serde_json::from_str(&source).context("parsing rig document")?;
    log::info!("Rig '{}': {} nodes", document.name, document.nodes.len());

    let scene = document.import(&ImportSettings::default())?;
    if let Err(err) = scene.validate() {
        log::warn!("Rig failed validation, evaluating anyway: {err}");
    }
    log::info!("{:?}", scene.stats());

    let clip_count = scene.clips.len();
    let mut system = AnimationSystem::new(Arc::new(scene));
    if clip_count == 0 {
        log::warn!("Rig has no clips, nothing to play");
        return Ok(());
    }

    let dt = 1.0 / options.fps;
    for _ in 0..clip_count {
        let Some(clip_id) = system.current_clip() else {
            break;
        };
        let clip_name = system
            .scene()
            .clip(clip_id)
            .map_or_else(String::new, |clip| clip.name.clone());
        println!("== {clip_name}");

        for frame in 0..options.frames {
            system.update(if frame == 0 { 0.0 } else { dt });
            for animator in system.animators() {
                let stats = animator.last_update_stats();
                let Some(skeleton) = animator.scene().and_then(|s| s.skeleton(animator.skeleton_id())) else {
                    continue;
                };
                println!("  t={:.3}s [{}]", stats.sample_time, skeleton.name);
                for (bone, matrix) in skeleton.bones().iter().zip(animator.palette()) {
                    let world = *matrix * bone.global_bind;
                    let p = world.w_axis;
                    println!("    {:<12} ({:>7.3}, {:>7.3}, {:>7.3})", bone.name, p.x, p.y, p.z);
                }
            }
        }

        system.next_clip();
    }

    Ok(())
}
