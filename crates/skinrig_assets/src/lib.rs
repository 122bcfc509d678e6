//! Import-side skinning helpers.
//!
//! Format parsing and coordinate-system conversion belong to the importer
//! that implements [`SceneImporter`]. This crate takes over once the importer
//! has produced raw per-mesh bone data and raw animation channels:
//!
//! - [`normalize_influences`]: arbitrary-length (bone, weight) lists to 4 slots
//! - [`SkeletonBuilder`]: deduplicated, parent-resolved bone lists
//! - [`convert_clip`]: tick-based channels to second-based clips
//! - [`assemble_scene`]: all of the above applied to a node graph

pub mod clip_import;
pub mod import;
pub mod influence;
pub mod settings;
pub mod skeleton_builder;

pub use clip_import::{RawChannel, RawClip, convert_clip, resolve_ticks_per_second, seconds_from_ticks};
pub use import::{RawBone, RawMesh, SceneImporter, assemble_scene};
pub use influence::{normalize_influences, normalize_influences_with_limit};
pub use settings::ImportSettings;
pub use skeleton_builder::SkeletonBuilder;
