//! Tick-based animation channels to second-based clips.

use glam::{Quat, Vec3};
use log::{debug, warn};
use skinrig_animation::{AnimationClip, KeyframeTrack, NodeTrack};
use skinrig_scene::Scene;

use crate::settings::ImportSettings;

/// One animated node as reported by a source format, times in ticks.
#[derive(Debug, Clone, Default)]
pub struct RawChannel {
    pub node_name: String,
    pub position_keys: Vec<(f64, Vec3)>,
    pub rotation_keys: Vec<(f64, Quat)>,
    pub scale_keys: Vec<(f64, Vec3)>,
}

#[derive(Debug, Clone, Default)]
pub struct RawClip {
    pub name: String,
    pub duration_ticks: f64,
    /// Source tick rate; non-positive means "unknown".
    pub ticks_per_second: f64,
    pub channels: Vec<RawChannel>,
}

/// The source tick rate, or the configured default when the source reports
/// a non-positive one.
#[must_use]
pub fn resolve_ticks_per_second(raw: f64, settings: &ImportSettings) -> f32 {
    if raw > 0.0 {
        raw as f32
    } else {
        settings.default_ticks_per_second
    }
}

#[inline]
#[must_use]
pub fn seconds_from_ticks(ticks: f64, ticks_per_second: f32) -> f32 {
    (ticks / f64::from(ticks_per_second)) as f32
}

fn convert_keys<T: skinrig_animation::Interpolatable>(
    keys: &[(f64, T)],
    ticks_per_second: f32,
) -> KeyframeTrack<T> {
    KeyframeTrack::from_keys(
        keys.iter()
            .map(|&(ticks, value)| (seconds_from_ticks(ticks, ticks_per_second), value)),
    )
}

/// Converts a raw clip against the scene's node names.
///
/// Channels naming unknown nodes are dropped. An unnamed clip becomes
/// `Clip_<index>`; a non-positive duration becomes 0.
#[must_use]
pub fn convert_clip(raw: &RawClip, index: usize, scene: &Scene, settings: &ImportSettings) -> AnimationClip {
    let ticks_per_second = resolve_ticks_per_second(raw.ticks_per_second, settings);
    let duration = if raw.duration_ticks > 0.0 {
        seconds_from_ticks(raw.duration_ticks, ticks_per_second)
    } else {
        0.0
    };

    let name = if raw.name.is_empty() {
        format!("Clip_{index}")
    } else {
        raw.name.clone()
    };

    let mut tracks = Vec::with_capacity(raw.channels.len());
    for channel in &raw.channels {
        let Some(node) = scene.find_node(&channel.node_name) else {
            warn!(
                "Clip '{name}': channel for unknown node '{}' skipped",
                channel.node_name
            );
            continue;
        };

        tracks.push(
            NodeTrack::new(node)
                .with_translation(convert_keys(&channel.position_keys, ticks_per_second))
                .with_rotation(convert_keys(&channel.rotation_keys, ticks_per_second))
                .with_scale(convert_keys(&channel.scale_keys, ticks_per_second)),
        );
    }

    debug!(
        "Clip '{name}': {duration}s at {ticks_per_second} ticks/s, {} tracks",
        tracks.len()
    );
    AnimationClip::new(name, duration, ticks_per_second, tracks)
}
