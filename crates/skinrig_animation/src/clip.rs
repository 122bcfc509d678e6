use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use skinrig_core::{NodeId, Transform};

use crate::tracks::KeyframeTrack;

/// The animated channels of one node. Any of the three arrays may be empty.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeTrack {
    pub node: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub translation: KeyframeTrack<Vec3>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: KeyframeTrack<Quat>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale: KeyframeTrack<Vec3>,
}

impl NodeTrack {
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_translation(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.translation = track;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, track: KeyframeTrack<Quat>) -> Self {
        self.rotation = track;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.scale = track;
        self
    }

    /// Samples all three channels independently. A channel without keys keeps
    /// the matching component of `rest`.
    #[must_use]
    pub fn sample(&self, time: f32, rest: &Transform) -> Transform {
        Transform {
            translation: self.translation.sample_or(time, rest.translation),
            rotation: self.rotation.sample_or(time, rest.rotation),
            scale: self.scale.sample_or(time, rest.scale),
        }
    }

    /// Largest key time across the three channels.
    #[must_use]
    pub fn end_time(&self) -> Option<f32> {
        [
            self.translation.end_time(),
            self.rotation.end_time(),
            self.scale.end_time(),
        ]
        .into_iter()
        .flatten()
        .reduce(f32::max)
    }
}

/// A named set of node tracks.
///
/// `duration` is in seconds; `ticks_per_second` records the source tick rate
/// the key times were converted from and is informational once imported.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ClipDesc", into = "ClipDesc"))]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub ticks_per_second: f32,
    tracks: Vec<NodeTrack>,
    track_lookup: FxHashMap<NodeId, usize>,
}

impl AnimationClip {
    pub const DEFAULT_TICKS_PER_SECOND: f32 = 30.0;

    #[must_use]
    pub fn new(
        name: impl Into<String>,
        duration: f32,
        ticks_per_second: f32,
        tracks: Vec<NodeTrack>,
    ) -> Self {
        let mut track_lookup = FxHashMap::default();
        for (index, track) in tracks.iter().enumerate() {
            // First track for a node wins.
            track_lookup.entry(track.node).or_insert(index);
        }

        Self {
            name: name.into(),
            duration,
            ticks_per_second,
            tracks,
            track_lookup,
        }
    }

    /// Builds a clip whose duration is the last key time across all tracks.
    #[must_use]
    pub fn from_tracks(name: impl Into<String>, tracks: Vec<NodeTrack>) -> Self {
        let duration = tracks
            .iter()
            .filter_map(NodeTrack::end_time)
            .fold(0.0_f32, f32::max);
        Self::new(name, duration, Self::DEFAULT_TICKS_PER_SECOND, tracks)
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[NodeTrack] {
        &self.tracks
    }

    /// The track animating `node`, if the clip has one.
    #[inline]
    #[must_use]
    pub fn track_for(&self, node: NodeId) -> Option<&NodeTrack> {
        self.track_lookup.get(&node).map(|&i| &self.tracks[i])
    }

    /// Samples `node`'s local transform at `time`, using `rest` for every
    /// channel the clip does not animate.
    #[must_use]
    pub fn sample_node(&self, node: NodeId, time: f32, rest: &Transform) -> Transform {
        match self.track_for(node) {
            Some(track) => track.sample(time, rest),
            None => *rest,
        }
    }
}

/// Serialized form of [`AnimationClip`]; the track lookup is rebuilt on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ClipDesc {
    name: String,
    duration: f32,
    #[serde(default = "default_ticks_per_second")]
    ticks_per_second: f32,
    tracks: Vec<NodeTrack>,
}

#[cfg(feature = "serde")]
fn default_ticks_per_second() -> f32 {
    AnimationClip::DEFAULT_TICKS_PER_SECOND
}

#[cfg(feature = "serde")]
impl From<ClipDesc> for AnimationClip {
    fn from(desc: ClipDesc) -> Self {
        Self::new(desc.name, desc.duration, desc.ticks_per_second, desc.tracks)
    }
}

#[cfg(feature = "serde")]
impl From<AnimationClip> for ClipDesc {
    fn from(clip: AnimationClip) -> Self {
        Self {
            name: clip.name,
            duration: clip.duration,
            ticks_per_second: clip.ticks_per_second,
            tracks: clip.tracks,
        }
    }
}
