use std::sync::Arc;

use glam::Mat4;
use log::{debug, trace, warn};
use skinrig_animation::{LoopMode, wrap_time};
use skinrig_core::{ClipId, SkeletonId};
use skinrig_scene::Scene;

use crate::pose::{PoseInput, PoseScratch};

/// Playback control of one [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorState {
    pub clip: ClipId,
    /// Free-running playhead in seconds. Never wrapped itself; the sample
    /// time is derived from it on every update.
    pub time: f32,
    /// Playback rate. Negative plays backwards; not range-checked.
    pub speed: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
}

impl Default for AnimatorState {
    fn default() -> Self {
        Self {
            clip: ClipId(0),
            time: 0.0,
            speed: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
        }
    }
}

/// What the last [`Animator::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateStats {
    /// Whether a pose was evaluated at all.
    pub evaluated: bool,
    /// Clip time the pose was sampled at.
    pub sample_time: f32,
    /// Parent-chain cycles cut with identity. Nonzero means malformed input.
    pub cycles_broken: u32,
}

/// Pose evaluator for a single skeleton.
///
/// ```rust,ignore
/// let mut animator = Animator::new();
/// animator.bind(scene.clone(), SkeletonId(0));
/// animator.set_clip(ClipId(0), LoopMode::Loop);
///
/// // every tick
/// animator.update(dt);
/// upload(animator.palette_bytes());
/// ```
///
/// Nothing here fails: invalid ids leave the animator inert and the palette
/// at its last valid contents.
#[derive(Debug, Default)]
pub struct Animator {
    scene: Option<Arc<Scene>>,
    skeleton: SkeletonId,
    state: AnimatorState,
    palette: Vec<Mat4>,
    scratch: PoseScratch,
    stats: UpdateStats,
    cycle_reported: bool,
}

impl Animator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds to `skeleton` of `scene` and resets the palette to one identity
    /// matrix per bone. An unknown skeleton leaves the palette empty and
    /// every update a no-op.
    pub fn bind(&mut self, scene: Arc<Scene>, skeleton: SkeletonId) {
        self.palette.clear();
        match scene.skeleton(skeleton) {
            Some(bones) => {
                self.palette.resize(bones.len(), Mat4::IDENTITY);
                debug!(
                    "Animator: bound to skeleton {skeleton} '{}' ({} bones)",
                    bones.name,
                    bones.len()
                );
            }
            None => warn!(
                "Animator: skeleton {skeleton} out of range ({} skeletons), animator is inert",
                scene.skeletons.len()
            ),
        }

        self.scene = Some(scene);
        self.skeleton = skeleton;
        self.stats = UpdateStats::default();
        self.cycle_reported = false;
    }

    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.scene.is_some()
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> Option<&Arc<Scene>> {
        self.scene.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn skeleton_id(&self) -> SkeletonId {
        self.skeleton
    }

    /// Switches clip with a hard cut and rewinds the playhead to 0.
    pub fn set_clip(&mut self, clip: ClipId, loop_mode: impl Into<LoopMode>) {
        let loop_mode = loop_mode.into();
        if let Some(scene) = &self.scene {
            match scene.clip(clip) {
                Some(entry) => debug!("Animator: clip {clip} '{}' ({loop_mode:?})", entry.name),
                None => warn!("Animator: clip {clip} out of range, updates will hold the current pose"),
            }
        }

        self.state.clip = clip;
        self.state.loop_mode = loop_mode;
        self.state.time = 0.0;
    }

    #[inline]
    pub fn set_paused(&mut self, paused: bool) {
        self.state.paused = paused;
    }

    #[inline]
    pub fn set_speed(&mut self, speed: f32) {
        self.state.speed = speed;
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &AnimatorState {
        &self.state
    }

    /// Advances the playhead by `dt * speed` (unless paused) and re-evaluates
    /// the whole palette.
    ///
    /// No-op when unbound, when the skeleton is unknown or has no bones, or
    /// when the current clip does not exist; the playhead does not move then.
    pub fn update(&mut self, dt: f32) {
        let Self {
            scene,
            skeleton,
            state,
            palette,
            scratch,
            stats,
            cycle_reported,
        } = self;

        let Some(scene) = scene.as_deref() else {
            return;
        };
        let Some(skeleton) = scene.skeleton(*skeleton).filter(|s| !s.is_empty()) else {
            return;
        };
        let Some(clip) = scene.clip(state.clip) else {
            return;
        };

        if !state.paused {
            state.time += dt * state.speed;
        }
        let sample_time = wrap_time(state.time, clip.duration, state.loop_mode);

        let input = PoseInput {
            nodes: &scene.nodes,
            bones: skeleton.bones(),
            clip,
            time: sample_time,
        };
        let cycles_broken = scratch.evaluate(&input, palette);

        if cycles_broken > 0 && !*cycle_reported {
            warn!(
                "Animator: skeleton '{}' has {cycles_broken} parent-chain cycle(s), substituting identity",
                skeleton.name
            );
            *cycle_reported = true;
        }

        trace!(
            "Animator: playhead {:.4}s -> sample {sample_time:.4}s ({})",
            state.time, clip.name
        );

        *stats = UpdateStats {
            evaluated: true,
            sample_time,
            cycles_broken,
        };
    }

    /// Skin matrices in bone order. Identity per bone until the first update,
    /// empty when bound to an unknown skeleton.
    #[inline]
    #[must_use]
    pub fn palette(&self) -> &[Mat4] {
        &self.palette
    }

    /// The palette as raw bytes, column-major `f32`s, ready for a buffer
    /// upload.
    #[inline]
    #[must_use]
    pub fn palette_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.palette)
    }

    #[inline]
    #[must_use]
    pub fn last_update_stats(&self) -> UpdateStats {
        self.stats
    }
}
