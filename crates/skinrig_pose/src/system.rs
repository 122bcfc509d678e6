//! Scene-wide playback: one [`Animator`] per skeleton, driven together.

use std::sync::Arc;

use log::{debug, info};
use skinrig_animation::LoopMode;
use skinrig_core::{ClipId, SkeletonId};
use skinrig_scene::Scene;

use crate::animator::Animator;

/// Drives every skeleton of a scene from a shared clip selection.
///
/// Controls are broadcast to all animators. Clip cycling wraps around the
/// scene's clip list in both directions.
#[derive(Debug)]
pub struct AnimationSystem {
    scene: Arc<Scene>,
    animators: Vec<Animator>,
    current_clip: Option<ClipId>,
    loop_mode: LoopMode,
    paused: bool,
    speed: f32,
}

impl AnimationSystem {
    /// Binds one animator per skeleton and starts clip 0 looping when the
    /// scene has any clips.
    #[must_use]
    pub fn new(scene: Arc<Scene>) -> Self {
        let animators = (0..scene.skeletons.len())
            .map(|index| {
                let mut animator = Animator::new();
                animator.bind(scene.clone(), SkeletonId::from(index));
                animator
            })
            .collect();

        let mut system = Self {
            scene,
            animators,
            current_clip: None,
            loop_mode: LoopMode::Loop,
            paused: false,
            speed: 1.0,
        };
        if !system.scene.clips.is_empty() {
            system.play(ClipId(0), LoopMode::Loop);
        }
        system
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// Hard-cuts every animator to `clip`, rewinding playheads.
    pub fn play(&mut self, clip: ClipId, loop_mode: impl Into<LoopMode>) {
        let loop_mode = loop_mode.into();
        for animator in &mut self.animators {
            animator.set_clip(clip, loop_mode);
        }
        self.current_clip = Some(clip);
        self.loop_mode = loop_mode;

        if let Some(entry) = self.scene.clip(clip) {
            info!("Playing clip '{}' ({:.2}s)", entry.name, entry.duration);
        }
    }

    /// Switches to the next clip, wrapping to the first. Returns the new clip.
    pub fn next_clip(&mut self) -> Option<ClipId> {
        self.step_clip(1)
    }

    /// Switches to the previous clip, wrapping to the last.
    pub fn previous_clip(&mut self) -> Option<ClipId> {
        self.step_clip(-1)
    }

    fn step_clip(&mut self, step: isize) -> Option<ClipId> {
        let count = self.scene.clips.len();
        if count == 0 {
            return None;
        }
        let current = self.current_clip.map_or(0, |c| c.index().min(count - 1));
        let next = (current as isize + step).rem_euclid(count as isize) as usize;
        let clip = ClipId::from(next);
        self.play(clip, self.loop_mode);
        Some(clip)
    }

    #[inline]
    #[must_use]
    pub fn current_clip(&self) -> Option<ClipId> {
        self.current_clip
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        for animator in &mut self.animators {
            animator.set_paused(paused);
        }
    }

    /// Flips the pause state and returns the new one.
    pub fn toggle_paused(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        for animator in &mut self.animators {
            animator.set_speed(speed);
        }
    }

    /// Adds `delta` to the playback speed. Returns the new speed.
    pub fn nudge_speed(&mut self, delta: f32) -> f32 {
        self.set_speed(self.speed + delta);
        debug!("Playback speed {:.2}", self.speed);
        self.speed
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn update(&mut self, dt: f32) {
        for animator in &mut self.animators {
            animator.update(dt);
        }
    }

    #[must_use]
    pub fn animator(&self, skeleton: SkeletonId) -> Option<&Animator> {
        self.animators.get(skeleton.index())
    }

    #[must_use]
    pub fn animators(&self) -> &[Animator] {
        &self.animators
    }

    pub fn animators_mut(&mut self) -> &mut [Animator] {
        &mut self.animators
    }
}
