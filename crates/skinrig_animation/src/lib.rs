//! Keyframe animation data for skinrig.
//!
//! - [`KeyframeTrack`]: one time-sorted channel and its sampler
//! - [`NodeTrack`] / [`AnimationClip`]: per-node TRS channels grouped into a clip
//! - [`LoopMode`] / [`wrap_time`]: mapping a free-running playhead onto clip time

pub mod clip;
pub mod playback;
pub mod tracks;
pub mod values;

pub use clip::{AnimationClip, NodeTrack};
pub use playback::{LoopMode, wrap_time};
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use values::Interpolatable;
