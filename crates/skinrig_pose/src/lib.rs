//! Per-frame pose evaluation.
//!
//! An [`Animator`] is bound to one skeleton of a shared scene snapshot. Each
//! [`Animator::update`] advances its playhead, samples every bone's node at
//! the wrapped clip time, composes world transforms through the full node
//! graph and writes `world * inverse_bind` per bone into its palette.
//!
//! # Threading
//!
//! Evaluation is synchronous and allocation-free after the first update.
//! Animators share the scene read-only through an `Arc` and keep all
//! transient state to themselves, so one animator per skeleton can run on
//! separate threads as long as nobody mutates the scene meanwhile.

pub mod animator;
mod pose;
pub mod system;

pub use animator::{Animator, AnimatorState, UpdateStats};
pub use system::AnimationSystem;
