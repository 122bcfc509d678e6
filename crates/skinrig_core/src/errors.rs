//! Error Types
//!
//! The per-frame evaluation path never fails: invalid ids, missing tracks and
//! malformed hierarchies all degrade to fallbacks there. [`SkinrigError`]
//! covers the off-hot-path checks instead, mainly scene validation after
//! import.
//!
//! ```rust,ignore
//! use skinrig_core::{Result, SkinrigError};
//!
//! fn check(scene: &Scene) -> Result<()> {
//!     scene.validate()
//! }
//! ```

use thiserror::Error;

use crate::ids::{ClipId, NodeId, SkeletonId};

/// The main error type for skinrig.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkinrigError {
    // ========================================================================
    // Node graph errors
    // ========================================================================
    /// A node points at a parent index outside the node array.
    #[error("Node {node} references missing parent {parent}")]
    InvalidParent {
        /// The node holding the bad link
        node: NodeId,
        /// The out-of-range parent index
        parent: NodeId,
    },

    /// Parent and children links disagree.
    #[error("Node {child} is listed as a child of {parent} but its parent link says otherwise")]
    HierarchyMismatch {
        /// The node listing the child
        parent: NodeId,
        /// The listed child
        child: NodeId,
    },

    /// Walking up from `node` revisits a node already on the chain.
    #[error("Parent chain cycle detected at node {node}")]
    CycleDetected {
        /// First node found on the cycle
        node: NodeId,
    },

    // ========================================================================
    // Skeleton errors
    // ========================================================================
    /// A bone's parent-bone index is outside the bone array.
    #[error("Skeleton {skeleton}: bone {bone} references missing parent bone {parent}")]
    InvalidParentBone {
        /// Owning skeleton
        skeleton: SkeletonId,
        /// Bone index holding the bad link
        bone: usize,
        /// The out-of-range parent bone index
        parent: usize,
    },

    /// The bone parent-index graph contains a cycle.
    #[error("Skeleton {skeleton}: bone parent cycle at bone {bone}")]
    BoneCycleDetected {
        /// Owning skeleton
        skeleton: SkeletonId,
        /// First bone found on the cycle
        bone: usize,
    },

    // ========================================================================
    // Animation errors
    // ========================================================================
    /// A key array is not sorted by ascending time.
    #[error("Clip {clip}: {channel} keys of node {node} are not time-ascending (key {key})")]
    UnsortedKeys {
        /// Owning clip
        clip: ClipId,
        /// Animated node
        node: NodeId,
        /// Channel name (`translation`, `rotation` or `scale`)
        channel: &'static str,
        /// Index of the first key that goes backwards
        key: usize,
    },

    /// A clip duration is NaN, infinite or negative.
    #[error("Clip {clip}: invalid duration {duration}")]
    InvalidDuration {
        /// Owning clip
        clip: ClipId,
        /// The offending duration in seconds
        duration: f32,
    },

    // ========================================================================
    // Import errors
    // ========================================================================
    /// An importer could not produce a scene.
    #[error("Import failed: {0}")]
    ImportFailed(String),

    /// A track targets a node outside the node array.
    #[error("Clip {clip}: track targets missing node {node}")]
    InvalidTrackTarget {
        /// Owning clip
        clip: ClipId,
        /// The out-of-range node
        node: NodeId,
    },
}

/// Alias for `Result<T, SkinrigError>`.
pub type Result<T> = std::result::Result<T, SkinrigError>;
