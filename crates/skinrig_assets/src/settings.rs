//! Import configuration.
//!
//! ```rust,ignore
//! let settings = ImportSettings {
//!     max_bone_influences: 2,
//!     ..Default::default()
//! };
//! ```

use skinrig_core::MAX_BONE_INFLUENCES;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    /// How many influences survive per vertex before renormalization.
    /// Clamped to `1..=MAX_BONE_INFLUENCES`.
    pub max_bone_influences: usize,
    /// Tick rate assumed when the source reports a non-positive one.
    pub default_ticks_per_second: f32,
    /// Name given to the skeleton built from all skinned meshes.
    pub skeleton_name: String,
}

impl ImportSettings {
    #[inline]
    #[must_use]
    pub fn influence_limit(&self) -> usize {
        self.max_bone_influences.clamp(1, MAX_BONE_INFLUENCES)
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_bone_influences: MAX_BONE_INFLUENCES,
            default_ticks_per_second: 30.0,
            skeleton_name: "Skeleton".to_string(),
        }
    }
}
