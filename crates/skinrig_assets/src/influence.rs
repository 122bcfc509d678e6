//! Per-vertex influence packing.

use smallvec::SmallVec;
use skinrig_core::MAX_BONE_INFLUENCES;
use skinrig_scene::PackedInfluence4;

/// Sums at or below this carry no usable influence.
const MIN_WEIGHT_SUM: f32 = 1e-8;

/// Packs an arbitrary list of `(bone index, weight)` pairs into four slots.
///
/// Keeps the four heaviest entries (equal weights keep their input order),
/// rescales them to sum to 1 and zero-fills unused slots. Empty or
/// effectively weightless input yields [`PackedInfluence4::DEFAULT`]. Never
/// fails.
#[must_use]
pub fn normalize_influences(influences: &[(u32, f32)]) -> PackedInfluence4 {
    normalize_influences_with_limit(influences, MAX_BONE_INFLUENCES)
}

/// [`normalize_influences`] keeping at most `limit` entries (clamped to
/// `1..=4`). The output is still four slots wide.
#[must_use]
pub fn normalize_influences_with_limit(influences: &[(u32, f32)], limit: usize) -> PackedInfluence4 {
    if influences.is_empty() {
        return PackedInfluence4::DEFAULT;
    }

    // NaN and infinities count as no weight; `+ 0.0` folds -0.0 into 0.0 so
    // equal weights compare equal under total_cmp.
    let mut sorted: SmallVec<[(u32, f32); 8]> = influences
        .iter()
        .map(|&(joint, weight)| (joint, if weight.is_finite() { weight + 0.0 } else { 0.0 }))
        .collect();

    // Stable: ties keep input order.
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted.truncate(limit.clamp(1, MAX_BONE_INFLUENCES));

    let sum: f32 = sorted.iter().map(|&(_, weight)| weight).sum();
    if sum <= MIN_WEIGHT_SUM {
        return PackedInfluence4::DEFAULT;
    }

    let mut packed = PackedInfluence4 {
        joints: [0; MAX_BONE_INFLUENCES],
        weights: [0.0; MAX_BONE_INFLUENCES],
    };
    for (slot, &(joint, weight)) in sorted.iter().enumerate() {
        // Joints past u16 cannot be addressed by the vertex format.
        packed.joints[slot] = u16::try_from(joint).unwrap_or(0);
        packed.weights[slot] = weight / sum;
    }
    packed
}
