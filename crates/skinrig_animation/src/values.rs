use glam::{Quat, Vec3};

/// A value that a [`KeyframeTrack`](crate::KeyframeTrack) can interpolate.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Post-processing applied to every sampled value, including values
    /// returned straight from a key.
    #[inline]
    #[must_use]
    fn finish(self) -> Self {
        self
    }
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    // Keys drift off the unit sphere over long interpolation chains.
    #[inline]
    fn finish(self) -> Self {
        self.normalize()
    }
}
