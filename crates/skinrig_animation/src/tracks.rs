use crate::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    #[default]
    Linear,
    /// Holds the left key until the next key time is reached.
    Step,
}

/// A single animation channel: parallel arrays of key times (seconds,
/// ascending) and key values.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Builds a linear track from `(time, value)` pairs.
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, T)>) -> Self {
        let (times, values) = keys.into_iter().unzip();
        Self::new(times, values, InterpolationMode::Linear)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), InterpolationMode::Linear)
    }

    /// Number of usable keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len().min(self.values.len())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time of the last key, if any.
    #[must_use]
    pub fn end_time(&self) -> Option<f32> {
        self.times[..self.len()].last().copied()
    }

    /// Samples the channel, or returns `fallback` unchanged when the track
    /// has no keys.
    #[inline]
    #[must_use]
    pub fn sample_or(&self, time: f32, fallback: T) -> T {
        self.sample(time).unwrap_or(fallback)
    }

    /// Samples the channel at `time`.
    ///
    /// Before the first key the first value is held, after the last key the
    /// last value is held; there is no extrapolation.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }

        let times = &self.times[..len];
        if len == 1 || time <= times[0] {
            return Some(self.values[0].finish());
        }
        if time >= times[len - 1] {
            return Some(self.values[len - 1].finish());
        }

        // First key with t >= time. The left key of the bracket is the one
        // before it, so times[index] < time <= times[next].
        let next = times.partition_point(|&t| t < time);
        if next == 0 || next >= len {
            // Only reachable with a NaN query time.
            return Some(self.values[len - 1].finish());
        }
        let index = next - 1;

        let t0 = times[index];
        let segment = times[next] - t0;
        let alpha = if segment > 0.0 {
            (time - t0) / segment
        } else {
            0.0
        };

        let value = match self.interpolation {
            InterpolationMode::Linear => {
                T::interpolate_linear(self.values[index], self.values[next], alpha)
            }
            InterpolationMode::Step if alpha >= 1.0 => self.values[next],
            InterpolationMode::Step => self.values[index],
        };
        Some(value.finish())
    }

    /// Index of the first key whose time is lower than its predecessor's.
    #[must_use]
    pub fn first_unsorted_key(&self) -> Option<usize> {
        self.times.windows(2).position(|w| w[1] < w[0]).map(|i| i + 1)
    }
}

impl<T: Interpolatable> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn empty_track_returns_fallback() {
        let track = KeyframeTrack::<Vec3>::empty();
        assert_eq!(track.sample(0.3), None);
        assert_eq!(track.sample_or(0.3, Vec3::splat(4.0)), Vec3::splat(4.0));
    }

    #[test]
    fn duplicate_key_time_uses_first_bracket() {
        let track = KeyframeTrack::from_keys([(0.0, 0.0_f32), (1.0, 10.0), (1.0, 20.0), (2.0, 30.0)]);
        assert!((track.sample_or(1.0, -1.0) - 10.0).abs() < 1e-6);
        assert!((track.sample_or(1.5, -1.0) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn nan_time_does_not_panic() {
        let track = KeyframeTrack::from_keys([(0.0, 1.0_f32), (1.0, 2.0)]);
        assert!(track.sample(f32::NAN).is_some());
    }

    #[test]
    fn single_rotation_key_is_normalized() {
        let track = KeyframeTrack::from_keys([(0.0, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0))]);
        let q = track.sample_or(5.0, Quat::IDENTITY);
        assert!((q.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_arrays_use_shorter_length() {
        let track = KeyframeTrack::new(vec![0.0, 1.0, 2.0], vec![1.0_f32, 3.0], InterpolationMode::Linear);
        assert_eq!(track.len(), 2);
        assert_eq!(track.end_time(), Some(1.0));
        assert!((track.sample_or(9.0, 0.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn detects_unsorted_keys() {
        let sorted = KeyframeTrack::from_keys([(0.0, 0.0_f32), (1.0, 1.0)]);
        let unsorted = KeyframeTrack::from_keys([(0.0, 0.0_f32), (2.0, 1.0), (1.0, 2.0)]);
        assert_eq!(sorted.first_unsorted_key(), None);
        assert_eq!(unsorted.first_unsorted_key(), Some(2));
    }
}
