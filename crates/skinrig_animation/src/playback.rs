//! Playhead to sample-time mapping.

/// How a playhead outside `[0, duration]` maps back into the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoopMode {
    /// Clamp into `[0, duration]`, holding the first or last pose.
    Once,
    /// Wrap into `[0, duration)`; reverse playback past zero wraps to the tail.
    #[default]
    Loop,
    /// Fold back and forth across `[0, duration]`.
    PingPong,
}

impl From<bool> for LoopMode {
    /// `true` is [`LoopMode::Loop`], `false` is [`LoopMode::Once`].
    fn from(looping: bool) -> Self {
        if looping { Self::Loop } else { Self::Once }
    }
}

impl LoopMode {
    #[inline]
    #[must_use]
    pub fn is_looping(self) -> bool {
        !matches!(self, Self::Once)
    }
}

/// Maps a free-running playhead `time` onto a sample time inside a clip of
/// length `duration`. The playhead itself is never modified.
///
/// A non-positive or non-finite duration always samples at 0.
#[must_use]
pub fn wrap_time(time: f32, duration: f32, mode: LoopMode) -> f32 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }

    match mode {
        LoopMode::Once => time.clamp(0.0, duration),
        LoopMode::Loop => {
            let mut wrapped = time % duration;
            if wrapped < 0.0 {
                wrapped += duration;
            }
            // -tiny + duration can round up to duration itself.
            if wrapped >= duration { 0.0 } else { wrapped }
        }
        LoopMode::PingPong => {
            let period = duration * 2.0;
            let mut t = time % period;
            if t < 0.0 {
                t += period;
            }
            if t > duration { period - t } else { t }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_wraps_forward_and_backward() {
        assert!((wrap_time(1.5, 1.0, LoopMode::Loop) - 0.5).abs() < 1e-6);
        assert!((wrap_time(-0.25, 1.0, LoopMode::Loop) - 0.75).abs() < 1e-6);
        assert!(wrap_time(-1e-9, 1.0, LoopMode::Loop) < 1.0);
    }

    #[test]
    fn once_clamps() {
        assert!((wrap_time(1.5, 1.0, LoopMode::Once) - 1.0).abs() < 1e-6);
        assert!(wrap_time(-3.0, 1.0, LoopMode::Once).abs() < 1e-6);
    }

    #[test]
    fn ping_pong_folds() {
        assert!((wrap_time(1.25, 1.0, LoopMode::PingPong) - 0.75).abs() < 1e-6);
        assert!((wrap_time(2.25, 1.0, LoopMode::PingPong) - 0.25).abs() < 1e-6);
        assert!((wrap_time(-0.25, 1.0, LoopMode::PingPong) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_samples_at_zero() {
        assert_eq!(wrap_time(3.0, 0.0, LoopMode::Loop), 0.0);
        assert_eq!(wrap_time(3.0, -1.0, LoopMode::Once), 0.0);
    }

    #[test]
    fn non_finite_duration_samples_at_zero() {
        for mode in [LoopMode::Once, LoopMode::Loop, LoopMode::PingPong] {
            assert_eq!(wrap_time(0.5, f32::NAN, mode), 0.0);
            assert_eq!(wrap_time(0.5, f32::INFINITY, mode), 0.0);
        }
    }

    #[test]
    fn loop_flag_maps_to_mode() {
        assert_eq!(LoopMode::from(true), LoopMode::Loop);
        assert_eq!(LoopMode::from(false), LoopMode::Once);
    }
}
