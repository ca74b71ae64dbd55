use std::time::Duration;

use bevy::prelude::*;
use thiserror::Error;

use crate::common::components::history::{OverflowPolicy, MAX_HISTORY};

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("day duration must be positive")]
    ZeroDayDuration,
    #[error("sampling interval must be positive")]
    ZeroSamplingInterval,
    #[error("rewind multiplier must be a finite number above 1, got {0}")]
    RewindMultiplier(f32),
    #[error("history cap must be at least 1")]
    ZeroHistory,
    #[error("frame delta clamp must be positive")]
    ZeroFrameClamp,
}

/// Tuning for the day clock and recordable actors
#[derive(Clone, Debug, Resource)]
pub struct RewindConfig {
    /// Master switch; a disabled clock never advances, records or rewinds
    pub enabled: bool,
    /// Length of one in-game day
    pub day_duration: Duration,
    /// Time between recordings during normal play
    pub sampling_interval: Duration,
    /// How much faster playback runs than recording
    pub rewind_multiplier: f32,
    /// Cap on snapshots per actor
    pub max_history: usize,
    pub overflow: OverflowPolicy,
    /// Frame deltas above this are clamped (stalls, breakpoints, window drags)
    pub max_frame_delta: Duration,
    /// Held to rewind (default: left shift)
    pub rewind_key: KeyCode,
    pub left_keys: [KeyCode; 2],
    pub right_keys: [KeyCode; 2],
    /// Player walking speed in world units per second
    pub walk_speed: f32,
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            day_duration: Duration::from_secs(15),
            sampling_interval: Duration::from_millis(250),
            rewind_multiplier: 8.,
            max_history: MAX_HISTORY,
            overflow: OverflowPolicy::KeepOldest,
            max_frame_delta: Duration::from_millis(250),
            rewind_key: KeyCode::ShiftLeft,
            left_keys: [KeyCode::ArrowLeft, KeyCode::KeyA],
            right_keys: [KeyCode::ArrowRight, KeyCode::KeyD],
            walk_speed: 175. * 1.35,
        }
    }
}

impl RewindConfig {
    /// Negative, NaN and unrepresentable lengths become a zero-length day,
    /// which [`RewindConfig::validate`] rejects.
    pub fn with_day_minutes(self, minutes: f32) -> Self {
        let day_duration = Duration::try_from_secs_f32(minutes.max(0.) * 60.).unwrap_or(Duration::ZERO);
        self.with_day_duration(day_duration)
    }

    pub fn with_day_duration(mut self, day_duration: Duration) -> Self {
        self.day_duration = day_duration;
        self
    }

    pub fn with_sampling_interval(mut self, sampling_interval: Duration) -> Self {
        self.sampling_interval = sampling_interval;
        self
    }

    pub fn with_rewind_multiplier(mut self, rewind_multiplier: f32) -> Self {
        self.rewind_multiplier = rewind_multiplier;
        self
    }

    pub fn with_history(mut self, max_history: usize, overflow: OverflowPolicy) -> Self {
        self.max_history = max_history;
        self.overflow = overflow;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_duration.is_zero() {
            return Err(ConfigError::ZeroDayDuration);
        }
        if self.sampling_interval.is_zero() {
            return Err(ConfigError::ZeroSamplingInterval);
        }
        if !self.rewind_multiplier.is_finite() || self.rewind_multiplier <= 1. {
            return Err(ConfigError::RewindMultiplier(self.rewind_multiplier));
        }
        if self.max_history == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        if self.max_frame_delta.is_zero() {
            return Err(ConfigError::ZeroFrameClamp);
        }
        Ok(())
    }

    /// Interval between playback steps on each actor: recording cadence
    /// divided by the rewind multiplier.
    pub fn rewind_step(&self) -> Duration {
        self.sampling_interval.div_f64(f64::from(self.rewind_multiplier))
    }

    /// Clamp a raw frame delta to the configured maximum.
    pub fn clamp_delta(&self, dt: Duration) -> Duration {
        dt.min(self.max_frame_delta)
    }
}

/// Convert raw milliseconds into a frame delta; negative and NaN become zero.
pub fn delta_from_millis(ms: f64) -> Duration {
    if ms > 0. {
        // float to int casts saturate, so +inf lands on the largest delta
        Duration::from_nanos((ms * 1_000_000.).round() as u64)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RewindConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.day_duration, Duration::from_secs(15));
        assert_eq!(config.max_history, 1000);
    }

    #[test]
    fn test_day_minutes_matches_quarter_minute_day() {
        let config = RewindConfig::default().with_day_minutes(0.25);
        assert_eq!(config.day_duration, Duration::from_secs(15));
    }

    #[test]
    fn test_day_minutes_out_of_range_is_rejected() {
        for minutes in [f32::INFINITY, f32::MAX, f32::NAN, -3.] {
            let config = RewindConfig::default().with_day_minutes(minutes);
            assert_eq!(config.day_duration, Duration::ZERO, "{minutes}");
            assert_eq!(config.validate(), Err(ConfigError::ZeroDayDuration));
        }
    }

    #[test]
    fn test_rewind_step_divides_interval() {
        let config = RewindConfig::default();
        assert_eq!(config.rewind_step(), Duration::from_micros(31_250));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = RewindConfig::default();

        assert_eq!(
            base.clone().with_day_duration(Duration::ZERO).validate(),
            Err(ConfigError::ZeroDayDuration)
        );
        assert_eq!(
            base.clone().with_sampling_interval(Duration::ZERO).validate(),
            Err(ConfigError::ZeroSamplingInterval)
        );
        assert_eq!(
            base.clone().with_rewind_multiplier(1.).validate(),
            Err(ConfigError::RewindMultiplier(1.))
        );
        assert!(base.clone().with_rewind_multiplier(f32::NAN).validate().is_err());
        assert_eq!(
            base.clone().with_history(0, OverflowPolicy::KeepOldest).validate(),
            Err(ConfigError::ZeroHistory)
        );

        let mut no_clamp = base;
        no_clamp.max_frame_delta = Duration::ZERO;
        assert_eq!(no_clamp.validate(), Err(ConfigError::ZeroFrameClamp));
    }

    #[test]
    fn test_clamp_delta() {
        let config = RewindConfig::default();
        assert_eq!(config.clamp_delta(Duration::from_millis(16)), Duration::from_millis(16));
        assert_eq!(config.clamp_delta(Duration::from_secs(30)), Duration::from_millis(250));
    }

    #[test]
    fn test_delta_from_millis_clamps_negative() {
        assert_eq!(delta_from_millis(-50.), Duration::ZERO);
        assert_eq!(delta_from_millis(f64::NAN), Duration::ZERO);
        assert_eq!(delta_from_millis(f64::NEG_INFINITY), Duration::ZERO);
        assert_eq!(delta_from_millis(100.), Duration::from_millis(100));
    }
}
