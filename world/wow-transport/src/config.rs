//! Tunables for keyframe generation

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransportError};

/// Configuration used when a transport definition leaves a value unset
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct TransportConfig {
    /// Cruise speed in yards per second
    pub default_speed: f32,
    /// Acceleration in yards per second squared (0 = instant)
    pub default_accel_rate: f32,
    /// Lower bound applied to every stop frame's delay (milliseconds)
    pub min_stop_delay_ms: u32,
    /// Straight-line gap between consecutive nodes treated as a teleport
    pub teleport_distance: f32,
    /// Samples per spline segment used for arc-length tables
    pub spline_steps_per_segment: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            default_speed: 30.0,
            default_accel_rate: 1.0,
            min_stop_delay_ms: 0,
            teleport_distance: 1000.0,
            spline_steps_per_segment: 16,
        }
    }
}

impl TransportConfig {
    /// Check that every value is usable by the keyframe builder
    pub fn validate(&self) -> Result<()> {
        if !self.default_speed.is_finite() || self.default_speed <= 0.0 {
            return Err(TransportError::InvalidConfig(format!(
                "default speed must be positive, got {}",
                self.default_speed
            )));
        }
        if !self.default_accel_rate.is_finite() || self.default_accel_rate < 0.0 {
            return Err(TransportError::InvalidConfig(format!(
                "default acceleration must be non-negative, got {}",
                self.default_accel_rate
            )));
        }
        if !self.teleport_distance.is_finite() || self.teleport_distance <= 0.0 {
            return Err(TransportError::InvalidConfig(format!(
                "teleport distance must be positive, got {}",
                self.teleport_distance
            )));
        }
        if self.spline_steps_per_segment == 0 {
            return Err(TransportError::InvalidConfig(
                "spline steps per segment must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
