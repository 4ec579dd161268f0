//! Behavior and port parameters.
//!
//! Every struct has a [`Default`] matching the robot's stock tuning. With the
//! `serde` feature they deserialize from partial documents; missing fields
//! keep their defaults.

use std::time::Duration;

use crate::protocol::BaudRate;
use crate::session::DEFAULT_DEVICE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Obstacle Avoider parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AvoiderConfig {
    /// Encoder distance to cover (cm)
    pub target_distance: f64,
    /// Obstacles closer than this trigger a turn (cm)
    pub avoid_threshold: f64,
    /// Give up after this long (s)
    pub max_time_secs: f64,
    pub forward_effort: f64,
    pub turn_effort: f64,
    /// Length of one avoidance turn (s)
    pub turn_time_secs: f64,
    pub tick_ms: u64,
}

impl Default for AvoiderConfig {
    fn default() -> Self {
        Self {
            target_distance: 500.0,
            avoid_threshold: 50.0,
            max_time_secs: 60.0,
            forward_effort: 0.6,
            turn_effort: 0.5,
            turn_time_secs: 1.0,
            tick_ms: 50,
        }
    }
}

impl AvoiderConfig {
    pub fn max_time(&self) -> Duration {
        secs(self.max_time_secs)
    }

    pub fn turn_time(&self) -> Duration {
        secs(self.turn_time_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Radar Follower parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FollowerConfig {
    /// Distance to hold from the target (cm)
    pub standoff: f64,
    /// Half-width of the dead band around `standoff` (cm)
    pub hysteresis: f64,
    pub max_time_secs: f64,
    pub base_effort: f64,
    /// Effort per cm of lateral offset
    pub steer_gain: f64,
    pub search_spin: f64,
    pub tick_ms: u64,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            standoff: 100.0,
            hysteresis: 5.0,
            max_time_secs: 30.0,
            base_effort: 0.5,
            steer_gain: 0.002,
            search_spin: 0.3,
            tick_ms: 50,
        }
    }
}

impl FollowerConfig {
    pub fn max_time(&self) -> Duration {
        secs(self.max_time_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Safety Drive parameters. Efforts and distance are per-call arguments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SafetyDriveConfig {
    /// Obstacles closer than this stop the drive (cm)
    pub threshold: f64,
    /// Readings at or below this are treated as sensor noise (cm)
    pub noise_floor: f64,
    /// Wait before re-reading a suspected obstacle
    pub confirm_delay_ms: u64,
    pub timeout_ms: u64,
    pub tick_ms: u64,
}

impl Default for SafetyDriveConfig {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            noise_floor: 10.0,
            confirm_delay_ms: 10,
            timeout_ms: 5000,
            tick_ms: 10,
        }
    }
}

impl SafetyDriveConfig {
    pub fn confirm_delay(&self) -> Duration {
        Duration::from_millis(self.confirm_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// True if `distance` is a real obstacle inside the stopping range.
    pub fn is_obstacle(&self, distance: f64) -> bool {
        self.noise_floor < distance && distance < self.threshold
    }
}

/// Serial port settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SerialConfig {
    pub device: String,
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_owned(),
            baud: BaudRate::DEFAULT.bits_per_second(),
        }
    }
}

impl SerialConfig {
    /// Validate `baud` against the radar's allow-list.
    pub fn baud_rate(&self) -> crate::error::Result<BaudRate> {
        BaudRate::try_from(self.baud)
    }
}

/// Negative or non-finite seconds become zero.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
