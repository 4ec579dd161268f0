//! Fixed-effort drive with an obstacle shield.
//!
//! Drives both wheels at caller-chosen efforts until the left encoder has
//! covered the requested distance. A reading inside the stopping range is
//! re-checked after a short delay before it ends the drive, and readings at
//! or below the noise floor never count.

use super::{Robot, TargetSource, closest_target};
use crate::clock::Clock;
use crate::config::SafetyDriveConfig;
use crate::drive::Drivetrain;
use crate::sink::LogSink;

/// Range the stopping threshold can be dialed to (cm).
pub const MIN_THRESHOLD: f64 = 2.0;
pub const MAX_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SafetyStop {
    Reached,
    /// Confirmed obstacle at `distance` cm.
    Obstacle { distance: f64 },
    TimedOut,
}

pub struct SafetyDrive {
    config: SafetyDriveConfig,
}

impl SafetyDrive {
    pub fn new(config: SafetyDriveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SafetyDriveConfig {
        &self.config
    }

    /// Change the stopping range, e.g. from an operator dial. Clamped to
    /// [`MIN_THRESHOLD`]`..=`[`MAX_THRESHOLD`].
    pub fn set_threshold(&mut self, threshold: f64) {
        self.config.threshold = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    }

    /// Drive at `(left, right)` until `|target_distance|` cm is covered.
    pub fn run<D, S, C, L>(
        &self,
        robot: &mut Robot<D, S, C, L>,
        left: f64,
        right: f64,
        target_distance: f64,
    ) -> SafetyStop
    where
        D: Drivetrain,
        S: TargetSource,
        C: Clock,
        L: LogSink,
    {
        let cfg = &self.config;
        let target = target_distance.abs();
        robot.log.log("Drive command received...");
        robot.drive.reset_positions();
        let start = robot.clock.now();
        robot.drive.set_effort(left, right);

        let stop = loop {
            let moved = robot.drive.left_position().abs();
            if moved >= target {
                robot.log.log(&format!("Target reached: {moved:.1}"));
                break SafetyStop::Reached;
            }

            if let Some(d) = self.obstacle_distance(&mut robot.radar) {
                log::debug!("possible obstacle at {d:.1} cm, confirming");
                robot.clock.sleep(cfg.confirm_delay());
                if let Some(d) = self.obstacle_distance(&mut robot.radar) {
                    robot
                        .log
                        .log(&format!("REAL Obstacle at {d:.1}cm. Stopping."));
                    break SafetyStop::Obstacle { distance: d };
                }
            }

            if robot.clock.since(start) > cfg.timeout() {
                robot.log.log("Drive timed out.");
                break SafetyStop::TimedOut;
            }
            robot.clock.sleep(cfg.tick());
        };

        robot.drive.stop();
        stop
    }

    /// Closest distance if it falls inside the stopping range.
    fn obstacle_distance<S: TargetSource>(&self, radar: &mut S) -> Option<f64> {
        closest_target(radar)
            .map(|t| t.distance())
            .filter(|d| self.config.is_obstacle(*d))
    }
}
