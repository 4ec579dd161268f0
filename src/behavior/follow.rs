//! Follow the nearest target at a standoff distance.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::{Robot, TargetSource, closest_target, is_cancelled};
use crate::clock::Clock;
use crate::config::FollowerConfig;
use crate::drive::Drivetrain;
use crate::protocol::report::Target;
use crate::sink::LogSink;

/// What one follower tick commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowAction {
    /// No target: spin in place.
    Search { left: f64, right: f64 },
    /// Too far: drive forward, steering toward the target.
    Approach { left: f64, right: f64 },
    /// Too close: reverse, steering away.
    BackAway { left: f64, right: f64 },
    /// Inside the dead band.
    Hold,
}

impl FollowAction {
    pub fn efforts(self) -> (f64, f64) {
        match self {
            FollowAction::Search { left, right }
            | FollowAction::Approach { left, right }
            | FollowAction::BackAway { left, right } => (left, right),
            FollowAction::Hold => (0.0, 0.0),
        }
    }
}

/// Decide the wheel efforts for one tick.
///
/// Positive `x` (target to the right) slows the left wheel when approaching.
pub fn follow_action(config: &FollowerConfig, target: Option<&Target>) -> FollowAction {
    let Some(target) = target else {
        return FollowAction::Search {
            left: config.search_spin,
            right: -config.search_spin,
        };
    };
    let distance = target.distance();
    let steer = config.steer_gain * target.x;
    if distance > config.standoff + config.hysteresis {
        FollowAction::Approach {
            left: (config.base_effort - steer).clamp(0.1, 1.0),
            right: (config.base_effort + steer).clamp(0.1, 1.0),
        }
    } else if distance < config.standoff - config.hysteresis {
        FollowAction::BackAway {
            left: (-config.base_effort + steer).clamp(-1.0, -0.1),
            right: (-config.base_effort - steer).clamp(-1.0, -0.1),
        }
    } else {
        FollowAction::Hold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowExit {
    TimedOut,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowSummary {
    pub exit: FollowExit,
    pub ticks: u32,
    pub ticks_with_target: u32,
}

pub struct RadarFollower {
    config: FollowerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl RadarFollower {
    pub fn new(config: FollowerConfig) -> Self {
        Self { config, cancel: None }
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    /// Track the nearest target until the timeout expires or the run is
    /// cancelled.
    pub fn run<D, S, C, L>(&mut self, robot: &mut Robot<D, S, C, L>) -> FollowSummary
    where
        D: Drivetrain,
        S: TargetSource,
        C: Clock,
        L: LogSink,
    {
        let cfg = &self.config;
        robot.log.log("Starting radar follow...");
        let start = robot.clock.now();
        let mut ticks = 0;
        let mut ticks_with_target = 0;

        let exit = loop {
            let target = closest_target(&mut robot.radar);

            if robot.clock.since(start) > cfg.max_time() {
                robot.log.log("Timeout reached. Stopping.");
                break FollowExit::TimedOut;
            }
            if is_cancelled(self.cancel.as_ref()) {
                robot.log.log("Cancelled. Stopping.");
                break FollowExit::Cancelled;
            }

            ticks += 1;
            let action = follow_action(cfg, target.as_ref());
            match action {
                FollowAction::Hold => robot.drive.stop(),
                _ => {
                    let (left, right) = action.efforts();
                    robot.drive.set_effort(left, right);
                }
            }

            match (action, target) {
                (FollowAction::Search { .. }, _) | (_, None) => {
                    robot.log.log("No target - searching...");
                }
                (FollowAction::Approach { .. }, Some(t)) => {
                    ticks_with_target += 1;
                    robot
                        .log
                        .log(&format!("Following: dist={:.1} cm, x={:.1}", t.distance(), t.x));
                }
                (FollowAction::BackAway { .. }, Some(t)) => {
                    ticks_with_target += 1;
                    robot
                        .log
                        .log(&format!("Backing away: dist={:.1} cm, x={:.1}", t.distance(), t.x));
                }
                (FollowAction::Hold, Some(t)) => {
                    ticks_with_target += 1;
                    robot
                        .log
                        .log(&format!("Maintaining distance: {:.1} cm", t.distance()));
                }
            }

            robot.clock.sleep(cfg.tick());
        };

        robot.drive.stop();
        robot.log.log("Radar follow complete.");
        FollowSummary { exit, ticks, ticks_with_target }
    }
}
