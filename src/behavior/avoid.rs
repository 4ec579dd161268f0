//! Drive a fixed distance, turning away from obstacles.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::{Robot, TargetSource, closest_target, is_cancelled};
use crate::clock::Clock;
use crate::config::AvoiderConfig;
use crate::drive::{self, Drivetrain};
use crate::sink::LogSink;

/// Which way an avoidance turn spins the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// Wheel efforts for an in-place turn at `effort`.
    pub fn efforts(self, effort: f64) -> (f64, f64) {
        match self {
            TurnDirection::Left => (-effort, effort),
            TurnDirection::Right => (effort, -effort),
        }
    }
}

/// Coin flip for the avoidance turn.
pub trait RandomSource {
    fn turn_right(&mut self) -> bool;

    fn turn_direction(&mut self) -> TurnDirection {
        if self.turn_right() {
            TurnDirection::Right
        } else {
            TurnDirection::Left
        }
    }
}

/// Uniform choice from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn turn_right(&mut self) -> bool {
        use rand::Rng;
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Always turns the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedTurn(pub TurnDirection);

impl RandomSource for FixedTurn {
    fn turn_right(&mut self) -> bool {
        self.0 == TurnDirection::Right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvoidPhase {
    Driving,
    Avoiding,
    Done,
}

/// Why the avoider stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvoidCompletion {
    Reached,
    TimedOut,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidOutcome {
    pub completion: AvoidCompletion,
    /// Average absolute encoder travel at exit (cm)
    pub traveled: f64,
    pub forward_ticks: u32,
    pub avoidances: u32,
}

pub struct ObstacleAvoider<R = ThreadRandom> {
    config: AvoiderConfig,
    random: R,
    cancel: Option<Arc<AtomicBool>>,
}

impl ObstacleAvoider<ThreadRandom> {
    pub fn new(config: AvoiderConfig) -> Self {
        Self::with_random(config, ThreadRandom)
    }
}

impl<R: RandomSource> ObstacleAvoider<R> {
    pub fn with_random(config: AvoiderConfig, random: R) -> Self {
        Self {
            config,
            random,
            cancel: None,
        }
    }

    /// Stop at the next tick boundary once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &AvoiderConfig {
        &self.config
    }

    /// Drive until the target distance is covered, the timeout expires, or
    /// the run is cancelled.
    pub fn run<D, S, C, L>(&mut self, robot: &mut Robot<D, S, C, L>) -> AvoidOutcome
    where
        D: Drivetrain,
        S: TargetSource,
        C: Clock,
        L: LogSink,
    {
        let cfg = &self.config;
        robot
            .log
            .log(&format!("Starting {:.0} cm obstacle avoid...", cfg.target_distance));
        robot.drive.reset_positions();
        let start = robot.clock.now();

        let mut outcome = AvoidOutcome {
            completion: AvoidCompletion::Reached,
            traveled: 0.0,
            forward_ticks: 0,
            avoidances: 0,
        };
        let mut phase = if cfg.target_distance > 0.0 {
            AvoidPhase::Driving
        } else {
            AvoidPhase::Done
        };

        while phase != AvoidPhase::Done {
            phase = match phase {
                AvoidPhase::Driving => {
                    if robot.clock.since(start) > cfg.max_time() {
                        robot.log.log("Timeout reached. Stopping.");
                        outcome.completion = AvoidCompletion::TimedOut;
                        break;
                    }
                    if is_cancelled(self.cancel.as_ref()) {
                        robot.log.log("Cancelled. Stopping.");
                        outcome.completion = AvoidCompletion::Cancelled;
                        break;
                    }

                    match closest_target(&mut robot.radar).map(|t| t.distance()) {
                        Some(d) if d < cfg.avoid_threshold => {
                            robot.log.log(&format!("Obstacle at {d:.1} cm - avoiding..."));
                            AvoidPhase::Avoiding
                        }
                        _ => {
                            robot.drive.set_effort(cfg.forward_effort, cfg.forward_effort);
                            robot.clock.sleep(cfg.tick());
                            outcome.forward_ticks += 1;
                            self.update_traveled(robot, &mut outcome)
                        }
                    }
                }
                AvoidPhase::Avoiding => {
                    robot.drive.stop();
                    let direction = self.random.turn_direction();
                    log::debug!("avoidance turn {direction:?}");
                    let (left, right) = direction.efforts(cfg.turn_effort);
                    robot.drive.set_effort(left, right);
                    robot.clock.sleep(cfg.turn_time());
                    robot.drive.stop();
                    outcome.avoidances += 1;
                    self.update_traveled(robot, &mut outcome)
                }
                AvoidPhase::Done => AvoidPhase::Done,
            };
        }

        robot.drive.stop();
        if outcome.completion == AvoidCompletion::Reached {
            robot.log.log("Destination reached.");
        }
        outcome
    }

    fn update_traveled<D, S, C, L>(
        &self,
        robot: &mut Robot<D, S, C, L>,
        outcome: &mut AvoidOutcome,
    ) -> AvoidPhase
    where
        D: Drivetrain,
        L: LogSink,
    {
        outcome.traveled = drive::traveled(&robot.drive);
        robot.log.log(&format!("Traveled: {:.1} cm", outcome.traveled));
        if outcome.traveled >= self.config.target_distance {
            AvoidPhase::Done
        } else {
            AvoidPhase::Driving
        }
    }
}
