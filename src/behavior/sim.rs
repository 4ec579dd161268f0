//! Simulated collaborators for behavior unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use super::{Robot, TargetSource};
use crate::clock::Clock;
use crate::drive::Drivetrain;
use crate::protocol::report::{Report, Target};
use crate::session::SessionError;

/// Clock that only moves when slept.
#[derive(Default)]
pub struct StepClock {
    pub now: Duration,
    pub sleeps: Vec<Duration>,
}

impl Clock for StepClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.sleeps.push(duration);
    }
}

/// Records every effort command. Each command with both wheels driving
/// forward advances both encoders by `cm_per_forward`. Any other non-zero
/// command moves each wheel `cm_per_turn` in the direction of its effort.
#[derive(Default)]
pub struct SimDrive {
    pub efforts: Vec<(f64, f64)>,
    pub left: f64,
    pub right: f64,
    pub resets: usize,
    pub cm_per_forward: f64,
    pub cm_per_turn: f64,
}

impl SimDrive {
    pub fn advancing(cm_per_forward: f64) -> Self {
        Self { cm_per_forward, ..Default::default() }
    }

    pub fn turning(self, cm_per_turn: f64) -> Self {
        Self { cm_per_turn, ..self }
    }

    pub fn last_effort(&self) -> Option<(f64, f64)> {
        self.efforts.last().copied()
    }
}

impl Drivetrain for SimDrive {
    fn set_effort(&mut self, left: f64, right: f64) {
        self.efforts.push((left, right));
        if left > 0.0 && right > 0.0 {
            self.left += self.cm_per_forward;
            self.right += self.cm_per_forward;
        } else {
            self.left += direction(left) * self.cm_per_turn;
            self.right += direction(right) * self.cm_per_turn;
        }
    }

    fn left_position(&self) -> f64 {
        self.left
    }

    fn right_position(&self) -> f64 {
        self.right
    }

    fn reset_positions(&mut self) {
        self.left = 0.0;
        self.right = 0.0;
        self.resets += 1;
    }
}

fn direction(effort: f64) -> f64 {
    if effort > 0.0 {
        1.0
    } else if effort < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Plays back queued reports, then repeats `fallback` forever.
#[derive(Default)]
pub struct Scripted {
    pub queue: VecDeque<Option<Report>>,
    pub fallback: Option<Report>,
}

impl Scripted {
    /// A single target straight ahead at `distance`, every poll.
    pub fn fixed(distance: f64) -> Self {
        Self { queue: VecDeque::new(), fallback: Some(report_with(0.0, distance)) }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl TargetSource for Scripted {
    fn latest_report(&mut self) -> Result<Option<Report>, SessionError> {
        Ok(self.queue.pop_front().unwrap_or(self.fallback))
    }
}

pub fn report_with(x: f64, y: f64) -> Report {
    let mut report = Report::default();
    report.targets[0] = Target { x, y, speed: 0.0, resolution: 36.0 };
    report
}

pub fn robot(drive: SimDrive, radar: Scripted) -> Robot<SimDrive, Scripted, StepClock, Vec<String>> {
    Robot::new(drive, radar, StepClock::default(), Vec::new())
}
