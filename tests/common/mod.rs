//! Simulated clock and drivetrain shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use ld2450::protocol::report::{Report, Target};
use ld2450::{Clock, Drivetrain};

/// Simulated time. Sleeping advances `now` and then runs the hook, which
/// tests use to feed the radar its next frame.
#[derive(Default)]
pub struct SimClock {
    pub now: Duration,
    pub on_sleep: Option<Box<dyn FnMut(Duration)>>,
}

impl SimClock {
    pub fn with_hook(hook: impl FnMut(Duration) + 'static) -> Self {
        Self {
            now: Duration::ZERO,
            on_sleep: Some(Box::new(hook)),
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        if let Some(hook) = self.on_sleep.as_mut() {
            hook(self.now);
        }
    }
}

/// Encoders advance `cm_per_tick` on every forward effort command. Other
/// commands move each wheel `cm_per_turn` the way its effort points.
#[derive(Default)]
pub struct SimDrive {
    pub efforts: Vec<(f64, f64)>,
    pub left: f64,
    pub right: f64,
    pub cm_per_tick: f64,
    pub cm_per_turn: f64,
}

impl SimDrive {
    pub fn new(cm_per_tick: f64) -> Self {
        Self {
            cm_per_tick,
            ..Default::default()
        }
    }

    pub fn turning(self, cm_per_turn: f64) -> Self {
        Self {
            cm_per_turn,
            ..self
        }
    }
}

impl Drivetrain for SimDrive {
    fn set_effort(&mut self, left: f64, right: f64) {
        self.efforts.push((left, right));
        if left > 0.0 && right > 0.0 {
            self.left += self.cm_per_tick;
            self.right += self.cm_per_tick;
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
    }
}

fn direction(effort: f64) -> f64 {
    if effort == 0.0 { 0.0 } else { effort.signum() }
}

/// Report frame with one target at `(x, y)` cm in the first slot.
pub fn frame_at(x: f64, y: f64) -> Vec<u8> {
    let mut report = Report::default();
    report.targets[0] = Target {
        x,
        y,
        speed: 0.0,
        resolution: 36.0,
    };
    report.encode()
}
