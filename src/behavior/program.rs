//! Canned drive programs.
//!
//! A [`Maneuver`] is a fixed list of [`Step`]s. Each drive step is one
//! [`SafetyDrive::run`]; a confirmed obstacle on any step ends the program
//! there, while a step that only times out lets the next one start.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::safety::{SafetyDrive, SafetyStop};
use super::{Robot, TargetSource};
use crate::clock::Clock;
use crate::drive::Drivetrain;
use crate::sink::LogSink;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Safety-drive at `(left, right)` effort for `distance` cm.
    Drive { left: f64, right: f64, distance: f64 },
    Pause(Duration),
}

const fn drive(left: f64, right: f64, distance: f64) -> Step {
    Step::Drive { left, right, distance }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Maneuver {
    Straight,
    Arc,
    PointTurn,
    Swing,
    WideArc,
    Square,
    /// Eight short legs, roughly a circle.
    Polygon,
    OutAndBack,
}

impl Maneuver {
    /// Menu order.
    pub const ALL: [Maneuver; 8] = [
        Maneuver::Straight,
        Maneuver::Arc,
        Maneuver::PointTurn,
        Maneuver::Swing,
        Maneuver::WideArc,
        Maneuver::Square,
        Maneuver::Polygon,
        Maneuver::OutAndBack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Maneuver::Straight => "straight",
            Maneuver::Arc => "arc",
            Maneuver::PointTurn => "point-turn",
            Maneuver::Swing => "swing",
            Maneuver::WideArc => "wide-arc",
            Maneuver::Square => "square",
            Maneuver::Polygon => "polygon",
            Maneuver::OutAndBack => "out-and-back",
        }
    }

    pub fn steps(self) -> Vec<Step> {
        match self {
            Maneuver::Straight => vec![drive(0.6, 0.6, 15.0)],
            Maneuver::Arc => vec![drive(0.4, 0.7, 12.0)],
            Maneuver::PointTurn => vec![drive(-0.5, 0.5, 5.0)],
            // Left wheel idle: progress is measured on it, so this leg
            // always ends on the drive timeout.
            Maneuver::Swing => vec![drive(0.0, 0.6, 8.0)],
            Maneuver::WideArc => vec![drive(0.5, 0.8, 40.0)],
            Maneuver::Square => legs(4, drive(0.6, 0.6, 10.0), drive(-0.5, 0.5, 4.8)),
            Maneuver::Polygon => legs(8, drive(0.6, 0.6, 6.0), drive(-0.5, 0.5, 2.4)),
            Maneuver::OutAndBack => vec![
                drive(0.7, 0.7, 8.0),
                Step::Pause(Duration::from_millis(500)),
                drive(-0.7, -0.7, -8.0),
            ],
        }
    }
}

fn legs(count: usize, forward: Step, pivot: Step) -> Vec<Step> {
    [forward, pivot].repeat(count)
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownManeuver(pub String);

impl fmt::Display for UnknownManeuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown maneuver {:?}", self.0)
    }
}

impl std::error::Error for UnknownManeuver {}

impl FromStr for Maneuver {
    type Err = UnknownManeuver;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Maneuver::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownManeuver(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgramOutcome {
    /// How each drive step that ran ended, in order.
    pub stops: Vec<SafetyStop>,
    /// Distance of the obstacle that cut the program short, if any.
    pub obstacle: Option<f64>,
}

impl ProgramOutcome {
    pub fn completed(&self) -> bool {
        self.obstacle.is_none()
    }
}

impl SafetyDrive {
    pub fn run_maneuver<D, S, C, L>(
        &self,
        robot: &mut Robot<D, S, C, L>,
        maneuver: Maneuver,
    ) -> ProgramOutcome
    where
        D: Drivetrain,
        S: TargetSource,
        C: Clock,
        L: LogSink,
    {
        robot.log.log(&format!("Program: {maneuver}"));
        self.run_steps(robot, &maneuver.steps())
    }

    /// Run `steps` in order until they are used up or an obstacle is confirmed.
    pub fn run_steps<D, S, C, L>(
        &self,
        robot: &mut Robot<D, S, C, L>,
        steps: &[Step],
    ) -> ProgramOutcome
    where
        D: Drivetrain,
        S: TargetSource,
        C: Clock,
        L: LogSink,
    {
        let mut outcome = ProgramOutcome::default();
        for step in steps {
            match *step {
                Step::Drive { left, right, distance } => {
                    let stop = self.run(robot, left, right, distance);
                    outcome.stops.push(stop);
                    if let SafetyStop::Obstacle { distance } = stop {
                        outcome.obstacle = Some(distance);
                        robot.log.log("Program aborted.");
                        return outcome;
                    }
                }
                Step::Pause(duration) => robot.clock.sleep(duration),
            }
        }
        robot.log.log("Program complete.");
        outcome
    }
}
