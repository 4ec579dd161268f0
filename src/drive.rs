//! Differential-drive actuation consumed by the behaviors.

/// Two-wheel drivetrain with per-wheel encoders.
///
/// Efforts are normalized to `-1.0..=1.0`; positive drives forward. Positions
/// are relative distances in centimeters since the last
/// [`reset_positions`](Self::reset_positions).
pub trait Drivetrain {
    fn set_effort(&mut self, left: f64, right: f64);

    /// Stop both wheels.
    fn stop(&mut self) {
        self.set_effort(0.0, 0.0);
    }

    fn left_position(&self) -> f64;

    fn right_position(&self) -> f64;

    fn reset_positions(&mut self);
}

impl<D: Drivetrain + ?Sized> Drivetrain for &mut D {
    fn set_effort(&mut self, left: f64, right: f64) {
        (**self).set_effort(left, right);
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn left_position(&self) -> f64 {
        (**self).left_position()
    }

    fn right_position(&self) -> f64 {
        (**self).right_position()
    }

    fn reset_positions(&mut self) {
        (**self).reset_positions();
    }
}

/// Average absolute wheel travel (cm).
pub fn traveled<D: Drivetrain + ?Sized>(drive: &D) -> f64 {
    (drive.left_position().abs() + drive.right_position().abs()) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Wheels {
        effort: (f64, f64),
        left: f64,
        right: f64,
    }

    impl Drivetrain for Wheels {
        fn set_effort(&mut self, left: f64, right: f64) {
            self.effort = (left, right);
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

    #[test]
    fn default_stop_zeroes_efforts() {
        let mut wheels = Wheels { effort: (0.6, 0.6), ..Default::default() };
        wheels.stop();
        assert_eq!(wheels.effort, (0.0, 0.0));
    }

    #[test]
    fn traveled_averages_absolute_positions() {
        let wheels = Wheels { left: -10.0, right: 30.0, ..Default::default() };
        assert_eq!(traveled(&wheels), 20.0);
    }
}
