//! Radar-guided drive behaviors.
//!
//! Each behavior is a synchronous control loop that owns the robot for the
//! duration of its `run()` call:
//!
//! - [`avoid::ObstacleAvoider`]: drive a fixed distance, turning away from
//!   anything too close
//! - [`follow::RadarFollower`]: hold a standoff distance to the nearest target
//! - [`safety::SafetyDrive`]: drive with fixed efforts until an encoder
//!   distance is met, stopping on a confirmed obstacle
//! - [`program::Maneuver`]: canned sequences of Safety Drive legs
//!
//! All of them stop both wheels before returning, whatever the reason.

pub mod avoid;
pub mod follow;
pub mod program;
pub mod safety;

#[cfg(test)]
pub(crate) mod sim;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::protocol::report::{Report, Target};
use crate::session::{RadarSession, SessionError};
use crate::transport::Transport;

/// Anything that can hand a control loop the latest target report.
pub trait TargetSource {
    /// Most recent report since the last call, or `None` if nothing new
    /// arrived.
    fn latest_report(&mut self) -> Result<Option<Report>, SessionError>;
}

impl<T: Transport> TargetSource for RadarSession<T> {
    fn latest_report(&mut self) -> Result<Option<Report>, SessionError> {
        RadarSession::latest_report(self)
    }
}

impl<S: TargetSource + ?Sized> TargetSource for &mut S {
    fn latest_report(&mut self) -> Result<Option<Report>, SessionError> {
        (**self).latest_report()
    }
}

/// The collaborators a behavior drives.
pub struct Robot<D, S, C, L> {
    pub drive: D,
    pub radar: S,
    pub clock: C,
    pub log: L,
}

impl<D, S, C, L> Robot<D, S, C, L> {
    pub fn new(drive: D, radar: S, clock: C, log: L) -> Self {
        Self { drive, radar, clock, log }
    }
}

/// Closest valid target from the latest poll. Read failures count as "no
/// target" for this tick.
pub(crate) fn closest_target<S: TargetSource + ?Sized>(radar: &mut S) -> Option<Target> {
    match radar.latest_report() {
        Ok(report) => report.and_then(|r| r.closest()),
        Err(e) => {
            log::warn!("radar read failed: {e}");
            None
        }
    }
}

pub(crate) fn is_cancelled(cancel: Option<&Arc<AtomicBool>>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}
