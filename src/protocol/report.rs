//! Target report frames (radar → host, unsolicited).
//!
//! Wire layout (30 bytes):
//! ```text
//! AA FF 03 00  [x y speed res] x 3  55 CC
//! ```
//! Each slot is four little-endian u16 fields. `x`, `y` and `speed` are
//! sign-magnitude; `res` (distance resolution) is unsigned.

use crate::codec;
use crate::error::{Result, WireError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Report frame start marker.
pub const REPORT_HEADER: [u8; 4] = [0xAA, 0xFF, 0x03, 0x00];
/// Report frame end marker.
pub const REPORT_TAIL: [u8; 2] = [0x55, 0xCC];
/// Complete report frame length including markers.
pub const REPORT_LEN: usize = 30;
/// Number of target slots carried by every report.
pub const SLOTS: usize = 3;

const SLOT_OFFSET: usize = 4;
const SLOT_LEN: usize = 8;
/// Raw x, y and resolution are in millimeters.
const MM_PER_CM: f64 = 10.0;

/// A single detected target.
///
/// Positions are in centimeters relative to the sensor: `x` is lateral
/// (positive to the right), `y` is forward range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Target {
    /// Lateral offset (cm)
    pub x: f64,
    /// Forward offset (cm)
    pub y: f64,
    /// Radial speed (cm/s, integral)
    pub speed: f64,
    /// Distance gate resolution (cm); zero marks an empty slot
    pub resolution: f64,
}

impl Target {
    /// Decode one 8-byte slot starting at `offset`.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self> {
        Ok(Self {
            x: codec::read_sign_magnitude_scaled(data, offset, MM_PER_CM)?,
            y: codec::read_sign_magnitude_scaled(data, offset + 2, MM_PER_CM)?,
            speed: f64::from(codec::read_sign_magnitude(data, offset + 4)?),
            resolution: codec::read_u16_scaled(data, offset + 6, MM_PER_CM)?,
        })
    }

    /// Append the 8-byte wire form of this target.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        codec::write_sign_magnitude(buf, (self.x * MM_PER_CM).round() as i32);
        codec::write_sign_magnitude(buf, (self.y * MM_PER_CM).round() as i32);
        codec::write_sign_magnitude(buf, self.speed.round() as i32);
        codec::write_u16_le(buf, (self.resolution * MM_PER_CM).round().clamp(0.0, 65535.0) as u16);
    }

    /// A slot holds a real detection only if it has a resolution and a
    /// non-origin position.
    pub fn is_valid(&self) -> bool {
        self.resolution > 0.0 && (self.x != 0.0 || self.y != 0.0)
    }

    /// Euclidean distance from the sensor (cm).
    pub fn distance(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// One decoded report frame: always exactly three slots in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Report {
    pub targets: [Target; SLOTS],
}

impl Report {
    /// Decode a complete 30-byte report frame (markers included).
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() != REPORT_LEN {
            return Err(WireError::UnexpectedLength {
                what: "Report",
                expected: REPORT_LEN,
                got: frame.len(),
            });
        }
        let mut targets = [Target::default(); SLOTS];
        for (i, slot) in targets.iter_mut().enumerate() {
            *slot = Target::decode(frame, SLOT_OFFSET + i * SLOT_LEN)?;
        }
        Ok(Self { targets })
    }

    /// Encode into a complete 30-byte frame. Used by simulators and tests.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(REPORT_LEN);
        buf.extend_from_slice(&REPORT_HEADER);
        for target in &self.targets {
            target.encode(&mut buf);
        }
        buf.extend_from_slice(&REPORT_TAIL);
        buf
    }

    /// Slots that carry a real detection, in wire order.
    pub fn valid_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.is_valid())
    }

    /// Closest valid target in this report.
    pub fn closest(&self) -> Option<Target> {
        crate::select::select_closest(&self.targets)
    }
}
