//! Serial baud rates accepted by the radar's rate-change command.

use std::fmt;

use crate::error::WireError;

/// The eight rates the radar supports. The wire value of the rate-change
/// command is the index into this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BaudRate {
    B9600 = 0,
    B19200 = 1,
    B38400 = 2,
    B57600 = 3,
    B115200 = 4,
    B230400 = 5,
    B256000 = 6,
    B460800 = 7,
}

impl BaudRate {
    pub const ALL: [BaudRate; 8] = [
        Self::B9600,
        Self::B19200,
        Self::B38400,
        Self::B57600,
        Self::B115200,
        Self::B230400,
        Self::B256000,
        Self::B460800,
    ];

    /// Factory default rate.
    pub const DEFAULT: BaudRate = Self::B256000;

    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::B9600 => 9600,
            Self::B19200 => 19200,
            Self::B38400 => 38400,
            Self::B57600 => 57600,
            Self::B115200 => 115_200,
            Self::B230400 => 230_400,
            Self::B256000 => 256_000,
            Self::B460800 => 460_800,
        }
    }

    /// Index sent in the rate-change command value.
    pub fn index(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = WireError;

    fn try_from(rate: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|b| b.bits_per_second() == rate)
            .ok_or(WireError::UnsupportedBaudRate { rate })
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits_per_second())
    }
}
