//! Message types and command encode dispatch.
//!
//! - [`Command`]: configuration commands we send to the radar (host → LD2450)
//! - [`report::Report`]: unsolicited target reports (LD2450 → host)
//! - [`ack::CommandAck`]: solicited command responses (LD2450 → host)
//!
//! Most commands are only honored between
//! [`Command::EnableConfiguration`] and [`Command::EndConfiguration`]; the
//! tracking-mode commands are accepted at any time. See
//! [`seq::configure`](crate::seq::configure) for the bracketed form.

pub mod ack;
pub mod baud;
pub mod report;

use crate::frame::encode_command;

pub use baud::BaudRate;

// ---------------------------------------------------------------------------
// Command word constants
// ---------------------------------------------------------------------------

pub const CMD_ENABLE_CONFIGURATION: u16 = 0x00FF;
pub const CMD_END_CONFIGURATION: u16 = 0x00FE;
pub const CMD_SINGLE_TARGET: u16 = 0x0080;
pub const CMD_MULTI_TARGET: u16 = 0x0090;
pub const CMD_QUERY_TRACKING: u16 = 0x0091;
pub const CMD_READ_FIRMWARE: u16 = 0x00A0;
pub const CMD_SET_BAUD_RATE: u16 = 0x00A1;
pub const CMD_FACTORY_RESET: u16 = 0x00A2;
pub const CMD_RESTART: u16 = 0x00A3;
pub const CMD_BLUETOOTH: u16 = 0x00A4;
pub const CMD_MAC_ADDRESS: u16 = 0x00A5;

/// Target tracking mode reported by the 0x0091 query ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    Single,
    Multi,
}

impl TrackingMode {
    pub fn from_word(word: u16) -> Option<Self> {
        match word {
            0x0001 => Some(Self::Single),
            0x0002 => Some(Self::Multi),
            _ => None,
        }
    }

    /// The command that switches the radar into this mode.
    pub fn command(self) -> Command {
        match self {
            Self::Single => Command::SingleTargetTracking,
            Self::Multi => Command::MultiTargetTracking,
        }
    }
}

// ---------------------------------------------------------------------------
// Command: messages we send to the radar
// ---------------------------------------------------------------------------

/// A configuration command (host → radar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    EnableConfiguration,
    EndConfiguration,
    SingleTargetTracking,
    MultiTargetTracking,
    QueryTracking,
    ReadFirmwareVersion,
    /// Takes effect after [`Command::Restart`].
    SetBaudRate(BaudRate),
    RestoreFactorySettings,
    Restart,
    Bluetooth { enabled: bool },
    QueryMacAddress,
}

impl Command {
    pub fn command_word(&self) -> u16 {
        match self {
            Command::EnableConfiguration => CMD_ENABLE_CONFIGURATION,
            Command::EndConfiguration => CMD_END_CONFIGURATION,
            Command::SingleTargetTracking => CMD_SINGLE_TARGET,
            Command::MultiTargetTracking => CMD_MULTI_TARGET,
            Command::QueryTracking => CMD_QUERY_TRACKING,
            Command::ReadFirmwareVersion => CMD_READ_FIRMWARE,
            Command::SetBaudRate(_) => CMD_SET_BAUD_RATE,
            Command::RestoreFactorySettings => CMD_FACTORY_RESET,
            Command::Restart => CMD_RESTART,
            Command::Bluetooth { .. } => CMD_BLUETOOTH,
            Command::QueryMacAddress => CMD_MAC_ADDRESS,
        }
    }

    /// Command value bytes following the command word.
    pub fn value(&self) -> Vec<u8> {
        match self {
            Command::EnableConfiguration | Command::QueryMacAddress => vec![0x01, 0x00],
            Command::SetBaudRate(baud) => baud.index().to_le_bytes().to_vec(),
            Command::Bluetooth { enabled } => vec![u8::from(*enabled), 0x00],
            _ => vec![],
        }
    }

    /// Encode into a complete command frame ready for the wire.
    pub fn encode(&self) -> Vec<u8> {
        let value = self.value();
        // Length field covers the command word plus the value.
        let len = (2 + value.len()) as u16;
        encode_command(len, self.command_word(), &value)
    }

    /// Format as a hex debug line: `"HOST→RADAR 0x00A1 4B | FDFCFBFA..."`.
    pub fn debug_hex(&self) -> String {
        let wire = self.encode();
        let mut s = format!("HOST→RADAR 0x{:04X} {}B | ", self.command_word(), wire.len());
        for b in &wire {
            s.push_str(&format!("{b:02X}"));
        }
        s
    }
}
