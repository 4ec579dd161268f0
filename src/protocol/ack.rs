//! Command acknowledgements (radar → host, solicited).
//!
//! Wire layout:
//! ```text
//! FD FC FB FA  LEN_LO LEN_HI  ACK_LO ACK_HI  STATUS_LO STATUS_HI  PAYLOAD...  04 03 02 01
//! ```
//! The ack word is the command word with bit 8 set. Status 0 means success.

use std::fmt;

use crate::codec;
use crate::error::{Result, WireError};
use crate::frame::COMMAND_HEADER;

/// Bit set in the ack word of every command response.
pub const ACK_BIT: u16 = 0x0100;

/// Decoded command response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAck {
    /// Ack word as sent by the radar (command word | 0x0100).
    pub ack_word: u16,
    /// 0 = success, anything else = failure.
    pub status: u16,
    /// Bytes after the status word, excluding the tail.
    pub payload: Vec<u8>,
}

impl CommandAck {
    /// Decode a response as returned by
    /// [`FrameBuffer::decode_command_response`](crate::frame::FrameBuffer::decode_command_response).
    ///
    /// The response may carry leading bytes from before the command header
    /// (report frames, noise); decoding starts at the last header.
    pub fn decode(response: &[u8]) -> Result<Self> {
        let start = response
            .windows(COMMAND_HEADER.len())
            .rposition(|w| w == COMMAND_HEADER)
            .ok_or(WireError::MissingCommandHeader { raw: Vec::new() })
            .map_err(|e| e.with_raw(response))?;
        let frame = &response[start..];

        let len = usize::from(codec::read_u16_le(frame, 4).map_err(|e| e.with_raw(frame))?);
        if len < 4 {
            return Err(WireError::response_too_short("CommandAck", 4, len).with_raw(frame));
        }
        let need = 6 + len + 4;
        if frame.len() < need {
            return Err(WireError::response_too_short("CommandAck", need, frame.len()).with_raw(frame));
        }

        Ok(Self {
            ack_word: codec::read_u16_le(frame, 6)?,
            status: codec::read_u16_le(frame, 8)?,
            payload: frame[10..6 + len].to_vec(),
        })
    }

    /// The command word this ack answers.
    pub fn command_word(&self) -> u16 {
        self.ack_word & !ACK_BIT
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Firmware version from the 0x00A0 ack payload (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub firmware_type: u16,
    /// High byte = major, low byte = minor (displayed as hex).
    pub major: u16,
    /// Build stamp (displayed as hex).
    pub minor: u32,
}

impl FirmwareVersion {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() < 8 {
            return Err(WireError::response_too_short("FirmwareVersion", 8, payload.len()));
        }
        Ok(Self {
            firmware_type: codec::read_u16_le(payload, 0)?,
            major: codec::read_u16_le(payload, 2)?,
            minor: codec::read_u32_le(payload, 4)?,
        })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}.{:02x}.{:08x}", self.major >> 8, self.major & 0xFF, self.minor)
    }
}

/// Bluetooth MAC address from the 0x00A5 ack payload (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() < 6 {
            return Err(WireError::response_too_short("MacAddress", 6, payload.len()));
        }
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&payload[..6]);
        Ok(Self(mac))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRMWARE_ACK: [u8; 22] = [
        0xFD, 0xFC, 0xFB, 0xFA, 0x0C, 0x00, 0xA0, 0x01, 0x00, 0x00, 0x00, 0x01, 0x07, 0x01,
        0x16, 0x15, 0x09, 0x22, 0x04, 0x03, 0x02, 0x01,
    ];

    #[test]
    fn decode_firmware_ack() {
        let ack = CommandAck::decode(&FIRMWARE_ACK).unwrap();
        assert_eq!(ack.ack_word, 0x01A0);
        assert_eq!(ack.command_word(), 0x00A0);
        assert!(ack.is_success());
        let version = FirmwareVersion::decode(&ack.payload).unwrap();
        assert_eq!(version.to_string(), "V1.07.22091516");
    }

    #[test]
    fn decode_mac_ack() {
        let wire = [
            0xFD, 0xFC, 0xFB, 0xFA, 0x0A, 0x00, 0xA5, 0x01, 0x00, 0x00, 0x8F, 0x27, 0x2E, 0xB8,
            0x0F, 0x65, 0x04, 0x03, 0x02, 0x01,
        ];
        let ack = CommandAck::decode(&wire).unwrap();
        let mac = MacAddress::decode(&ack.payload).unwrap();
        assert_eq!(mac.to_string(), "8F:27:2E:B8:0F:65");
    }

    #[test]
    fn leading_bytes_are_skipped() {
        let mut wire = vec![0xAA, 0xFF, 0x03, 0x00, 0x12, 0x34];
        wire.extend_from_slice(&FIRMWARE_ACK);
        let ack = CommandAck::decode(&wire).unwrap();
        assert_eq!(ack.command_word(), 0x00A0);
    }

    #[test]
    fn failure_status() {
        let wire = [
            0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xA1, 0x01, 0x01, 0x00, 0x04, 0x03, 0x02, 0x01,
        ];
        let ack = CommandAck::decode(&wire).unwrap();
        assert!(!ack.is_success());
        assert!(ack.payload.is_empty());
    }

    #[test]
    fn missing_header() {
        assert!(matches!(
            CommandAck::decode(&[0x04, 0x03, 0x02, 0x01]),
            Err(WireError::MissingCommandHeader { .. })
        ));
    }

    #[test]
    fn truncated_ack() {
        let wire = [0xFD, 0xFC, 0xFB, 0xFA, 0x0C, 0x00, 0xA0, 0x01, 0x04, 0x03, 0x02, 0x01];
        assert!(matches!(
            CommandAck::decode(&wire),
            Err(WireError::ResponseTooShort { need: 22, got: 12, .. })
        ));
    }
}
