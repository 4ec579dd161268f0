//! Command/acknowledgement sequences.
//!
//! Free functions that drive request/response exchanges over a
//! [`RadarSession`]. Two layers:
//!
//! 1. **Core helpers**: [`recv_ack`] (poll until the ack for one command word
//!    arrives) and [`send_and_wait`] (send + recv_ack).
//! 2. **Sequence functions**: [`configure`] brackets a command in
//!    configuration mode; the query helpers decode the ack payloads.
//!
//! Reports keep streaming while a sequence runs. Any report frames that
//! precede an ack are folded into the response bytes and discarded.

use std::time::Duration;

use crate::clock::Clock;
use crate::protocol::ack::{CommandAck, FirmwareVersion, MacAddress};
use crate::protocol::{BaudRate, Command, TrackingMode};
use crate::session::{RadarSession, SessionError};
use crate::transport::Transport;

/// Per-exchange timeout.
pub const TIMEOUT: Duration = Duration::from_secs(1);

/// Gap between response polls while waiting for an ack.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Core helpers
// ---------------------------------------------------------------------------

/// Poll until the ack for `command_word` arrives.
///
/// Malformed responses and acks for other command words (late answers to an
/// earlier exchange) are skipped. A non-zero status is returned as
/// [`SessionError::Rejected`].
pub fn recv_ack<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    command_word: u16,
    timeout: Duration,
) -> Result<CommandAck, SessionError> {
    let start = clock.now();
    loop {
        while let Some(response) = radar.poll_response()? {
            let ack = match CommandAck::decode(&response) {
                Ok(ack) => ack,
                Err(e) => {
                    log::debug!("skipping malformed response: {e}");
                    continue;
                }
            };
            if ack.command_word() != command_word {
                log::debug!(
                    "skipping ack 0x{:04X} while waiting for 0x{command_word:04X}",
                    ack.ack_word
                );
                continue;
            }
            if !ack.is_success() {
                return Err(SessionError::Rejected {
                    command_word,
                    status: ack.status,
                });
            }
            return Ok(ack);
        }

        if clock.since(start) >= timeout {
            return Err(SessionError::Timeout { timeout });
        }
        clock.sleep(POLL_INTERVAL);
    }
}

/// Send a command, then wait for its ack.
pub fn send_and_wait<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    cmd: &Command,
    timeout: Duration,
) -> Result<CommandAck, SessionError> {
    radar.send(cmd)?;
    recv_ack(radar, clock, cmd.command_word(), timeout)
}

// ---------------------------------------------------------------------------
// Sequence functions
// ---------------------------------------------------------------------------

/// Run `cmd` inside configuration mode and return its ack.
///
/// Configuration mode is always closed again, even when `cmd` fails, except
/// after [`Command::Restart`]: the radar reboots and leaves configuration mode
/// on its own.
pub fn configure<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    cmd: &Command,
    timeout: Duration,
) -> Result<CommandAck, SessionError> {
    send_and_wait(radar, clock, &Command::EnableConfiguration, timeout)?;
    let result = send_and_wait(radar, clock, cmd, timeout);
    if *cmd == Command::Restart {
        return result;
    }
    let closed = send_and_wait(radar, clock, &Command::EndConfiguration, timeout);
    let ack = result?;
    closed?;
    Ok(ack)
}

pub fn read_firmware_version<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    timeout: Duration,
) -> Result<FirmwareVersion, SessionError> {
    let ack = configure(radar, clock, &Command::ReadFirmwareVersion, timeout)?;
    Ok(FirmwareVersion::decode(&ack.payload)?)
}

pub fn read_mac_address<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    timeout: Duration,
) -> Result<MacAddress, SessionError> {
    let ack = configure(radar, clock, &Command::QueryMacAddress, timeout)?;
    Ok(MacAddress::decode(&ack.payload)?)
}

/// Current tracking mode, or `None` if the radar reports an unknown word.
pub fn query_tracking_mode<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    timeout: Duration,
) -> Result<Option<TrackingMode>, SessionError> {
    let ack = configure(radar, clock, &Command::QueryTracking, timeout)?;
    let word = crate::codec::read_u16_le(&ack.payload, 0)?;
    Ok(TrackingMode::from_word(word))
}

pub fn set_tracking_mode<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    mode: TrackingMode,
    timeout: Duration,
) -> Result<(), SessionError> {
    configure(radar, clock, &mode.command(), timeout)?;
    Ok(())
}

/// Store a new serial rate. It applies after the next restart, at which point
/// the caller must reopen the port at `rate`.
pub fn change_baud_rate<T: Transport, C: Clock>(
    radar: &mut RadarSession<T>,
    clock: &mut C,
    rate: u32,
    timeout: Duration,
) -> Result<BaudRate, SessionError> {
    let baud = BaudRate::try_from(rate)?;
    configure(radar, clock, &Command::SetBaudRate(baud), timeout)?;
    Ok(baud)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
