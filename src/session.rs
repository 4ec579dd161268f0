//! Radar session over a byte transport.
//!
//! Handles transport I/O, the residual receive buffer, and command encoding.
//! No application logic. Callers drive timing and sequencing.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::error::WireError;
use crate::frame::FrameBuffer;
use crate::protocol::report::Report;
use crate::protocol::{BaudRate, Command};
use crate::transport::Transport;

#[cfg(feature = "serial")]
use crate::transport::SerialTransport;

/// Default serial device path.
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// Errors from session operations.
#[derive(Debug)]
pub enum SessionError {
    /// Transport I/O error.
    Io(io::Error),
    /// Serial port could not be opened.
    #[cfg(feature = "serial")]
    Serial(serialport::Error),
    /// Wire protocol decode or validation error.
    Wire(WireError),
    /// No acknowledgement arrived in time.
    Timeout { timeout: Duration },
    /// The radar acknowledged the command with a non-zero status.
    Rejected { command_word: u16, status: u16 },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "serial")]
            SessionError::Serial(e) => write!(f, "serial port error: {e}"),
            SessionError::Wire(e) => write!(f, "wire error: {e}"),
            SessionError::Timeout { timeout } => {
                write!(f, "no acknowledgement after {timeout:?}")
            }
            SessionError::Rejected { command_word, status } => {
                write!(f, "command 0x{command_word:04X} rejected with status {status}")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(e) => Some(e),
            #[cfg(feature = "serial")]
            SessionError::Serial(e) => Some(e),
            SessionError::Wire(e) => Some(e),
            SessionError::Timeout { .. } | SessionError::Rejected { .. } => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

#[cfg(feature = "serial")]
impl From<serialport::Error> for SessionError {
    fn from(e: serialport::Error) -> Self {
        SessionError::Serial(e)
    }
}

impl From<WireError> for SessionError {
    fn from(e: WireError) -> Self {
        SessionError::Wire(e)
    }
}

/// One radar on one transport.
///
/// Synchronous and single-threaded: every read goes through
/// [`poll_reports`](Self::poll_reports), [`poll_report`](Self::poll_report) or
/// [`poll_response`](Self::poll_response), and none of them block.
///
/// # Example
///
/// ```no_run
/// use ld2450::{RadarSession, SessionError};
/// use ld2450::protocol::BaudRate;
///
/// let mut radar = RadarSession::open("/dev/ttyUSB0", BaudRate::B256000)?;
/// radar.multi_target_tracking()?;
/// loop {
///     for report in radar.poll_reports()? {
///         println!("{:?}", report.closest());
///     }
///     std::thread::sleep(std::time::Duration::from_millis(50));
/// }
/// # Ok::<(), SessionError>(())
/// ```
pub struct RadarSession<T: Transport> {
    transport: T,
    frames: FrameBuffer,
    read_buf: [u8; 512],
    baud_rate: BaudRate,
    /// Called at the top of `send()` with the command.
    on_send: Option<Box<dyn FnMut(&Command)>>,
    /// Called for every report decoded from the stream.
    on_report: Option<Box<dyn FnMut(&Report)>>,
}

#[cfg(feature = "serial")]
impl RadarSession<SerialTransport> {
    /// Open a serial port at the rate the radar is currently using.
    pub fn open(path: &str, baud_rate: BaudRate) -> Result<Self, SessionError> {
        let transport = SerialTransport::open(path, baud_rate)?;
        Ok(Self::with_baud_rate(transport, baud_rate))
    }
}

impl<T: Transport> RadarSession<T> {
    /// Wrap a transport already running at the factory default rate.
    pub fn new(transport: T) -> Self {
        Self::with_baud_rate(transport, BaudRate::DEFAULT)
    }

    pub fn with_baud_rate(transport: T, baud_rate: BaudRate) -> Self {
        Self {
            transport,
            frames: FrameBuffer::new(),
            read_buf: [0u8; 512],
            baud_rate,
            on_send: None,
            on_report: None,
        }
    }

    /// Register a callback invoked at the top of every [`send()`](Self::send) call.
    pub fn set_on_send(&mut self, f: impl FnMut(&Command) + 'static) {
        self.on_send = Some(Box::new(f));
    }

    /// Register a callback invoked for every decoded report.
    pub fn set_on_report(&mut self, f: impl FnMut(&Report) + 'static) {
        self.on_report = Some(Box::new(f));
    }

    /// Rate the transport was opened at.
    pub fn baud_rate(&self) -> BaudRate {
        self.baud_rate
    }

    /// Bytes received but not yet consumed as a frame.
    pub fn buffered(&self) -> &[u8] {
        self.frames.as_slice()
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Encode and write a command.
    pub fn send(&mut self, cmd: &Command) -> Result<(), SessionError> {
        if let Some(cb) = self.on_send.as_mut() {
            cb(cmd);
        }
        log::debug!("{}", cmd.debug_hex());
        self.transport.write(&cmd.encode())?;
        self.transport.flush()?;
        Ok(())
    }

    pub fn enable_configuration_mode(&mut self) -> Result<(), SessionError> {
        self.send(&Command::EnableConfiguration)
    }

    pub fn end_configuration_mode(&mut self) -> Result<(), SessionError> {
        self.send(&Command::EndConfiguration)
    }

    pub fn single_target_tracking(&mut self) -> Result<(), SessionError> {
        self.send(&Command::SingleTargetTracking)
    }

    pub fn multi_target_tracking(&mut self) -> Result<(), SessionError> {
        self.send(&Command::MultiTargetTracking)
    }

    pub fn query_target_tracking(&mut self) -> Result<(), SessionError> {
        self.send(&Command::QueryTracking)
    }

    pub fn read_firmware_version(&mut self) -> Result<(), SessionError> {
        self.send(&Command::ReadFirmwareVersion)
    }

    /// Request a new serial rate (effective after restart).
    ///
    /// Rates outside the radar's allow-list are rejected before anything is
    /// written.
    pub fn set_baud_rate(&mut self, rate: u32) -> Result<(), SessionError> {
        let baud = BaudRate::try_from(rate)?;
        self.send(&Command::SetBaudRate(baud))
    }

    pub fn restore_factory_settings(&mut self) -> Result<(), SessionError> {
        self.send(&Command::RestoreFactorySettings)
    }

    pub fn restart_module(&mut self) -> Result<(), SessionError> {
        self.send(&Command::Restart)
    }

    pub fn set_bluetooth(&mut self, enabled: bool) -> Result<(), SessionError> {
        self.send(&Command::Bluetooth { enabled })
    }

    pub fn query_mac_address(&mut self) -> Result<(), SessionError> {
        self.send(&Command::QueryMacAddress)
    }

    // -----------------------------------------------------------------------
    // Receive
    // -----------------------------------------------------------------------

    /// Move every byte the transport has ready into the frame buffer.
    /// Returns how many bytes were read.
    pub fn fill(&mut self) -> Result<usize, SessionError> {
        let mut total = 0;
        while self.transport.available()? > 0 {
            let n = self.transport.read(&mut self.read_buf)?;
            if n == 0 {
                break;
            }
            self.frames.extend(&self.read_buf[..n]);
            total += n;
        }
        Ok(total)
    }

    /// Read what is available and iterate over the reports it completes.
    ///
    /// Decoding is lazy: dropping the iterator early leaves the remaining
    /// frames buffered for the next poll.
    pub fn poll_reports(&mut self) -> Result<Reports<'_>, SessionError> {
        self.fill()?;
        Ok(Reports {
            frames: &mut self.frames,
            on_report: self.on_report.as_deref_mut(),
        })
    }

    /// Read what is available and return only the first decoded report.
    pub fn poll_report(&mut self) -> Result<Option<Report>, SessionError> {
        Ok(self.poll_reports()?.next())
    }

    /// Read what is available and return the most recent report, draining
    /// any older ones.
    pub fn latest_report(&mut self) -> Result<Option<Report>, SessionError> {
        Ok(self.poll_reports()?.last())
    }

    /// Read what is available and take the next command response, if its tail
    /// has arrived.
    pub fn poll_response(&mut self) -> Result<Option<Vec<u8>>, SessionError> {
        self.fill()?;
        Ok(self.frames.decode_command_response())
    }
}

/// Reports decoded from one poll. See [`RadarSession::poll_reports`].
pub struct Reports<'a> {
    frames: &'a mut FrameBuffer,
    on_report: Option<&'a mut (dyn FnMut(&Report) + 'static)>,
}

impl Iterator for Reports<'_> {
    type Item = Report;

    fn next(&mut self) -> Option<Report> {
        let report = self.frames.decode_report()?;
        if let Some(cb) = self.on_report.as_mut() {
            cb(&report);
        }
        Some(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
