//! Byte channel abstraction between the radar session and the wire.

use std::io;

mod mock;
#[cfg(feature = "serial")]
mod serial;

pub use mock::MockTransport;
#[cfg(feature = "serial")]
pub use serial::SerialTransport;

/// Duplex byte channel to the radar.
///
/// Reads never block: they return whatever is already buffered, possibly
/// nothing. Writes may block until the bytes are queued.
pub trait Transport: Send {
    /// Read available data into `buffer`, returns number of bytes read (0 if none)
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Write all of `data`
    fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush any pending writes (blocking until complete)
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Number of bytes ready to read without blocking
    fn available(&mut self) -> io::Result<usize>;
}
