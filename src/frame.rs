//! Command frame encoding and the residual receive buffer.
//!
//! Command wire format (both directions):
//! ```text
//! FD FC FB FA  LEN(u16 LE)  CMD(u16 LE)  VALUE...  04 03 02 01
//! ```
//! Report wire format: see [`crate::protocol::report`].

use crate::protocol::report::{REPORT_HEADER, REPORT_LEN, REPORT_TAIL, Report};

pub const COMMAND_HEADER: [u8; 4] = [0xFD, 0xFC, 0xFB, 0xFA];
pub const COMMAND_TAIL: [u8; 4] = [0x04, 0x03, 0x02, 0x01];

/// Offset of the report tail from the start of the report header.
const REPORT_TAIL_OFFSET: usize = REPORT_LEN - REPORT_TAIL.len();

/// Build a command frame. `len` is written verbatim; it normally covers the
/// command word plus `value`.
pub fn encode_command(len: u16, command_word: u16, value: &[u8]) -> Vec<u8> {
    let mut wire = Vec::with_capacity(COMMAND_HEADER.len() + 4 + value.len() + COMMAND_TAIL.len());
    wire.extend_from_slice(&COMMAND_HEADER);
    wire.extend_from_slice(&len.to_le_bytes());
    wire.extend_from_slice(&command_word.to_le_bytes());
    wire.extend_from_slice(value);
    wire.extend_from_slice(&COMMAND_TAIL);
    wire
}

/// True if `response` is at least 10 bytes and carries a zero status word at
/// offset 8. Short or malformed responses count as failure.
pub fn parse_command_success(response: &[u8]) -> bool {
    response.len() >= 10 && u16::from_le_bytes([response[8], response[9]]) == 0
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Holds bytes read from the radar that have not yet been consumed as a
/// frame. Partial input is kept across calls, so it can be fed whatever a
/// non-blocking serial read returns.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
        }
    }

    /// Append newly received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Unconsumed bytes, oldest first.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Take everything up to and including the first command tail.
    ///
    /// Bytes after the tail stay buffered for later report decoding. Returns
    /// `None` and leaves the buffer untouched if no tail has arrived yet.
    pub fn decode_command_response(&mut self) -> Option<Vec<u8>> {
        let end = find(&self.buf, &COMMAND_TAIL)? + COMMAND_TAIL.len();
        let response: Vec<u8> = self.buf.drain(..end).collect();
        log::trace!("command response {}B", response.len());
        Some(response)
    }

    /// Decode the next report frame.
    ///
    /// A header whose tail is not exactly 28 bytes further on (a coincidental
    /// match, or a truncated/corrupted frame) is skipped and the search
    /// resumes after it, so one call can both discard garbage and return the
    /// next good frame. The frame and everything before it are removed on
    /// success. With no header in the buffer, returns `None` without touching
    /// it.
    pub fn decode_report(&mut self) -> Option<Report> {
        loop {
            let start = find(&self.buf, &REPORT_HEADER)?;
            let tail = start + REPORT_TAIL_OFFSET;
            let aligned = self
                .buf
                .get(tail..tail + REPORT_TAIL.len())
                .is_some_and(|t| t == REPORT_TAIL);

            if !aligned {
                let skip = start + REPORT_HEADER.len();
                log::debug!("dropping {skip}B at unaligned report header");
                self.buf.drain(..skip);
                continue;
            }

            let end = start + REPORT_LEN;
            let decoded = Report::decode(&self.buf[start..end]);
            self.buf.drain(..end);
            match decoded {
                Ok(report) => {
                    log::trace!("report {:?}", report.targets);
                    return Some(report);
                }
                Err(e) => log::debug!("report decode failed: {e}"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::report::Target;

    fn frame_with(x_raw: [u8; 2], y_raw: [u8; 2]) -> Vec<u8> {
        let mut wire = REPORT_HEADER.to_vec();
        wire.extend_from_slice(&x_raw);
        wire.extend_from_slice(&y_raw);
        wire.extend_from_slice(&[0x00, 0x00, 0x68, 0x01]);
        wire.extend_from_slice(&[0u8; 16]);
        wire.extend_from_slice(&REPORT_TAIL);
        wire
    }

    #[test]
    fn encode_command_layout() {
        let wire = encode_command(4, 0x00A1, &[0x06, 0x00]);
        assert_eq!(
            wire,
            vec![0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xA1, 0x00, 0x06, 0x00, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn command_success() {
        let ok = [0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xFF, 0x01, 0x00, 0x00];
        assert!(parse_command_success(&ok));
        let mut failed = ok;
        failed[8] = 0x01;
        assert!(!parse_command_success(&failed));
        assert!(!parse_command_success(&ok[..9]));
        assert!(!parse_command_success(&[]));
    }

    #[test]
    fn command_response_keeps_trailing_bytes() {
        let mut fb = FrameBuffer::new();
        fb.extend(&[0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0x90, 0x01, 0x00, 0x00]);
        fb.extend(&COMMAND_TAIL);
        fb.extend(&[0xAA, 0xFF]);

        let response = fb.decode_command_response().unwrap();
        assert_eq!(response.len(), 14);
        assert!(parse_command_success(&response));
        assert_eq!(fb.as_slice(), &[0xAA, 0xFF]);
    }

    #[test]
    fn command_response_waits_for_tail() {
        let mut fb = FrameBuffer::new();
        fb.extend(&[0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00]);
        assert!(fb.decode_command_response().is_none());
        assert_eq!(fb.len(), 6);
    }

    #[test]
    fn decode_single_report() {
        let mut fb = FrameBuffer::new();
        fb.extend(&frame_with([0x32, 0x80], [0x32, 0x00]));
        let report = fb.decode_report().unwrap();
        assert_eq!(report.targets[0].x, 5.0);
        assert_eq!(report.targets[0].y, -5.0);
        assert_eq!(report.targets[0].resolution, 36.0);
        assert_eq!(report.targets[1], Target::default());
        assert!(fb.is_empty());
    }

    #[test]
    fn garbage_without_header_is_untouched() {
        let mut fb = FrameBuffer::new();
        let garbage = [0x01, 0xFF, 0x03, 0x00, 0x55, 0xCC, 0xAA, 0xFF, 0x03];
        fb.extend(&garbage);
        assert!(fb.decode_report().is_none());
        assert_eq!(fb.as_slice(), &garbage);
    }

    #[test]
    fn spurious_header_is_skipped_in_same_call() {
        let mut fb = FrameBuffer::new();
        // Header followed by too few bytes before the real frame starts.
        fb.extend(&[0x00, 0xAA, 0xFF, 0x03, 0x00, 0x11, 0x22]);
        fb.extend(&frame_with([0x0A, 0x80], [0xE8, 0x83]));
        let report = fb.decode_report().unwrap();
        assert_eq!(report.targets[0].x, 1.0);
        assert_eq!(report.targets[0].y, 100.0);
        assert!(fb.is_empty());
    }

    #[test]
    fn misaligned_tail_drops_header() {
        let mut fb = FrameBuffer::new();
        let mut wire = frame_with([0x0A, 0x80], [0x0A, 0x80]);
        wire[28] = 0x00; // corrupt tail
        fb.extend(&wire);
        assert!(fb.decode_report().is_none());
        assert_eq!(fb.len(), wire.len() - REPORT_HEADER.len());
    }

    #[test]
    fn truncated_frame_drops_header() {
        let mut fb = FrameBuffer::new();
        let wire = frame_with([0x0A, 0x80], [0x0A, 0x80]);
        fb.extend(&wire[..20]);
        assert!(fb.decode_report().is_none());
        assert_eq!(fb.as_slice(), &wire[4..20]);
    }

    #[test]
    fn back_to_back_reports() {
        let mut fb = FrameBuffer::new();
        fb.extend(&frame_with([0x0A, 0x80], [0x0A, 0x80]));
        fb.extend(&frame_with([0x14, 0x80], [0x14, 0x80]));
        assert_eq!(fb.decode_report().unwrap().targets[0].x, 1.0);
        assert_eq!(fb.decode_report().unwrap().targets[0].x, 2.0);
        assert!(fb.decode_report().is_none());
        assert!(fb.is_empty());
    }
}
