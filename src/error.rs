use thiserror::Error;

/// Errors arising from wire protocol parsing and command validation.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("unsupported baud rate {rate} (allowed: 9600, 19200, 38400, 57600, 115200, 230400, 256000, 460800)")]
    UnsupportedBaudRate { rate: u32 },

    #[error("response too short for {what}: need {need} bytes, got {got}{}", format_raw_suffix(raw))]
    ResponseTooShort {
        what: &'static str,
        need: usize,
        got: usize,
        /// Raw response bytes for debug context.
        raw: Vec<u8>,
    },

    #[error("missing command header (expected FD FC FB FA){}", format_raw_suffix(raw))]
    MissingCommandHeader { raw: Vec<u8> },

    #[error("unexpected payload length for {what}: expected {expected}, got {got}")]
    UnexpectedLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

impl WireError {
    /// Create a `ResponseTooShort` error (raw bytes filled in later via `with_raw`).
    pub(crate) fn response_too_short(what: &'static str, need: usize, got: usize) -> Self {
        Self::ResponseTooShort { what, need, got, raw: Vec::new() }
    }

    /// Attach raw response bytes to decode-phase errors for diagnostics.
    pub fn with_raw(self, response: &[u8]) -> Self {
        match self {
            Self::ResponseTooShort { what, need, got, .. } => {
                Self::ResponseTooShort { what, need, got, raw: response.to_vec() }
            }
            Self::MissingCommandHeader { .. } => {
                Self::MissingCommandHeader { raw: response.to_vec() }
            }
            other => other,
        }
    }
}

/// Format raw bytes as a suffix like " | FDFCFBFA..." (empty if no bytes).
fn format_raw_suffix(raw: &[u8]) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let limit = 16;
    let hex: String = raw.iter().take(limit).map(|b| format!("{b:02X}")).collect();
    let ellipsis = if raw.len() > limit { "..." } else { "" };
    format!(" | {hex}{ellipsis}")
}

pub type Result<T> = std::result::Result<T, WireError>;
