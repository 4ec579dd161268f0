//! Field codecs for the LD2450 wire protocol.
//!
//! All multi-byte integers are little-endian. Target coordinates and speed use
//! a 16-bit sign-magnitude encoding where bit 15 set means *positive* (the
//! inverse of the usual convention) and the low 15 bits are the magnitude.

use crate::error::{Result, WireError};

const SIGN_BIT: u16 = 0x8000;
const MAGNITUDE_MASK: u16 = 0x7FFF;

// ---------------------------------------------------------------------------
// Read helpers
// ---------------------------------------------------------------------------

/// Read a little-endian unsigned 16-bit integer.
pub fn read_u16_le(data: &[u8], offset: usize) -> Result<u16> {
    check_len(data, offset, 2, "UINT16")?;
    Ok(u16::from_le_bytes([data[offset], data[offset + 1]]))
}

/// Read a little-endian unsigned 32-bit integer.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    check_len(data, offset, 4, "UINT32")?;
    Ok(u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]))
}

/// Decode a raw sign-magnitude word. `0x8000` and `0x0000` are both zero.
pub fn sign_magnitude(raw: u16) -> i32 {
    let magnitude = i32::from(raw & MAGNITUDE_MASK);
    if raw & SIGN_BIT != 0 { magnitude } else { -magnitude }
}

/// Read a little-endian sign-magnitude 16-bit field.
pub fn read_sign_magnitude(data: &[u8], offset: usize) -> Result<i32> {
    Ok(sign_magnitude(read_u16_le(data, offset)?))
}

/// Read a sign-magnitude field and divide by a scale factor.
pub fn read_sign_magnitude_scaled(data: &[u8], offset: usize, scale: f64) -> Result<f64> {
    Ok(f64::from(read_sign_magnitude(data, offset)?) / scale)
}

/// Read an unsigned 16-bit field and divide by a scale factor.
pub fn read_u16_scaled(data: &[u8], offset: usize, scale: f64) -> Result<f64> {
    Ok(f64::from(read_u16_le(data, offset)?) / scale)
}

// ---------------------------------------------------------------------------
// Write helpers
// ---------------------------------------------------------------------------

/// Write a little-endian unsigned 16-bit integer.
pub fn write_u16_le(buf: &mut Vec<u8>, val: u16) {
    buf.extend_from_slice(&val.to_le_bytes());
}

/// Write a sign-magnitude 16-bit field. Magnitudes above 0x7FFF saturate.
pub fn write_sign_magnitude(buf: &mut Vec<u8>, val: i32) {
    let magnitude = val.unsigned_abs().min(u32::from(MAGNITUDE_MASK)) as u16;
    let raw = if val >= 0 { SIGN_BIT | magnitude } else { magnitude };
    write_u16_le(buf, raw);
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

fn check_len(data: &[u8], offset: usize, need: usize, name: &'static str) -> Result<()> {
    if data.len() < offset + need {
        Err(WireError::response_too_short(name, offset + need, data.len()))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
