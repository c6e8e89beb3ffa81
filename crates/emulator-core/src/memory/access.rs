//! Bounds-checked access helpers for data memory and program bytes.

use crate::RuntimeError;

/// Byte width of an encoded operand word.
pub const OPERAND_WORD_BYTES: usize = 2;

/// Validates a data-memory address against the configured memory size.
///
/// # Errors
///
/// Returns [`RuntimeError::AddressOutOfRange`] when `address` is not below
/// `limit`.
pub fn validate_data_address(address: u16, limit: usize) -> Result<usize, RuntimeError> {
    let index = usize::from(address);
    if index < limit {
        Ok(index)
    } else {
        Err(RuntimeError::AddressOutOfRange { address, limit })
    }
}

/// Reads a little-endian word from `bytes` at `offset`.
///
/// `None` means fewer than two bytes remain.
#[must_use]
pub fn read_u16_le(bytes: &[u8], offset: usize) -> Option<u16> {
    let lo = *bytes.get(offset)?;
    let hi = *bytes.get(offset.checked_add(1)?)?;
    Some(u16::from_le_bytes([lo, hi]))
}

/// Appends `value` to `out` as a little-endian word.
pub fn write_u16_le(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}
