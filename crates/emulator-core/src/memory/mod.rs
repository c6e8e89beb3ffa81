//! Data memory model and access helpers.

/// Bounds-checked address validation and little-endian word helpers.
pub mod access;

pub use access::{read_u16_le, validate_data_address, write_u16_le, OPERAND_WORD_BYTES};

use crate::RuntimeError;

/// Default number of 16-bit words in data memory.
pub const DEFAULT_MEMORY_WORDS: usize = 256;

/// Largest memory a 16-bit operand word can address.
pub const MAX_MEMORY_WORDS: usize = u16::MAX as usize + 1;

/// Fixed-size, zero-initialized data memory of 16-bit words.
///
/// Program bytes are never stored here; code and data live apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[u16]>,
}

impl Memory {
    /// Allocates `words` zeroed cells, clamped to `1..=MAX_MEMORY_WORDS`.
    #[must_use]
    pub fn new(words: usize) -> Self {
        let words = words.clamp(1, MAX_MEMORY_WORDS);
        Self {
            cells: vec![0; words].into_boxed_slice(),
        }
    }

    /// Number of addressable cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// Memory always holds at least one cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads the cell at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AddressOutOfRange`] when `address` is past the
    /// end of memory.
    pub fn read(&self, address: u16) -> Result<u16, RuntimeError> {
        let index = validate_data_address(address, self.cells.len())?;
        Ok(self.cells[index])
    }

    /// Writes the cell at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AddressOutOfRange`] when `address` is past the
    /// end of memory.
    pub fn write(&mut self, address: u16, value: u16) -> Result<(), RuntimeError> {
        let index = validate_data_address(address, self.cells.len())?;
        self.cells[index] = value;
        Ok(())
    }

    /// Borrows every cell in address order.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_WORDS)
    }
}
