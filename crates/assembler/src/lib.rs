//! Two-pass assembler for the 16-bit console CPU.

use serde_json as _;
#[cfg(test)]
use tempfile as _;

/// Top-level two-pass assembler pipeline.
pub mod assembler;
/// Instruction encoding.
pub mod encoder;
/// Assembly error types.
pub mod errors;
/// Mnemonic resolution against the core opcode catalog.
pub mod mnemonic;
/// Source line parser for labels, instructions and operands.
pub mod parser;
/// Symbol table and pass-1 address assignment.
pub mod symbols;

pub use assembler::{assemble, assemble_with_listing, Assembly, ListingEntry};
pub use errors::{AssembleError, AssembleErrorKind};
