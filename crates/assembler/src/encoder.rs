//! Instruction encoding (pass 2).
//!
//! Operand words are little-endian; branch operands become a signed byte
//! relative to the address after the branch.

use cpu16_core::{write_u16_le, AddressingClass};

use crate::errors::{AssembleError, AssembleErrorKind};
use crate::parser::{OperandToken, ParsedInstruction};
use crate::symbols::SymbolTable;

/// Resolves an operand token to its 16-bit value.
///
/// # Errors
///
/// Returns `UndefinedLabel` when a referenced label is not in `symbols`.
pub fn resolve_operand(
    operand: &OperandToken,
    symbols: &SymbolTable,
    line: usize,
) -> Result<u16, AssembleError> {
    match operand {
        OperandToken::Number(value) => Ok(*value),
        OperandToken::Label(name) => symbols.get(name).map(|s| s.address).ok_or_else(|| {
            AssembleError::new(AssembleErrorKind::UndefinedLabel(name.clone()), line)
        }),
    }
}

/// Offset from the instruction after a branch at `address` to `target`.
///
/// # Errors
///
/// Returns the raw offset when it does not fit a signed byte.
pub fn relative_offset(address: u16, size: u16, target: u16) -> Result<i8, i32> {
    let base = i32::from(address) + i32::from(size);
    let offset = i32::from(target) - base;
    i8::try_from(offset).map_err(|_| offset)
}

/// Encodes one instruction placed at `address`.
///
/// # Errors
///
/// Returns `UndefinedLabel` for an unresolved reference and
/// `OffsetOutOfRange` for a branch target beyond a signed 8-bit offset.
pub fn encode_instruction(
    instr: &ParsedInstruction,
    symbols: &SymbolTable,
    address: u16,
    line: usize,
) -> Result<Vec<u8>, AssembleError> {
    let descriptor = instr.descriptor;
    let mut bytes = Vec::with_capacity(usize::from(instr.size()));
    bytes.push(descriptor.code);

    let Some(operand) = &instr.operand else {
        return Ok(bytes);
    };
    let value = resolve_operand(operand, symbols, line)?;

    match descriptor.class {
        AddressingClass::Implied => {}
        AddressingClass::Immediate | AddressingClass::Memory => write_u16_le(&mut bytes, value),
        AddressingClass::Relative => {
            let offset = relative_offset(address, instr.size(), value).map_err(|offset| {
                AssembleError::new(
                    AssembleErrorKind::OffsetOutOfRange {
                        target: value,
                        offset,
                    },
                    line,
                )
            })?;
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
    }

    Ok(bytes)
}
