//! Program disassembly.
//!
//! Rows print in assembler syntax: operands are hex literals and branch
//! operands are absolute targets, so a listing of legal code assembles back
//! to the same bytes.

use crate::decoder::{Decoder, Operand};
use crate::RuntimeError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the first byte.
    pub addr_start: u16,
    /// Raw encoded bytes.
    pub bytes: Vec<u8>,
    /// Mnemonic, or `.byte` for data that does not decode.
    pub mnemonic: String,
    /// Formatted operand, empty for implied instructions.
    pub operands: String,
    /// The bytes are not a complete, assigned instruction.
    pub is_illegal: bool,
}

/// Disassembles the whole program front to back.
///
/// Undecodable bytes become one-byte `.byte` rows and the sweep continues at
/// the next byte.
#[must_use]
pub fn disassemble(program: &[u8]) -> Vec<DisassemblyRow> {
    let mut rows = Vec::new();
    let mut pc: u16 = 0;

    while let Some(row) = disassemble_one(pc, program) {
        let len = u16::try_from(row.bytes.len()).unwrap_or(1);
        rows.push(row);
        match pc.checked_add(len) {
            Some(next) => pc = next,
            None => break,
        }
    }

    rows
}

/// Disassembles the instruction at `pc`; `None` past the end of `program`.
#[must_use]
pub fn disassemble_one(pc: u16, program: &[u8]) -> Option<DisassemblyRow> {
    let start = usize::from(pc);
    let first = *program.get(start)?;

    match Decoder::decode(program, pc) {
        Ok(instr) => {
            let end = start + usize::from(instr.size());
            let operands = match instr.operand {
                Operand::None => String::new(),
                Operand::Word(word) => format!("0x{word:04X}"),
                Operand::Offset(_) => format!("0x{:04X}", instr.branch_target()),
            };
            Some(DisassemblyRow {
                addr_start: pc,
                bytes: program.get(start..end)?.to_vec(),
                mnemonic: instr.descriptor.mnemonic.to_string(),
                operands,
                is_illegal: false,
            })
        }
        Err(cause) => {
            let note = match cause {
                RuntimeError::TruncatedInstruction { .. } => "TRUNCATED",
                RuntimeError::InvalidOpcode { .. } | RuntimeError::AddressOutOfRange { .. } => {
                    "ILLEGAL"
                }
            };
            Some(DisassemblyRow {
                addr_start: pc,
                bytes: vec![first],
                mnemonic: ".byte".to_string(),
                operands: format!("0x{first:02X} ; {note}"),
                is_illegal: true,
            })
        }
    }
}
