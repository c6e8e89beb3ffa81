//! Instruction decoder.
//!
//! Turns the bytes at a program counter into a [`DecodedInstruction`] using the
//! opcode catalog, or into the [`RuntimeError`] that stops the step. Decoding
//! never panics, whatever bytes it is handed.

use crate::encoding::{descriptor_for_code, AddressingClass, Opcode, OpcodeDescriptor};
use crate::memory::read_u16_le;
use crate::RuntimeError;

/// Operand carried by a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Implied instructions carry nothing.
    None,
    /// Immediate value or memory address word.
    Word(u16),
    /// Signed branch offset.
    Offset(i8),
}

/// Decoded instruction with its fetch address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Catalog row for the fetched opcode byte.
    pub descriptor: &'static OpcodeDescriptor,
    /// Address of the opcode byte.
    pub pc: u16,
    /// Decoded operand.
    pub operand: Operand,
}

impl DecodedInstruction {
    /// Instruction identity.
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.descriptor.opcode
    }

    /// Encoded size in bytes.
    #[must_use]
    pub const fn size(&self) -> u16 {
        self.descriptor.encoded_size()
    }

    /// Address of the following instruction.
    #[must_use]
    pub const fn next_pc(&self) -> u16 {
        self.pc.wrapping_add(self.size())
    }

    /// Operand word; zero for instructions without one.
    #[must_use]
    pub const fn word(&self) -> u16 {
        match self.operand {
            Operand::Word(word) => word,
            Operand::None | Operand::Offset(_) => 0,
        }
    }

    /// Branch destination: the next instruction's address plus the offset.
    ///
    /// Wraps at 16 bits like every other `PC` update.
    #[must_use]
    pub fn branch_target(&self) -> u16 {
        match self.operand {
            Operand::Offset(offset) => self.next_pc().wrapping_add_signed(i16::from(offset)),
            Operand::None | Operand::Word(_) => self.next_pc(),
        }
    }
}

/// Stateless decoder over program bytes.
pub struct Decoder;

impl Decoder {
    /// Decodes the instruction starting at `pc`.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::InvalidOpcode`] when the byte at `pc` has no catalog
    ///   entry.
    /// - [`RuntimeError::TruncatedInstruction`] when `pc` is past the end of
    ///   `program` or the operand bytes are.
    pub fn decode(program: &[u8], pc: u16) -> Result<DecodedInstruction, RuntimeError> {
        let at = usize::from(pc);
        let code = *program
            .get(at)
            .ok_or(RuntimeError::TruncatedInstruction { pc })?;
        let descriptor =
            descriptor_for_code(code).ok_or(RuntimeError::InvalidOpcode { opcode: code, pc })?;

        let operand = match descriptor.class {
            AddressingClass::Implied => Operand::None,
            AddressingClass::Immediate | AddressingClass::Memory => Operand::Word(
                read_u16_le(program, at + 1).ok_or(RuntimeError::TruncatedInstruction { pc })?,
            ),
            AddressingClass::Relative => {
                let raw = *program
                    .get(at + 1)
                    .ok_or(RuntimeError::TruncatedInstruction { pc })?;
                Operand::Offset(i8::from_le_bytes([raw]))
            }
        };

        Ok(DecodedInstruction {
            descriptor,
            pc,
            operand,
        })
    }
}
