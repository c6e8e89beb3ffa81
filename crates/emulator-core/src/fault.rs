use thiserror::Error;

/// Runtime faults raised by decode or execute.
///
/// A fault halts the run at the failing step and is reported as trace data;
/// CPU state is left exactly as it was before the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RuntimeError {
    /// Fetched byte has no opcode catalog entry.
    #[error("invalid opcode 0x{opcode:02X} at PC 0x{pc:04X}")]
    InvalidOpcode {
        /// Offending byte.
        opcode: u8,
        /// Address of the offending byte.
        pc: u16,
    },
    /// Memory operand names a cell past the configured memory size.
    #[error("memory address {address} out of range (memory holds {limit} words)")]
    AddressOutOfRange {
        /// Requested cell address.
        address: u16,
        /// Number of words in the configured memory.
        limit: usize,
    },
    /// Operand bytes run past the end of the program.
    #[error("instruction at PC 0x{pc:04X} is truncated by the end of the program")]
    TruncatedInstruction {
        /// Address of the opcode byte.
        pc: u16,
    },
}

/// Stable taxonomy names, matching the variant names.
impl RuntimeError {
    /// Returns the taxonomy name of this fault.
    #[must_use]
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::InvalidOpcode { .. } => "InvalidOpcode",
            Self::AddressOutOfRange { .. } => "AddressOutOfRange",
            Self::TruncatedInstruction { .. } => "TruncatedInstruction",
        }
    }
}
