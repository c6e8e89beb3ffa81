//! `P` register update behaviors for the instruction classes.

use crate::state::{ArchitecturalState, FLAG_C, FLAG_N, FLAG_V, FLAG_Z};

/// Describes how `P` should change once an instruction commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagsUpdate {
    /// No change to `P`.
    #[default]
    None,
    /// Loads, logic ops, multiplies, console input: Z and N from `result`.
    ZeroNegative {
        /// Result word.
        result: u16,
    },
    /// Compares: Z and N from the difference, C from the borrow. V untouched.
    Compare {
        /// Difference `register - operand`, wrapped.
        difference: u16,
        /// No borrow occurred.
        carry: bool,
    },
    /// `ADC`/`SBC`: every arithmetic flag.
    Arithmetic {
        /// Result word.
        result: u16,
        /// Carry out / no borrow.
        carry: bool,
        /// Signed overflow.
        overflow: bool,
    },
    /// `CLC`.
    ClearCarry,
}

impl FlagsUpdate {
    /// Applies the update to the flag bits of `arch`.
    pub const fn apply(self, arch: &mut ArchitecturalState) {
        match self {
            Self::None => {}
            Self::ZeroNegative { result } => set_zero_negative(arch, result),
            Self::Compare { difference, carry } => {
                set_zero_negative(arch, difference);
                arch.set_flag(FLAG_C, carry);
            }
            Self::Arithmetic {
                result,
                carry,
                overflow,
            } => {
                set_zero_negative(arch, result);
                arch.set_flag(FLAG_C, carry);
                arch.set_flag(FLAG_V, overflow);
            }
            Self::ClearCarry => arch.set_flag(FLAG_C, false),
        }
    }
}

const fn set_zero_negative(arch: &mut ArchitecturalState, value: u16) {
    arch.set_flag(FLAG_Z, value == 0);
    arch.set_flag(FLAG_N, value & 0x8000 != 0);
}
