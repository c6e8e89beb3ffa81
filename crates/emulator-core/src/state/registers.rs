/// `P` bit for carry / no borrow.
pub const FLAG_C: u8 = 1 << 0;
/// `P` bit for zero result.
pub const FLAG_Z: u8 = 1 << 1;
/// `P` bit for interrupt disable (reserved, never set by an instruction).
pub const FLAG_I: u8 = 1 << 2;
/// `P` bit for decimal mode (reserved, never set by an instruction).
pub const FLAG_D: u8 = 1 << 3;
/// `P` bit for break (reserved, never set by an instruction).
pub const FLAG_B: u8 = 1 << 4;
/// `P` bit for signed overflow.
pub const FLAG_V: u8 = 1 << 6;
/// `P` bit for negative result (bit 15 of the result word).
pub const FLAG_N: u8 = 1 << 7;
/// Mask of architecturally active `P` bits.
pub const FLAGS_ACTIVE_MASK: u8 = FLAG_C | FLAG_Z | FLAG_I | FLAG_D | FLAG_B | FLAG_V | FLAG_N;

/// Data register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Register {
    A,
    X,
    Y,
}

/// Register and flag file of the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ArchitecturalState {
    a: u16,
    x: u16,
    y: u16,
    pc: u16,
    sp: u8,
    p: u8,
    cycles: u64,
}

impl ArchitecturalState {
    /// Reads a data register.
    #[must_use]
    pub const fn reg(&self, reg: Register) -> u16 {
        match reg {
            Register::A => self.a,
            Register::X => self.x,
            Register::Y => self.y,
        }
    }

    /// Writes a data register.
    pub const fn set_reg(&mut self, reg: Register, value: u16) {
        match reg {
            Register::A => self.a = value,
            Register::X => self.x = value,
            Register::Y => self.y = value,
        }
    }

    /// Reads the `PC` register.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the `PC` register.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the reserved `SP` register.
    #[must_use]
    pub const fn sp(&self) -> u8 {
        self.sp
    }

    /// Reads the packed `P` flag register.
    #[must_use]
    pub const fn flags(&self) -> u8 {
        self.p
    }

    /// Writes the packed `P` flag register.
    pub const fn set_flags(&mut self, value: u8) {
        self.p = value & FLAGS_ACTIVE_MASK;
    }

    /// Returns `true` when a specific `P` bit is set.
    #[must_use]
    pub const fn flag_is_set(&self, flag: u8) -> bool {
        (self.p & flag) != 0
    }

    /// Sets or clears a specific `P` bit.
    pub const fn set_flag(&mut self, flag: u8, enabled: bool) {
        if enabled {
            self.p |= flag & FLAGS_ACTIVE_MASK;
        } else {
            self.p &= !(flag & FLAGS_ACTIVE_MASK);
        }
    }

    /// Reads the cycle counter.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advances the cycle counter.
    pub const fn add_cycles(&mut self, cycles: u16) {
        self.cycles = self.cycles.saturating_add(cycles as u64);
    }
}
