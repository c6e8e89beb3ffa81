/// Operand interpretation classes for catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddressingClass {
    /// No operand; the instruction is a single opcode byte.
    Implied,
    /// Literal 16-bit operand word.
    Immediate,
    /// 16-bit operand word naming a memory cell.
    Memory,
    /// Signed 8-bit branch offset relative to the next instruction.
    Relative,
}

impl AddressingClass {
    /// Number of operand bytes following the opcode byte.
    #[must_use]
    pub const fn operand_bytes(self) -> u16 {
        match self {
            Self::Implied => 0,
            Self::Immediate | Self::Memory => 2,
            Self::Relative => 1,
        }
    }

    /// Total encoded size in bytes, opcode included.
    #[must_use]
    pub const fn encoded_size(self) -> u16 {
        1 + self.operand_bytes()
    }
}

/// Every instruction the CPU executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Opcode {
    Brk,
    Nop,
    Clc,
    Tax,
    Xta,
    Cta,
    Lda,
    Ldx,
    Ldy,
    Adc,
    Sbc,
    Cmp,
    Cpx,
    And,
    Ora,
    Eor,
    Jmp,
    Cmpc,
    Sta,
    Lsa,
    Stx,
    Lsx,
    Ott,
    Mul,
    Mulm,
    Beq,
    Bne,
    Bcs,
    Bcc,
    Bmi,
    Bpl,
    Bvs,
    Bvc,
}

/// Immutable catalog row describing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeDescriptor {
    /// Canonical upper-case mnemonic.
    pub mnemonic: &'static str,
    /// Instruction identity used by the execution engine.
    pub opcode: Opcode,
    /// Encoded opcode byte.
    pub code: u8,
    /// Operand interpretation.
    pub class: AddressingClass,
}

impl OpcodeDescriptor {
    const fn new(mnemonic: &'static str, opcode: Opcode, code: u8, class: AddressingClass) -> Self {
        Self {
            mnemonic,
            opcode,
            code,
            class,
        }
    }

    /// Encoded size in bytes, opcode included.
    #[must_use]
    pub const fn encoded_size(&self) -> u16 {
        self.class.encoded_size()
    }
}

/// Single source-of-truth opcode catalog shared by the assembler and the engine.
///
/// Any opcode byte not present here is illegal by definition.
pub const OPCODE_TABLE: &[OpcodeDescriptor] = &[
    OpcodeDescriptor::new("BRK", Opcode::Brk, 0x00, AddressingClass::Implied),
    OpcodeDescriptor::new("STA", Opcode::Sta, 0x01, AddressingClass::Memory),
    OpcodeDescriptor::new("LSA", Opcode::Lsa, 0x02, AddressingClass::Memory),
    OpcodeDescriptor::new("STX", Opcode::Stx, 0x03, AddressingClass::Memory),
    OpcodeDescriptor::new("LSX", Opcode::Lsx, 0x04, AddressingClass::Memory),
    OpcodeDescriptor::new("CTA", Opcode::Cta, 0x05, AddressingClass::Implied),
    OpcodeDescriptor::new("OTT", Opcode::Ott, 0x06, AddressingClass::Memory),
    OpcodeDescriptor::new("MUL", Opcode::Mul, 0x07, AddressingClass::Memory),
    OpcodeDescriptor::new("XTA", Opcode::Xta, 0x08, AddressingClass::Implied),
    OpcodeDescriptor::new("ORA", Opcode::Ora, 0x09, AddressingClass::Immediate),
    OpcodeDescriptor::new("BPL", Opcode::Bpl, 0x10, AddressingClass::Relative),
    OpcodeDescriptor::new("MULM", Opcode::Mulm, 0x14, AddressingClass::Memory),
    OpcodeDescriptor::new("CLC", Opcode::Clc, 0x18, AddressingClass::Implied),
    OpcodeDescriptor::new("AND", Opcode::And, 0x29, AddressingClass::Immediate),
    OpcodeDescriptor::new("BMI", Opcode::Bmi, 0x30, AddressingClass::Relative),
    OpcodeDescriptor::new("EOR", Opcode::Eor, 0x49, AddressingClass::Immediate),
    OpcodeDescriptor::new("JMP", Opcode::Jmp, 0x4C, AddressingClass::Immediate),
    OpcodeDescriptor::new("BVC", Opcode::Bvc, 0x50, AddressingClass::Relative),
    OpcodeDescriptor::new("ADC", Opcode::Adc, 0x69, AddressingClass::Immediate),
    OpcodeDescriptor::new("BVS", Opcode::Bvs, 0x70, AddressingClass::Relative),
    OpcodeDescriptor::new("BCC", Opcode::Bcc, 0x90, AddressingClass::Relative),
    OpcodeDescriptor::new("LDY", Opcode::Ldy, 0xA0, AddressingClass::Immediate),
    OpcodeDescriptor::new("LDX", Opcode::Ldx, 0xA2, AddressingClass::Immediate),
    OpcodeDescriptor::new("LDA", Opcode::Lda, 0xA9, AddressingClass::Immediate),
    OpcodeDescriptor::new("TAX", Opcode::Tax, 0xAA, AddressingClass::Implied),
    OpcodeDescriptor::new("BCS", Opcode::Bcs, 0xB0, AddressingClass::Relative),
    OpcodeDescriptor::new("CMP", Opcode::Cmp, 0xC9, AddressingClass::Immediate),
    OpcodeDescriptor::new("CMPC", Opcode::Cmpc, 0xCD, AddressingClass::Memory),
    OpcodeDescriptor::new("BNE", Opcode::Bne, 0xD0, AddressingClass::Relative),
    OpcodeDescriptor::new("CPX", Opcode::Cpx, 0xE0, AddressingClass::Immediate),
    OpcodeDescriptor::new("SBC", Opcode::Sbc, 0xE9, AddressingClass::Immediate),
    OpcodeDescriptor::new("NOP", Opcode::Nop, 0xEA, AddressingClass::Implied),
    OpcodeDescriptor::new("BEQ", Opcode::Beq, 0xF0, AddressingClass::Relative),
];

/// Returns the catalog entry for an encoded opcode byte.
///
/// `None` means the byte is not an assigned opcode.
#[must_use]
pub fn descriptor_for_code(code: u8) -> Option<&'static OpcodeDescriptor> {
    OPCODE_TABLE.iter().find(|entry| entry.code == code)
}

/// Returns the catalog entry for a mnemonic, ignoring ASCII case.
#[must_use]
pub fn descriptor_for_mnemonic(mnemonic: &str) -> Option<&'static OpcodeDescriptor> {
    OPCODE_TABLE
        .iter()
        .find(|entry| entry.mnemonic.eq_ignore_ascii_case(mnemonic))
}
